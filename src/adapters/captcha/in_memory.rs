use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::captcha::{after_wrong_answer, CaptchaError, Challenge, DEFAULT_MAX_ATTEMPTS};
use crate::domain::foundation::{ChallengeId, Timestamp};
use crate::ports::ChallengeStore;

#[derive(Debug)]
pub struct InMemoryChallengeStore {
    challenges: Mutex<HashMap<ChallengeId, Challenge>>,
    max_attempts: u32,
}

impl InMemoryChallengeStore {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            challenges: Mutex::new(HashMap::new()),
            max_attempts,
        }
    }

    /// Drop expired challenges. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Timestamp::now();
        let mut challenges = self.challenges.lock().await;
        let before = challenges.len();
        challenges.retain(|_, c| !c.is_expired_at(now));
        before - challenges.len()
    }

    pub async fn len(&self) -> usize {
        self.challenges.lock().await.len()
    }
}

impl Default for InMemoryChallengeStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

#[async_trait]
impl ChallengeStore for InMemoryChallengeStore {
    async fn put(&self, challenge: &Challenge) -> Result<(), CaptchaError> {
        let now = Timestamp::now();
        let mut challenges = self.challenges.lock().await;
        challenges.retain(|_, c| !c.is_expired_at(now));
        challenges.insert(challenge.id, challenge.clone());
        Ok(())
    }

    async fn verify(&self, id: &ChallengeId, answer: &str) -> Result<(), CaptchaError> {
        let mut challenges = self.challenges.lock().await;
        let challenge = challenges.get_mut(id).ok_or(CaptchaError::NotFound)?;

        if challenge.is_expired_at(Timestamp::now()) {
            challenges.remove(id);
            return Err(CaptchaError::NotFound);
        }
        if challenge.matches(answer) {
            challenges.remove(id);
            return Ok(());
        }

        challenge.attempts += 1;
        let verdict = after_wrong_answer(challenge.attempts, self.max_attempts);
        if verdict == CaptchaError::Exhausted {
            challenges.remove(id);
        }
        Err(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge(answer: i64, ttl_secs: u64) -> Challenge {
        Challenge {
            id: ChallengeId::new(),
            question: "¿Cuánto es 2 + 3?".into(),
            answer,
            attempts: 0,
            expires_at: Timestamp::now().plus_secs(ttl_secs),
        }
    }

    #[tokio::test]
    async fn correct_answer_consumes_challenge() {
        let store = InMemoryChallengeStore::default();
        let c = challenge(5, 60);
        store.put(&c).await.unwrap();

        assert!(store.verify(&c.id, "5").await.is_ok());
        assert_eq!(store.verify(&c.id, "5").await, Err(CaptchaError::NotFound));
    }

    #[tokio::test]
    async fn three_wrong_answers_exhaust_challenge() {
        let store = InMemoryChallengeStore::default();
        let c = challenge(5, 60);
        store.put(&c).await.unwrap();

        assert_eq!(
            store.verify(&c.id, "4").await,
            Err(CaptchaError::WrongAnswer { remaining: 2 })
        );
        assert_eq!(
            store.verify(&c.id, "4").await,
            Err(CaptchaError::WrongAnswer { remaining: 1 })
        );
        assert_eq!(store.verify(&c.id, "4").await, Err(CaptchaError::Exhausted));
        // Gone even with the right answer now.
        assert_eq!(store.verify(&c.id, "5").await, Err(CaptchaError::NotFound));
    }

    #[tokio::test]
    async fn expired_challenge_is_not_found() {
        let store = InMemoryChallengeStore::default();
        let c = challenge(5, 0);
        store.put(&c).await.unwrap();

        assert_eq!(store.verify(&c.id, "5").await, Err(CaptchaError::NotFound));
        assert_eq!(store.purge_expired().await, 0);
        assert_eq!(store.len().await, 0);
    }
}
