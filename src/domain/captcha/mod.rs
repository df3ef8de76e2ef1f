//! Captcha module - arithmetic challenges guarding the public forms.
//!
//! A challenge is consumed by the first correct answer, survives a limited
//! number of wrong answers, and disappears after its time-to-live.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{ChallengeId, Timestamp};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptchaError {
    /// Unknown id, already solved, or expired.
    #[error("Captcha challenge not found or expired")]
    NotFound,

    #[error("Incorrect captcha answer, {remaining} attempts remaining")]
    WrongAnswer { remaining: u32 },

    #[error("Too many incorrect captcha answers")]
    Exhausted,

    #[error("Captcha store unavailable: {0}")]
    Store(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Add,
    Sub,
    Mul,
}

/// An issued challenge. The answer never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub id: ChallengeId,
    pub question: String,
    pub answer: i64,
    pub attempts: u32,
    pub expires_at: Timestamp,
}

/// What the client receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengePrompt {
    pub challenge_id: ChallengeId,
    pub question: String,
    pub expires_at: Timestamp,
}

impl Challenge {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, ttl_secs: u64) -> Self {
        let op = match rng.gen_range(0..3) {
            0 => Operator::Add,
            1 => Operator::Sub,
            _ => Operator::Mul,
        };
        let (a, b): (i64, i64) = match op {
            Operator::Mul => (rng.gen_range(2..10), rng.gen_range(2..10)),
            _ => (rng.gen_range(1..20), rng.gen_range(1..20)),
        };
        // Keep subtraction results non-negative.
        let (a, b) = if op == Operator::Sub && b > a { (b, a) } else { (a, b) };
        let (symbol, answer) = match op {
            Operator::Add => ("+", a + b),
            Operator::Sub => ("-", a - b),
            Operator::Mul => ("×", a * b),
        };
        Self {
            id: ChallengeId::new(),
            question: format!("¿Cuánto es {} {} {}?", a, symbol, b),
            answer,
            attempts: 0,
            expires_at: Timestamp::now().plus_secs(ttl_secs),
        }
    }

    pub fn prompt(&self) -> ChallengePrompt {
        ChallengePrompt {
            challenge_id: self.id,
            question: self.question.clone(),
            expires_at: self.expires_at,
        }
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        !now.is_before(&self.expires_at)
    }

    pub fn matches(&self, answer: &str) -> bool {
        answer_matches(self.answer, answer)
    }
}

/// Compares a submitted answer against the expected value, ignoring whitespace.
pub fn answer_matches(expected: i64, submitted: &str) -> bool {
    submitted.trim().parse::<i64>().map_or(false, |n| n == expected)
}

/// Verdict after a wrong answer has been counted.
pub fn after_wrong_answer(attempts: u32, max_attempts: u32) -> CaptchaError {
    if attempts >= max_attempts {
        CaptchaError::Exhausted
    } else {
        CaptchaError::WrongAnswer {
            remaining: max_attempts - attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_questions_are_consistent() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let c = Challenge::generate(&mut rng, 300);
            assert!(c.answer >= 0);
            assert!(c.question.starts_with("¿Cuánto es "));
            assert!(c.matches(&format!(" {} ", c.answer)));
            assert!(!c.matches("nope"));
        }
    }

    #[test]
    fn expiry_is_relative_to_ttl() {
        let c = Challenge::generate(&mut rand::thread_rng(), 60);
        assert!(!c.is_expired_at(Timestamp::now()));
        assert!(c.is_expired_at(Timestamp::now().plus_secs(61)));
    }

    #[test]
    fn wrong_answers_count_down_to_exhaustion() {
        assert_eq!(after_wrong_answer(1, 3), CaptchaError::WrongAnswer { remaining: 2 });
        assert_eq!(after_wrong_answer(2, 3), CaptchaError::WrongAnswer { remaining: 1 });
        assert_eq!(after_wrong_answer(3, 3), CaptchaError::Exhausted);
    }

    #[test]
    fn prompt_hides_answer() {
        let c = Challenge::generate(&mut rand::thread_rng(), 60);
        let json = serde_json::to_value(c.prompt()).unwrap();
        assert!(json.get("answer").is_none());
        assert!(json.get("challengeId").is_some());
    }
}
