//! Redis challenge store.
//!
//! Each challenge is a hash `{answer, attempts}` with an `EXPIRE` equal to
//! its remaining lifetime, so abandoned challenges clean themselves up.
//! Counting a wrong answer runs as one script so it can never recreate a
//! challenge that expired or was consumed in the meantime.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Script};

use crate::domain::captcha::{answer_matches, after_wrong_answer, CaptchaError, Challenge};
use crate::domain::foundation::{ChallengeId, Timestamp};
use crate::ports::ChallengeStore;

#[derive(Clone)]
pub struct RedisChallengeStore {
    conn: MultiplexedConnection,
    key_prefix: String,
    max_attempts: u32,
}

impl RedisChallengeStore {
    pub fn new(conn: MultiplexedConnection, key_prefix: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
            max_attempts,
        }
    }

    fn key(&self, id: &ChallengeId) -> String {
        challenge_key(&self.key_prefix, id)
    }
}

fn challenge_key(prefix: &str, id: &ChallengeId) -> String {
    format!("{}:captcha:{}", prefix, id)
}

/// Increments `attempts` only while the challenge exists and drops it once
/// the limit is reached. Returns the new count, or -1 when it is gone.
const COUNT_WRONG_ANSWER: &str = r"
if redis.call('EXISTS', KEYS[1]) == 0 then
  return -1
end
local attempts = redis.call('HINCRBY', KEYS[1], 'attempts', 1)
if attempts >= tonumber(ARGV[1]) then
  redis.call('DEL', KEYS[1])
end
return attempts
";

fn wrong_answer_verdict(counted: i64, max_attempts: u32) -> CaptchaError {
    match u32::try_from(counted) {
        Ok(attempts) if attempts > 0 => after_wrong_answer(attempts, max_attempts),
        _ => CaptchaError::NotFound,
    }
}

fn store_error(e: redis::RedisError) -> CaptchaError {
    tracing::warn!(error = %e, "Captcha store unavailable");
    CaptchaError::Store(e.to_string())
}

#[async_trait]
impl ChallengeStore for RedisChallengeStore {
    async fn put(&self, challenge: &Challenge) -> Result<(), CaptchaError> {
        let key = self.key(&challenge.id);
        let ttl = challenge
            .expires_at
            .as_unix_secs()
            .saturating_sub(Timestamp::now().as_unix_secs())
            .max(1);

        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .hset(&key, "answer", challenge.answer)
            .ignore()
            .hset(&key, "attempts", challenge.attempts)
            .ignore()
            .expire(&key, ttl as i64)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(store_error)
    }

    async fn verify(&self, id: &ChallengeId, answer: &str) -> Result<(), CaptchaError> {
        let key = self.key(id);
        let mut conn = self.conn.clone();

        let expected: Option<i64> = conn.hget(&key, "answer").await.map_err(store_error)?;
        let expected = expected.ok_or(CaptchaError::NotFound)?;

        if answer_matches(expected, answer) {
            // DEL returns 0 if a concurrent request already consumed it.
            let removed: u32 = conn.del(&key).await.map_err(store_error)?;
            return if removed == 1 {
                Ok(())
            } else {
                Err(CaptchaError::NotFound)
            };
        }

        let counted: i64 = Script::new(COUNT_WRONG_ANSWER)
            .key(&key)
            .arg(self.max_attempts)
            .invoke_async(&mut conn)
            .await
            .map_err(store_error)?;
        Err(wrong_answer_verdict(counted, self.max_attempts))
    }
}

impl std::fmt::Debug for RedisChallengeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisChallengeStore")
            .field("key_prefix", &self.key_prefix)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}
