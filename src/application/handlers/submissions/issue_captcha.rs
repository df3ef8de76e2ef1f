//! IssueCaptchaHandler - creates an arithmetic challenge for the public forms.

use std::sync::Arc;

use crate::application::ApplicationError;
use crate::domain::captcha::{Challenge, ChallengePrompt};
use crate::ports::ChallengeStore;

pub struct IssueCaptchaHandler {
    store: Arc<dyn ChallengeStore>,
    ttl_secs: u64,
}

impl IssueCaptchaHandler {
    pub fn new(store: Arc<dyn ChallengeStore>, ttl_secs: u64) -> Self {
        Self { store, ttl_secs }
    }

    pub async fn handle(&self) -> Result<ChallengePrompt, ApplicationError> {
        let challenge = Challenge::generate(&mut rand::thread_rng(), self.ttl_secs);
        self.store.put(&challenge).await?;
        tracing::debug!(challenge_id = %challenge.id, "Captcha issued");
        Ok(challenge.prompt())
    }
}
