//! SubmitContactHandler - public contact form.
//!
//! The captcha is checked before any field is looked at so a bot never
//! learns which fields it got wrong.

use std::sync::Arc;

use crate::adapters::email::Notifier;
use crate::application::ApplicationError;
use crate::domain::foundation::{ChallengeId, DomainError, Email};
use crate::domain::submission::ContactMessage;
use crate::ports::{ChallengeStore, SubmissionRepository};

use super::CaptchaAnswer;

#[derive(Debug, Clone)]
pub struct SubmitContactCommand {
    pub captcha: CaptchaAnswer,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub ip_address: Option<String>,
}

pub struct SubmitContactHandler {
    captcha: Arc<dyn ChallengeStore>,
    submissions: Arc<dyn SubmissionRepository>,
    notifier: Notifier,
}

impl SubmitContactHandler {
    pub fn new(
        captcha: Arc<dyn ChallengeStore>,
        submissions: Arc<dyn SubmissionRepository>,
        notifier: Notifier,
    ) -> Self {
        Self {
            captcha,
            submissions,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: SubmitContactCommand) -> Result<ContactMessage, ApplicationError> {
        verify_captcha(self.captcha.as_ref(), &cmd.captcha).await?;

        let email = Email::parse(&cmd.email).map_err(DomainError::from)?;
        let message = ContactMessage::new(cmd.name, email, cmd.subject, cmd.message, cmd.ip_address)
            .map_err(DomainError::from)?;
        self.submissions.save_contact(&message).await?;
        tracing::info!(submission_id = %message.id, "Contact message received");

        self.notifier.contact_received(&message).await;
        Ok(message)
    }
}

pub(super) async fn verify_captcha(
    store: &dyn ChallengeStore,
    answer: &CaptchaAnswer,
) -> Result<(), ApplicationError> {
    let id: ChallengeId = answer
        .challenge_id
        .parse()
        .map_err(|_| ApplicationError::validation("captchaId", "Captcha no válido"))?;
    store.verify(&id, &answer.answer).await.map_err(|e| {
        tracing::info!(challenge_id = %id, error = %e, "Captcha rejected");
        ApplicationError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{Fixture, ADMIN_INBOX};
    use crate::domain::captcha::{CaptchaError, Challenge};

    async fn challenge(fx: &Fixture) -> Challenge {
        let challenge = Challenge::generate(&mut rand::thread_rng(), 300);
        fx.captcha.put(&challenge).await.unwrap();
        challenge
    }

    fn command(challenge: &Challenge, answer: String) -> SubmitContactCommand {
        SubmitContactCommand {
            captcha: CaptchaAnswer {
                challenge_id: challenge.id.to_string(),
                answer,
            },
            name: "Pablo".into(),
            email: "pablo@example.com".into(),
            subject: "Horarios".into(),
            message: "¿Cuándo abre la oficina?".into(),
            ip_address: Some("198.51.100.4".into()),
        }
    }

    fn handler(fx: &Fixture) -> SubmitContactHandler {
        SubmitContactHandler::new(fx.captcha.clone(), fx.submissions.clone(), fx.notifier())
    }

    #[tokio::test]
    async fn correct_answer_stores_and_notifies_admin() {
        let fx = Fixture::new();
        let c = challenge(&fx).await;

        handler(&fx).handle(command(&c, c.answer.to_string())).await.unwrap();

        assert_eq!(fx.submissions.list_contacts().await.unwrap().len(), 1);
        assert_eq!(fx.emails.sent_to(ADMIN_INBOX).len(), 1);
        assert_eq!(fx.captcha.len().await, 0);
    }

    #[tokio::test]
    async fn wrong_answer_stores_nothing() {
        let fx = Fixture::new();
        let c = challenge(&fx).await;

        let err = handler(&fx)
            .handle(command(&c, (c.answer + 1).to_string()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Captcha(CaptchaError::WrongAnswer { remaining: 2 })
        ));
        assert!(fx.submissions.list_contacts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn solved_challenge_cannot_be_replayed() {
        let fx = Fixture::new();
        let c = challenge(&fx).await;
        let handler = handler(&fx);

        handler.handle(command(&c, c.answer.to_string())).await.unwrap();
        let err = handler.handle(command(&c, c.answer.to_string())).await.unwrap_err();

        assert!(matches!(err, ApplicationError::Captcha(CaptchaError::NotFound)));
    }
}
