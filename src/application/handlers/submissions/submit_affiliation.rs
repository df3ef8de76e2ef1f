//! SubmitAffiliationHandler - public "join the union" form.

use std::sync::Arc;

use crate::adapters::email::Notifier;
use crate::application::ApplicationError;
use crate::domain::foundation::{DomainError, Email};
use crate::domain::submission::{AffiliationForm, AffiliationRequest};
use crate::ports::{ChallengeStore, SubmissionRepository};

use super::submit_contact::verify_captcha;
use super::CaptchaAnswer;

#[derive(Debug, Clone)]
pub struct SubmitAffiliationCommand {
    pub captcha: CaptchaAnswer,
    pub email: String,
    pub form: AffiliationForm,
}

pub struct SubmitAffiliationHandler {
    captcha: Arc<dyn ChallengeStore>,
    submissions: Arc<dyn SubmissionRepository>,
    notifier: Notifier,
}

impl SubmitAffiliationHandler {
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

    pub async fn handle(
        &self,
        cmd: SubmitAffiliationCommand,
    ) -> Result<AffiliationRequest, ApplicationError> {
        verify_captcha(self.captcha.as_ref(), &cmd.captcha).await?;

        let email = Email::parse(&cmd.email).map_err(DomainError::from)?;
        let request = AffiliationRequest::new(cmd.form, email).map_err(DomainError::from)?;
        self.submissions.save_affiliation(&request).await?;
        tracing::info!(submission_id = %request.id, "Affiliation request received");

        self.notifier.affiliation_received(&request).await;
        Ok(request)
    }
}
