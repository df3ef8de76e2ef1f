//! Best-effort notifications.
//!
//! Nothing here returns an error: a failed delivery is logged and the
//! request that triggered it carries on.

use std::sync::Arc;

use super::templates::{self, RenderedEmail};
use crate::domain::foundation::Money;
use crate::domain::submission::{AffiliationRequest, ContactMessage};
use crate::domain::suggestion::Suggestion;
use crate::domain::user::User;
use crate::ports::{EmailMessage, EmailSender};

#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn EmailSender>,
    admin_address: Option<String>,
}

impl Notifier {
    pub fn new(sender: Arc<dyn EmailSender>, admin_address: Option<String>) -> Self {
        Self {
            sender,
            admin_address,
        }
    }

    pub async fn welcome(&self, user: &User) {
        self.deliver(user.email.as_str(), templates::welcome(&user.profile.name), "welcome")
            .await;
    }

    pub async fn password_changed(&self, user: &User) {
        self.deliver(
            user.email.as_str(),
            templates::password_changed(&user.profile.name),
            "password_changed",
        )
        .await;
    }

    pub async fn payment_confirmation(&self, user: &User, amount: Money, currency: &str, description: &str) {
        self.deliver(
            user.email.as_str(),
            templates::payment_confirmation(&user.profile.name, amount, currency, description),
            "payment_confirmation",
        )
        .await;
    }

    /// Skipped for anonymous submissions and submissions without an email.
    pub async fn suggestion_status_changed(&self, suggestion: &Suggestion) {
        match suggestion.notification_email() {
            Some(to) => {
                self.deliver(
                    to,
                    templates::suggestion_status_changed(suggestion),
                    "suggestion_status",
                )
                .await
            }
            None => tracing::debug!(
                suggestion_id = %suggestion.id,
                "No notification address for suggestion"
            ),
        }
    }

    pub async fn contact_received(&self, message: &ContactMessage) {
        if let Some(admin) = &self.admin_address {
            self.deliver(admin, templates::contact_received(message), "contact_received")
                .await;
        }
    }

    pub async fn affiliation_received(&self, request: &AffiliationRequest) {
        if let Some(admin) = &self.admin_address {
            self.deliver(
                admin,
                templates::affiliation_received(request),
                "affiliation_received",
            )
            .await;
        }
    }

    async fn deliver(&self, to: &str, email: RenderedEmail, template: &'static str) {
        let message = EmailMessage {
            to: to.to_string(),
            subject: email.subject,
            html: email.html,
        };
        match self.sender.send(message).await {
            Ok(()) => tracing::debug!(template, "Notification sent"),
            Err(e) => tracing::warn!(template, error = %e, "Notification delivery failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::RecordingEmailSender;
    use crate::domain::suggestion::{NewSuggestion, Urgency};

    fn suggestion(anonymous: bool, email: Option<&str>) -> Suggestion {
        Suggestion::submit(NewSuggestion {
            category: None,
            message: "Más formación".into(),
            urgency: Urgency::Media,
            is_anonymous: anonymous,
            name: Some("Eva".into()),
            email: email.map(String::from),
            ip_address: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn suggestion_notification_respects_anonymity() {
        let sender = RecordingEmailSender::new();
        let notifier = Notifier::new(Arc::new(sender.clone()), None);

        notifier
            .suggestion_status_changed(&suggestion(true, Some("eva@example.com")))
            .await;
        notifier.suggestion_status_changed(&suggestion(false, None)).await;
        assert!(sender.sent().is_empty());

        notifier
            .suggestion_status_changed(&suggestion(false, Some("eva@example.com")))
            .await;
        assert_eq!(sender.sent_to("eva@example.com").len(), 1);
    }

    #[tokio::test]
    async fn delivery_failure_is_swallowed() {
        let sender = RecordingEmailSender::new();
        sender.fail_all();
        let notifier = Notifier::new(Arc::new(sender.clone()), Some("admin@example.com".into()));

        notifier
            .suggestion_status_changed(&suggestion(false, Some("eva@example.com")))
            .await;
        assert!(sender.sent().is_empty());
    }
}
