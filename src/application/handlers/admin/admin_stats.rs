//! AdminStatsHandler - dashboard counters for the admin panel.

use std::sync::Arc;

use serde::Serialize;

use crate::application::ApplicationError;
use crate::domain::foundation::Timestamp;
use crate::domain::suggestion::SuggestionStatus;
use crate::ports::{
    DocumentRepository, SuggestionRepository, UnmatchedPaymentRepository, UserRepository,
    UserStats,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub users: UserStats,
    pub documents: u64,
    pub pending_suggestions: u64,
    pub unmatched_payments: u64,
}

pub struct AdminStatsHandler {
    users: Arc<dyn UserRepository>,
    documents: Arc<dyn DocumentRepository>,
    suggestions: Arc<dyn SuggestionRepository>,
    unmatched: Arc<dyn UnmatchedPaymentRepository>,
}

impl AdminStatsHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        documents: Arc<dyn DocumentRepository>,
        suggestions: Arc<dyn SuggestionRepository>,
        unmatched: Arc<dyn UnmatchedPaymentRepository>,
    ) -> Self {
        Self {
            users,
            documents,
            suggestions,
            unmatched,
        }
    }

    pub async fn handle(&self) -> Result<AdminStats, ApplicationError> {
        let (users, documents, pending_suggestions, unmatched_payments) = tokio::try_join!(
            self.users.stats(Timestamp::now()),
            self.documents.count(),
            self.suggestions.count_by_status(SuggestionStatus::Pendiente),
            self.unmatched.count_unresolved(),
        )?;

        Ok(AdminStats {
            users,
            documents,
            pending_suggestions,
            unmatched_payments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::foundation::{Email, Money};
    use crate::domain::payment::{CompletedCheckout, UnmatchedPayment};
    use crate::domain::suggestion::{NewSuggestion, Suggestion, Urgency};

    #[tokio::test]
    async fn counts_every_section() {
        let fx = Fixture::new();
        fx.member("ana@example.com").await;
        fx.admin("junta@example.com").await;

        let suggestion = Suggestion::submit(NewSuggestion {
            category: None,
            message: "Más plazas de aparcamiento".into(),
            urgency: Urgency::Baja,
            is_anonymous: true,
            name: None,
            email: None,
            ip_address: None,
        })
        .unwrap();
        fx.suggestions.create(&suggestion).await.unwrap();

        let checkout = CompletedCheckout {
            session_id: "cs_test_x".into(),
            payer_email: Some(Email::parse("nadie@example.com").unwrap()),
            amount: Money::from_cents(3600),
            currency: "eur".into(),
            description: "Cuota".into(),
            user_id: None,
        };
        fx.unmatched
            .record(&UnmatchedPayment::from_checkout(&checkout))
            .await
            .unwrap();

        let stats = AdminStatsHandler::new(
            fx.users.clone(),
            fx.documents.clone(),
            fx.suggestions.clone(),
            fx.unmatched.clone(),
        )
        .handle()
        .await
        .unwrap();

        assert_eq!(stats.users.total, 2);
        assert_eq!(stats.users.admins, 1);
        assert_eq!(stats.documents, 0);
        assert_eq!(stats.pending_suggestions, 1);
        assert_eq!(stats.unmatched_payments, 1);
    }
}
