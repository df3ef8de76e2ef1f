//! HandlePaymentWebhookHandler - turns verified provider callbacks into
//! payment-history entries and receipts.
//!
//! Only signature verification can fail the request. Once the event is
//! authenticated every reconciliation problem is logged and reported as an
//! outcome, so the provider always receives a 200 and does not redeliver.

use std::sync::Arc;

use crate::adapters::email::Notifier;
use crate::application::ApplicationError;
use crate::domain::foundation::Timestamp;
use crate::domain::payment::{
    CheckoutSessionObject, CompletedCheckout, ReconciliationOutcome, StripeEvent,
    StripeEventType, UnmatchedPayment,
};
use crate::domain::user::{PaymentEntry, User};
use crate::ports::{PaymentProvider, UnmatchedPaymentRepository, UserRepository};

use crate::application::handlers::documents::{
    DocumentKind, IssueDocumentCommand, IssueDocumentHandler,
};

#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Value of the `Stripe-Signature` header.
    pub signature: String,
}

#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookResult {
    pub event_id: String,
    pub outcome: ReconciliationOutcome,
}

pub struct HandlePaymentWebhookHandler {
    provider: Arc<dyn PaymentProvider>,
    users: Arc<dyn UserRepository>,
    unmatched: Arc<dyn UnmatchedPaymentRepository>,
    documents: Arc<IssueDocumentHandler>,
    notifier: Notifier,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        users: Arc<dyn UserRepository>,
        unmatched: Arc<dyn UnmatchedPaymentRepository>,
        documents: Arc<IssueDocumentHandler>,
        notifier: Notifier,
    ) -> Self {
        Self {
            provider,
            users,
            unmatched,
            documents,
            notifier,
        }
    }

    /// # Errors
    ///
    /// Only `ApplicationError::Webhook`, when the signature or body cannot be
    /// authenticated.
    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, ApplicationError> {
        let event = self
            .provider
            .verify_webhook(&cmd.payload, &cmd.signature)
            .map_err(|e| {
                tracing::warn!(error = %e, "Webhook rejected");
                e
            })?;

        let outcome = match event.parsed_type() {
            StripeEventType::CheckoutSessionCompleted => self.reconcile(&event).await,
            _ => {
                tracing::info!(event_id = %event.id, event_type = %event.event_type, "Webhook event ignored");
                ReconciliationOutcome::Ignored {
                    event_type: event.event_type.clone(),
                }
            }
        };

        Ok(HandlePaymentWebhookResult {
            event_id: event.id,
            outcome,
        })
    }

    async fn reconcile(&self, event: &StripeEvent) -> ReconciliationOutcome {
        match self.try_reconcile(event).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(event_id = %event.id, error = %e, "Payment reconciliation failed");
                ReconciliationOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_reconcile(
        &self,
        event: &StripeEvent,
    ) -> Result<ReconciliationOutcome, ApplicationError> {
        let session: CheckoutSessionObject = event
            .deserialize_object()
            .map_err(|e| ApplicationError::validation("data.object", e.to_string()))?;
        let checkout = CompletedCheckout::from_session(&session)?;

        let Some(mut user) = self.resolve_user(&checkout).await? else {
            return self.queue_unmatched(&checkout).await;
        };

        if user.has_payment_for_session(&checkout.session_id) {
            tracing::info!(user_id = %user.id, session_id = %checkout.session_id, "Checkout already reconciled");
            return Ok(ReconciliationOutcome::AlreadyRecorded { user_id: user.id });
        }

        let entry = PaymentEntry::new(
            checkout.amount,
            checkout.currency.clone(),
            checkout.description.clone(),
            Some(checkout.session_id.clone()),
            Timestamp::now(),
        );
        let payment_id = entry.id;
        user.append_payment(entry);
        self.users.update(&user).await?;
        tracing::info!(
            user_id = %user.id,
            session_id = %checkout.session_id,
            amount = %checkout.amount,
            "Payment recorded"
        );

        let receipt_issued = match self
            .documents
            .handle(IssueDocumentCommand {
                user_id: user.id,
                kind: DocumentKind::PaymentReceipt { payment_id },
            })
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(user_id = %user.id, payment_id = %payment_id, error = %e, "Receipt generation failed");
                false
            }
        };

        self.notifier
            .payment_confirmation(&user, checkout.amount, &checkout.currency, &checkout.description)
            .await;

        Ok(ReconciliationOutcome::Reconciled {
            user_id: user.id,
            payment_id,
            receipt_issued,
        })
    }

    /// Email on the session first, then the `user_id` metadata we attach
    /// when creating the session.
    async fn resolve_user(&self, checkout: &CompletedCheckout) -> Result<Option<User>, ApplicationError> {
        if let Some(email) = &checkout.payer_email {
            if let Some(user) = self.users.find_by_email(email).await? {
                return Ok(Some(user));
            }
        }
        if let Some(user_id) = &checkout.user_id {
            return Ok(self.users.find_by_id(user_id).await?);
        }
        Ok(None)
    }

    async fn queue_unmatched(
        &self,
        checkout: &CompletedCheckout,
    ) -> Result<ReconciliationOutcome, ApplicationError> {
        let record = UnmatchedPayment::from_checkout(checkout);
        let inserted = self.unmatched.record(&record).await?;
        tracing::warn!(
            session_id = %checkout.session_id,
            email = ?checkout.payer_email.as_ref().map(|e| e.as_str()),
            amount = %checkout.amount,
            newly_queued = inserted,
            "Completed payment has no matching account; queued for manual reconciliation"
        );
        Ok(ReconciliationOutcome::Unmatched {
            session_id: checkout.session_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{Fixture, WEBHOOK_SECRET};
    use crate::domain::document::DocumentType;
    use crate::domain::payment::{sign_payload, WebhookError};
    use crate::ports::DocumentRepository;
    use serde_json::json;

    fn handler(fx: &Fixture) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            fx.payments.clone(),
            fx.users.clone(),
            fx.unmatched.clone(),
            Arc::new(fx.issue_documents()),
            fx.notifier(),
        )
    }

    fn completed_event(session_id: &str, email: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "id": "evt_test_1",
            "type": "checkout.session.completed",
            "created": 1_700_000_000,
            "livemode": false,
            "data": { "object": {
                "id": session_id,
                "object": "checkout.session",
                "customer_email": email,
                "amount_total": 3600,
                "currency": "eur",
                "payment_status": "paid",
                "metadata": { "description": "Cuota anual 2024" }
            }}
        }))
        .unwrap()
    }

    fn signed(payload: Vec<u8>) -> HandlePaymentWebhookCommand {
        let signature = sign_payload(WEBHOOK_SECRET, chrono::Utc::now().timestamp(), &payload);
        HandlePaymentWebhookCommand { payload, signature }
    }

    #[tokio::test]
    async fn completed_checkout_appends_one_payment_and_one_receipt() {
        let fx = Fixture::new();
        let user = fx.member("ana@example.com").await;

        let result = handler(&fx)
            .handle(signed(completed_event("cs_test_1", "ana@example.com")))
            .await
            .unwrap();

        assert!(matches!(
            result.outcome,
            ReconciliationOutcome::Reconciled { receipt_issued: true, .. }
        ));
        let stored = fx.users.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.payment_history.len(), 1);
        assert_eq!(stored.payment_history[0].description, "Cuota anual 2024");
        assert!(stored.membership.is_active_at(Timestamp::now()));

        let docs = fx.documents.list_by_owner(&user.id).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].doc_type(), DocumentType::PaymentReceipt);
        assert_eq!(stored.payment_history[0].receipt_document_id, Some(docs[0].id()));
    }

    #[tokio::test]
    async fn redelivered_event_is_recorded_once() {
        let fx = Fixture::new();
        let user = fx.member("ana@example.com").await;
        let handler = handler(&fx);

        handler
            .handle(signed(completed_event("cs_test_1", "ana@example.com")))
            .await
            .unwrap();
        let second = handler
            .handle(signed(completed_event("cs_test_1", "ana@example.com")))
            .await
            .unwrap();

        assert_eq!(
            second.outcome,
            ReconciliationOutcome::AlreadyRecorded { user_id: user.id }
        );
        let stored = fx.users.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.payment_history.len(), 1);
        assert_eq!(fx.documents.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn invalid_signature_changes_nothing() {
        let fx = Fixture::new();
        let user = fx.member("ana@example.com").await;
        let payload = completed_event("cs_test_1", "ana@example.com");
        let signature = sign_payload("whsec_wrong", chrono::Utc::now().timestamp(), &payload);

        let err = handler(&fx)
            .handle(HandlePaymentWebhookCommand { payload, signature })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Webhook(WebhookError::InvalidSignature)));
        let stored = fx.users.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(stored.payment_history.is_empty());
        assert_eq!(fx.documents.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_payer_is_queued() {
        let fx = Fixture::new();

        let result = handler(&fx)
            .handle(signed(completed_event("cs_test_9", "nadie@example.com")))
            .await
            .unwrap();

        assert_eq!(
            result.outcome,
            ReconciliationOutcome::Unmatched {
                session_id: "cs_test_9".into()
            }
        );
        let queued = fx.unmatched.list().await.unwrap();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].email.as_deref(), Some("nadie@example.com"));
    }

    #[tokio::test]
    async fn other_event_types_are_acknowledged() {
        let fx = Fixture::new();
        let payload = serde_json::to_vec(&json!({
            "id": "evt_test_2",
            "type": "payment_intent.created",
            "created": 1_700_000_000,
            "data": { "object": {} }
        }))
        .unwrap();

        let result = handler(&fx).handle(signed(payload)).await.unwrap();
        assert!(matches!(result.outcome, ReconciliationOutcome::Ignored { .. }));
    }

    #[tokio::test]
    async fn malformed_session_is_reported_not_raised() {
        let fx = Fixture::new();
        let payload = serde_json::to_vec(&json!({
            "id": "evt_test_3",
            "type": "checkout.session.completed",
            "created": 1_700_000_000,
            "data": { "object": { "id": "cs_test_3" } }
        }))
        .unwrap();

        let result = handler(&fx).handle(signed(payload)).await.unwrap();
        assert!(matches!(result.outcome, ReconciliationOutcome::Failed { .. }));
    }
}
