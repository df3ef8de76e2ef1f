//! CreateCheckoutSessionHandler - starts a hosted checkout for the caller.

use std::sync::Arc;

use crate::application::ApplicationError;
use crate::config::AppConfig;
use crate::domain::foundation::{ErrorCode, Money, UserId};
use crate::domain::payment::{CheckoutRequest, CheckoutSession, DEFAULT_PAYMENT_DESCRIPTION};
use crate::ports::{PaymentProvider, UserRepository};

/// Amount and redirect targets used when the caller does not override them.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub currency: String,
    pub membership_fee: Money,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        let base = config.server.public_base_url.trim_end_matches('/');
        Self {
            currency: config.payment.currency.to_lowercase(),
            membership_fee: Money::from_cents(config.payment.membership_fee_cents),
            success_url: format!(
                "{}{}?session_id={{CHECKOUT_SESSION_ID}}",
                base, config.payment.success_path
            ),
            cancel_url: format!("{}{}", base, config.payment.cancel_path),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionCommand {
    pub user_id: UserId,
    /// Defaults to the membership fee.
    pub amount: Option<Money>,
    pub description: Option<String>,
}

pub struct CreateCheckoutSessionHandler {
    users: Arc<dyn UserRepository>,
    provider: Arc<dyn PaymentProvider>,
    settings: CheckoutSettings,
}

impl CreateCheckoutSessionHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        provider: Arc<dyn PaymentProvider>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            users,
            provider,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutSessionCommand,
    ) -> Result<CheckoutSession, ApplicationError> {
        let user = self.users.find_by_id(&cmd.user_id).await?.ok_or_else(|| {
            ApplicationError::not_found(ErrorCode::UserNotFound, "Usuario no encontrado")
        })?;

        let amount = cmd.amount.unwrap_or(self.settings.membership_fee);
        if !amount.is_positive() {
            return Err(ApplicationError::validation("amount", "El importe debe ser positivo"));
        }
        let description = cmd
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_PAYMENT_DESCRIPTION.to_string());

        let request = CheckoutRequest {
            user_id: user.id,
            customer_email: user.email.clone(),
            amount,
            currency: self.settings.currency.clone(),
            description,
            success_url: self.settings.success_url.clone(),
            cancel_url: self.settings.cancel_url.clone(),
        };

        let session = self
            .provider
            .create_checkout_session(&request)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Checkout session creation failed");
                e
            })?;

        tracing::info!(
            user_id = %user.id,
            session_id = %session.session_id,
            amount = %amount,
            "Checkout session created"
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::ports::PaymentError;

    fn settings() -> CheckoutSettings {
        CheckoutSettings {
            currency: "eur".into(),
            membership_fee: Money::from_cents(3600),
            success_url: "https://sindicato.example/pago/exito".into(),
            cancel_url: "https://sindicato.example/pago/cancelado".into(),
        }
    }

    #[tokio::test]
    async fn defaults_to_membership_fee() {
        let fx = Fixture::new();
        let user = fx.member("ana@example.com").await;
        let handler =
            CreateCheckoutSessionHandler::new(fx.users.clone(), fx.payments.clone(), settings());

        let session = handler
            .handle(CreateCheckoutSessionCommand {
                user_id: user.id,
                amount: None,
                description: None,
            })
            .await
            .unwrap();

        assert!(session.session_id.starts_with("cs_test_"));
        let requests = fx.payments.checkout_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].amount, Money::from_cents(3600));
        assert_eq!(requests[0].customer_email.as_str(), "ana@example.com");
        assert_eq!(requests[0].description, DEFAULT_PAYMENT_DESCRIPTION);
    }

    #[tokio::test]
    async fn rejects_non_positive_amount() {
        let fx = Fixture::new();
        let user = fx.member("ana@example.com").await;
        let handler =
            CreateCheckoutSessionHandler::new(fx.users.clone(), fx.payments.clone(), settings());

        let err = handler
            .handle(CreateCheckoutSessionCommand {
                user_id: user.id,
                amount: Some(Money::ZERO),
                description: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::ValidationFailed));
        assert!(fx.payments.checkout_requests().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let fx = Fixture::new();
        let user = fx.member("ana@example.com").await;
        fx.payments.set_error(PaymentError::network("timeout"));
        let handler =
            CreateCheckoutSessionHandler::new(fx.users.clone(), fx.payments.clone(), settings());

        let err = handler
            .handle(CreateCheckoutSessionCommand {
                user_id: user.id,
                amount: None,
                description: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Payment(_)));
    }
}
