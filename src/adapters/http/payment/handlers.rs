//! HTTP handlers for hosted checkout and the provider webhook.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;

use crate::application::handlers::auth::VerifySessionQuery;
use crate::application::handlers::payment::{
    CreateCheckoutSessionCommand, HandlePaymentWebhookCommand,
};
use crate::domain::foundation::{DomainError, Money};
use crate::domain::payment::CheckoutSession;
use crate::domain::user::PaymentEntry;

use super::super::envelope::ApiResponse;
use super::super::error::ApiError;
use super::super::middleware::RequireAuth;
use super::super::state::AppState;
use super::super::validation::ValidatedJson;
use super::dto::{CheckoutRequestBody, WebhookAck};

pub const SIGNATURE_HEADER: &str = "stripe-signature";

// ════════════════════════════════════════════════════════════════════════════════
// Checkout
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payment/create-checkout-session - Start a hosted checkout
pub async fn create_checkout_session(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    ValidatedJson(req): ValidatedJson<CheckoutRequestBody>,
) -> Result<ApiResponse<CheckoutSession>, ApiError> {
    let amount = req
        .amount
        .map(Money::from_major)
        .transpose()
        .map_err(DomainError::from)?;

    let session = state
        .checkout_handler()
        .handle(CreateCheckoutSessionCommand {
            user_id: caller.id,
            amount,
            description: req.description,
        })
        .await?;
    Ok(ApiResponse::ok(session))
}

/// GET /api/payment/history - The caller's recorded payments, newest first
pub async fn payment_history(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
) -> Result<ApiResponse<Vec<PaymentEntry>>, ApiError> {
    let user = state
        .verify_session_handler()
        .handle(VerifySessionQuery { user_id: caller.id })
        .await?;

    let mut payments = user.payment_history;
    payments.reverse();
    Ok(ApiResponse::ok(payments))
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/webhook - Provider callback
///
/// The body is taken as raw bytes because the signature covers the exact
/// payload. Anything after authentication is acknowledged with 200 so the
/// provider does not retry events the portal has already logged.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<ApiResponse<WebhookAck>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("Falta la cabecera Stripe-Signature".into()))?;

    let result = state
        .webhook_handler()
        .handle(HandlePaymentWebhookCommand {
            payload: body.to_vec(),
            signature: signature.to_string(),
        })
        .await?;

    Ok(ApiResponse::ok(WebhookAck::new(result.event_id, &result.outcome)))
}
