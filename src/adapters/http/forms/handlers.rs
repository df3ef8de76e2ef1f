//! HTTP handlers for the captcha and the public forms.

use axum::extract::State;

use crate::application::handlers::submissions::{SubmitAffiliationCommand, SubmitContactCommand};
use crate::domain::captcha::ChallengePrompt;
use crate::domain::submission::AffiliationForm;

use super::super::envelope::ApiResponse;
use super::super::error::ApiError;
use super::super::middleware::ClientIp;
use super::super::state::AppState;
use super::super::validation::ValidatedJson;
use super::dto::{AffiliationSubmitRequest, ContactRequest, SubmissionReceipt};

/// GET /api/captcha - Issue an arithmetic challenge
pub async fn issue_captcha(
    State(state): State<AppState>,
) -> Result<ApiResponse<ChallengePrompt>, ApiError> {
    let prompt = state.captcha_handler().handle().await?;
    Ok(ApiResponse::ok(prompt))
}

/// POST /api/contact/submit - Public contact form
pub async fn submit_contact(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    ValidatedJson(req): ValidatedJson<ContactRequest>,
) -> Result<ApiResponse<SubmissionReceipt>, ApiError> {
    let message = state
        .contact_handler()
        .handle(SubmitContactCommand {
            captcha: req.captcha(),
            name: req.name,
            email: req.email,
            subject: req.subject,
            message: req.message,
            ip_address: ip,
        })
        .await?;

    Ok(ApiResponse::created(SubmissionReceipt {
        id: message.id,
        received_at: message.created_at,
    })
    .with_message("Mensaje enviado. Te responderemos lo antes posible"))
}

/// POST /api/affiliations/submit - Public affiliation request
pub async fn submit_affiliation(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<AffiliationSubmitRequest>,
) -> Result<ApiResponse<SubmissionReceipt>, ApiError> {
    let captcha = req.captcha();
    let request = state
        .affiliation_handler()
        .handle(SubmitAffiliationCommand {
            captcha,
            email: req.email,
            form: AffiliationForm {
                name: req.name,
                phone: req.phone,
                department: req.department,
                workplace: req.workplace,
                comments: req.comments,
            },
        })
        .await?;

    Ok(ApiResponse::created(SubmissionReceipt {
        id: request.id,
        received_at: request.created_at,
    })
    .with_message("Solicitud de afiliación recibida"))
}
