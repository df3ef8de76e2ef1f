//! HTTP handlers for the admin panel.
//!
//! Every handler takes `RequireAdmin`; members get 403, anonymous callers 401.

use axum::extract::State;
use serde_json::Value;

use crate::application::handlers::admin::AdminStats;
use crate::domain::event::{Event, EventDetails};
use crate::domain::foundation::{DomainError, EventId, UserId};
use crate::domain::payment::UnmatchedPayment;
use crate::domain::submission::{AffiliationRequest, ContactMessage};
use crate::domain::user::{AccountStatus, User};
use crate::ports::{Page, UserFilter};

use super::super::envelope::ApiResponse;
use super::super::error::ApiError;
use super::super::middleware::RequireAdmin;
use super::super::params::{parse_id, ApiPath, ApiQuery};
use super::super::state::AppState;
use super::super::user::UserView;
use super::super::validation::ValidatedJson;
use super::dto::{ChangeAccountStatusRequest, UserListQuery};

const USER_NOT_FOUND: &str = "Usuario no encontrado";
const EVENT_NOT_FOUND: &str = "Evento no encontrado";

// ════════════════════════════════════════════════════════════════════════════════
// Dashboard
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/stats - Headline counters
pub async fn get_stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<ApiResponse<AdminStats>, ApiError> {
    let stats = state.admin_stats_handler().handle().await?;
    Ok(ApiResponse::ok(stats))
}

// ════════════════════════════════════════════════════════════════════════════════
// Users
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/users - Filtered, paginated member directory
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> Result<ApiResponse<Page<UserView>>, ApiError> {
    let pagination = query.pagination();
    let filter = UserFilter {
        status: query.status()?,
        role: query.role()?,
        search: query.search(),
        page: pagination.page(),
        per_page: pagination.per_page(),
    };

    let page = state.users.list(&filter).await?;
    Ok(ApiResponse::ok(page.map(|u| UserView::from(&u))))
}

async fn load_user(state: &AppState, raw_id: &str) -> Result<User, ApiError> {
    let id: UserId = parse_id(raw_id, USER_NOT_FOUND)?;
    state
        .users
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))
}

/// GET /api/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<UserView>, ApiError> {
    let user = load_user(&state, &id).await?;
    Ok(ApiResponse::ok(UserView::from(&user)))
}

/// PATCH /api/admin/users/{id}/status - Activate or deactivate an account
pub async fn change_user_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<ChangeAccountStatusRequest>,
) -> Result<ApiResponse<UserView>, ApiError> {
    let mut user = load_user(&state, &id).await?;
    if user.id == admin.id {
        return Err(ApiError::forbidden("No puedes cambiar el estado de tu propia cuenta"));
    }

    let target: AccountStatus = req.status.parse()?;
    user.change_status(target)?;
    state.users.update(&user).await?;

    tracing::info!(
        admin_id = %admin.id,
        user_id = %user.id,
        status = %req.status,
        "Account status changed"
    );
    Ok(ApiResponse::ok(UserView::from(&user)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Events and courses
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/events - Every event regardless of audience
pub async fn list_events(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<ApiResponse<Vec<Event>>, ApiError> {
    Ok(ApiResponse::ok(state.events.list().await?))
}

/// POST /api/admin/events - Publish an event or course
pub async fn create_event(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(details): ValidatedJson<EventDetails>,
) -> Result<ApiResponse<Event>, ApiError> {
    let event = Event::create(details, admin.id).map_err(DomainError::from)?;
    state.events.create(&event).await?;
    tracing::info!(admin_id = %admin.id, event_id = %event.id, "Event created");
    Ok(ApiResponse::created(event))
}

/// PUT /api/admin/events/{id} - Replace an event's details
///
/// Read receipts and enrolments are kept.
pub async fn update_event(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<String>,
    ValidatedJson(details): ValidatedJson<EventDetails>,
) -> Result<ApiResponse<Event>, ApiError> {
    let event_id: EventId = parse_id(&id, EVENT_NOT_FOUND)?;
    let mut event = state
        .events
        .find_by_id(&event_id)
        .await?
        .ok_or_else(|| ApiError::not_found(EVENT_NOT_FOUND))?;

    event.update(details).map_err(DomainError::from)?;
    state.events.update(&event).await?;
    tracing::info!(admin_id = %admin.id, event_id = %event.id, "Event updated");
    Ok(ApiResponse::ok(event))
}

/// DELETE /api/admin/events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<Value>, ApiError> {
    let event_id: EventId = parse_id(&id, EVENT_NOT_FOUND)?;
    if !state.events.delete(&event_id).await? {
        return Err(ApiError::not_found(EVENT_NOT_FOUND));
    }
    tracing::info!(admin_id = %admin.id, event_id = %event_id, "Event deleted");
    Ok(ApiResponse::message("Evento eliminado"))
}

// ════════════════════════════════════════════════════════════════════════════════
// Inbox
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/unmatched-payments - Payments no account could be matched to
pub async fn list_unmatched_payments(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<ApiResponse<Vec<UnmatchedPayment>>, ApiError> {
    Ok(ApiResponse::ok(state.unmatched_payments.list().await?))
}

/// GET /api/admin/contact-messages
pub async fn list_contact_messages(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<ApiResponse<Vec<ContactMessage>>, ApiError> {
    Ok(ApiResponse::ok(state.submissions.list_contacts().await?))
}

/// GET /api/admin/affiliations
pub async fn list_affiliations(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<ApiResponse<Vec<AffiliationRequest>>, ApiError> {
    Ok(ApiResponse::ok(state.submissions.list_affiliations().await?))
}
