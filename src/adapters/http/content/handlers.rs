//! HTTP handlers for courses and events.

use axum::extract::State;

use crate::domain::event::Event;
use crate::domain::foundation::{AuthenticatedUser, EventId, Timestamp};

use super::super::envelope::ApiResponse;
use super::super::error::ApiError;
use super::super::middleware::RequireAuth;
use super::super::params::{parse_id, ApiPath};
use super::super::state::AppState;
use super::dto::{CourseView, EventView, ReadAck};

const COURSE_NOT_FOUND: &str = "Curso no encontrado";
const EVENT_NOT_FOUND: &str = "Evento no encontrado";

// ════════════════════════════════════════════════════════════════════════════════
// Courses
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/courses - Courses visible to the caller
pub async fn list_courses(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<ApiResponse<Vec<CourseView>>, ApiError> {
    let courses = state
        .events
        .list()
        .await?
        .iter()
        .filter(|e| e.is_course() && e.is_visible_to(&user.id, user.role))
        .map(|e| CourseView::for_user(e, &user.id))
        .collect();
    Ok(ApiResponse::ok(courses))
}

/// GET /api/courses/{id} - One course
pub async fn get_course(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<CourseView>, ApiError> {
    let course = find_course(&state, &user, &id).await?;
    Ok(ApiResponse::ok(CourseView::for_user(&course, &user.id)))
}

/// POST /api/courses/{id}/enroll - Enrol the caller
pub async fn enroll_course(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<CourseView>, ApiError> {
    let mut course = find_course(&state, &user, &id).await?;
    course.enroll(user.id)?;
    state.events.update(&course).await?;

    tracing::info!(user_id = %user.id, course_id = %course.id, "Enrolled in course");
    Ok(ApiResponse::ok(CourseView::for_user(&course, &user.id)).with_message("Inscripción realizada"))
}

pub(crate) async fn find_course(
    state: &AppState,
    user: &AuthenticatedUser,
    raw_id: &str,
) -> Result<Event, ApiError> {
    let id: EventId = parse_id(raw_id, COURSE_NOT_FOUND)?;
    state
        .events
        .find_by_id(&id)
        .await?
        .filter(|e| e.is_course() && e.is_visible_to(&user.id, user.role))
        .ok_or_else(|| ApiError::not_found(COURSE_NOT_FOUND))
}

// ════════════════════════════════════════════════════════════════════════════════
// Events
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/events - Events visible to the caller, with their read flag
pub async fn list_events(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<ApiResponse<Vec<EventView>>, ApiError> {
    let events = state
        .events
        .list()
        .await?
        .iter()
        .filter(|e| e.is_visible_to(&user.id, user.role))
        .map(|e| EventView::for_user(e, &user.id))
        .collect();
    Ok(ApiResponse::ok(events))
}

/// POST /api/events/{id}/read - Acknowledge an event; repeating is a no-op
pub async fn mark_event_read(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<ReadAck>, ApiError> {
    let id: EventId = parse_id(&id, EVENT_NOT_FOUND)?;
    let mut event = state
        .events
        .find_by_id(&id)
        .await?
        .filter(|e| e.is_visible_to(&user.id, user.role))
        .ok_or_else(|| ApiError::not_found(EVENT_NOT_FOUND))?;

    if event.mark_read(user.id, Timestamp::now()) {
        state.events.update(&event).await?;
    }
    Ok(ApiResponse::ok(ReadAck { read: true }))
}
