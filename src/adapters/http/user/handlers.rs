//! HTTP handlers for the caller's profile, photo, courses and membership.

use axum::extract::State;

use crate::application::handlers::auth::VerifySessionQuery;
use crate::application::handlers::documents::{DocumentKind, IssueDocumentCommand};
use crate::domain::foundation::{AuthenticatedUser, Timestamp};
use crate::domain::user::{ProfileUpdate, User};

use super::super::content::handlers::find_course;
use super::super::content::CourseView;
use super::super::documents::DocumentSummary;
use super::super::envelope::ApiResponse;
use super::super::error::ApiError;
use super::super::middleware::RequireAuth;
use super::super::params::ApiPath;
use super::super::state::AppState;
use super::super::validation::ValidatedJson;
use super::dto::{MembershipView, UpdateProfileRequest, UploadPhotoRequest, UserView};

/// The caller's account, reloaded so a deactivated member is refused.
async fn current_user(state: &AppState, caller: &AuthenticatedUser) -> Result<User, ApiError> {
    Ok(state
        .verify_session_handler()
        .handle(VerifySessionQuery { user_id: caller.id })
        .await?)
}

/// GET /api/user/profile - The caller's profile
pub async fn get_profile(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
) -> Result<ApiResponse<UserView>, ApiError> {
    let user = current_user(&state, &caller).await?;
    Ok(ApiResponse::ok(UserView::from(&user)))
}

/// PUT /api/user/profile - Update name, phone or department
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<ApiResponse<UserView>, ApiError> {
    let mut user = current_user(&state, &caller).await?;
    user.update_profile(ProfileUpdate {
        name: req.name.map(|n| n.trim().to_string()),
        phone: req.phone,
        department: req.department,
    });
    state.users.update(&user).await?;

    Ok(ApiResponse::ok(UserView::from(&user)).with_message("Perfil actualizado"))
}

/// PUT /api/user/photo - Replace the profile photo
pub async fn upload_photo(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    ValidatedJson(req): ValidatedJson<UploadPhotoRequest>,
) -> Result<ApiResponse<UserView>, ApiError> {
    let mut user = current_user(&state, &caller).await?;
    user.set_photo(req.content_type, req.data);
    state.users.update(&user).await?;

    tracing::info!(user_id = %user.id, "Profile photo updated");
    Ok(ApiResponse::ok(UserView::from(&user)).with_message("Foto actualizada"))
}

/// DELETE /api/user/photo - Remove the profile photo
pub async fn delete_photo(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
) -> Result<ApiResponse<UserView>, ApiError> {
    let mut user = current_user(&state, &caller).await?;
    if user.photo.is_some() {
        user.clear_photo();
        state.users.update(&user).await?;
    }
    Ok(ApiResponse::ok(UserView::from(&user)).with_message("Foto eliminada"))
}

/// GET /api/user/courses - Courses the caller is enrolled in
pub async fn my_courses(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
) -> Result<ApiResponse<Vec<CourseView>>, ApiError> {
    let courses = state
        .events
        .list()
        .await?
        .iter()
        .filter(|e| e.is_course() && e.is_enrolled(&caller.id))
        .map(|e| CourseView::for_user(e, &caller.id))
        .collect();
    Ok(ApiResponse::ok(courses))
}

/// POST /api/user/courses/{id}/certificate - Certificate for an enrolled course
pub async fn course_certificate(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<DocumentSummary>, ApiError> {
    let course = find_course(&state, &caller, &id).await?;
    let result = state
        .issue_document_handler()
        .handle(IssueDocumentCommand {
            user_id: caller.id,
            kind: DocumentKind::CourseCertificate {
                course_id: course.id,
            },
        })
        .await?;

    Ok(ApiResponse::created(DocumentSummary::from(&result.document))
        .with_message("Certificado generado"))
}

/// GET /api/user/membership - Membership status
pub async fn get_membership(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
) -> Result<ApiResponse<MembershipView>, ApiError> {
    let user = current_user(&state, &caller).await?;
    Ok(ApiResponse::ok(MembershipView {
        active: user.membership.is_active_at(Timestamp::now()),
        payments: user.payment_history.len(),
        info: user.membership,
    }))
}
