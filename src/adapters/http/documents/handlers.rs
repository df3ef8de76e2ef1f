//! HTTP handlers for the caller's documents.
//!
//! Every lookup is scoped to the caller: a document owned by someone else
//! answers exactly like one that does not exist.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::application::handlers::documents::{DocumentKind, IssueDocumentCommand};
use crate::domain::document::{Document, DocumentType};
use crate::domain::foundation::{AuthenticatedUser, DocumentId};

use super::super::envelope::ApiResponse;
use super::super::error::ApiError;
use super::super::middleware::RequireAuth;
use super::super::params::{parse_id, ApiPath};
use super::super::state::AppState;
use super::super::validation::ValidatedJson;
use super::dto::{DocumentDetail, DocumentSummary, GenerateDocumentRequest};

const DOCUMENT_NOT_FOUND: &str = "Documento no encontrado";

/// GET /api/documents - List the caller's documents
pub async fn list_documents(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<ApiResponse<Vec<DocumentSummary>>, ApiError> {
    let documents = state.documents.list_by_owner(&user.id).await?;
    Ok(ApiResponse::ok(documents.iter().map(DocumentSummary::from).collect()))
}

/// GET /api/documents/{id} - Get one document including its payload
pub async fn get_document(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<DocumentDetail>, ApiError> {
    let document = find_owned(&state, &user, &id).await?;
    Ok(ApiResponse::ok(DocumentDetail::from(&document)))
}

/// GET /api/documents/{id}/download - Stream the PDF
pub async fn download_document(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let document = find_owned(&state, &user, &id).await?;
    let disposition = format!("attachment; filename=\"{}\"", document.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.payload().to_vec(),
    ))
}

/// POST /api/documents/generate - Generate an affiliation certificate or membership form
pub async fn generate_document(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidatedJson(req): ValidatedJson<GenerateDocumentRequest>,
) -> Result<ApiResponse<DocumentSummary>, ApiError> {
    let kind = match req.doc_type.parse::<DocumentType>()? {
        DocumentType::AffiliationCertificate => DocumentKind::AffiliationCertificate,
        DocumentType::MembershipForm => DocumentKind::MembershipForm,
        other => {
            return Err(ApiError::field(
                "type",
                format!("{} no se puede generar directamente", other.title()),
            ))
        }
    };

    let result = state
        .issue_document_handler()
        .handle(IssueDocumentCommand {
            user_id: user.id,
            kind,
        })
        .await?;

    Ok(ApiResponse::created(DocumentSummary::from(&result.document))
        .with_message("Documento generado"))
}

/// DELETE /api/documents/{id} - Delete one of the caller's documents
pub async fn delete_document(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<serde_json::Value>, ApiError> {
    let document = find_owned(&state, &user, &id).await?;
    state.documents.delete(&document.id()).await?;

    if let Some(mut account) = state.users.find_by_id(&user.id).await? {
        if account.unlink_document(document.id()) {
            state.users.update(&account).await?;
        }
    }

    tracing::info!(user_id = %user.id, document_id = %document.id(), "Document deleted");
    Ok(ApiResponse::message("Documento eliminado"))
}

async fn find_owned(
    state: &AppState,
    user: &AuthenticatedUser,
    raw_id: &str,
) -> Result<Document, ApiError> {
    let id: DocumentId = parse_id(raw_id, DOCUMENT_NOT_FOUND)?;
    state
        .documents
        .find_by_id(&id)
        .await?
        .filter(|doc| doc.is_owned_by(&user.id))
        .ok_or_else(|| ApiError::not_found(DOCUMENT_NOT_FOUND))
}
