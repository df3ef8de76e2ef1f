//! Axum router for document endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    delete_document, download_document, generate_document, get_document, list_documents,
};

/// # Routes (all require authentication)
/// - `GET /` - List the caller's documents
/// - `POST /generate` - Generate a document
/// - `GET /{id}` - Get a document with its payload
/// - `DELETE /{id}` - Delete a document
/// - `GET /{id}/download` - Download the PDF
pub fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents))
        .route("/generate", post(generate_document))
        .route("/:id", get(get_document).delete(delete_document))
        .route("/:id/download", get(download_document))
}
