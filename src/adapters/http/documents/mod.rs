//! HTTP adapter for member documents.
//!
//! - `GET /api/documents`
//! - `GET /api/documents/{id}`
//! - `GET /api/documents/{id}/download`
//! - `POST /api/documents/generate`
//! - `DELETE /api/documents/{id}`

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{DocumentDetail, DocumentSummary};
pub use routes::document_routes;
