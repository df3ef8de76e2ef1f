//! HTTP DTOs for document endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::document::{Document, DocumentMetadata, DocumentType};
use crate::domain::foundation::{DocumentId, Timestamp};

use super::super::validation::{FieldError, Validate, Validator};

/// Types a member may request directly. Receipts and course certificates
/// have their own flows.
pub const GENERATABLE_TYPES: [&str; 2] = ["affiliation_certificate", "membership_form"];

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateDocumentRequest {
    #[serde(rename = "type")]
    pub doc_type: String,
}

impl Validate for GenerateDocumentRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.field("type", Some(self.doc_type.as_str()))
            .required()
            .one_of(&GENERATABLE_TYPES);
        v.finish()
    }
}

/// Listing shape; never carries the payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: DocumentId,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub title: String,
    pub file_name: String,
    pub size: usize,
    pub metadata: DocumentMetadata,
    pub created_at: Timestamp,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id(),
            doc_type: doc.doc_type(),
            title: doc.title().to_string(),
            file_name: doc.file_name().to_string(),
            size: doc.size(),
            metadata: doc.metadata().clone(),
            created_at: doc.created_at(),
        }
    }
}

/// Single-document shape with the base64 payload.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentDetail {
    #[serde(flatten)]
    pub summary: DocumentSummary,
    pub data: String,
}

impl From<&Document> for DocumentDetail {
    fn from(doc: &Document) -> Self {
        Self {
            summary: doc.into(),
            data: doc.payload_base64(),
        }
    }
}
