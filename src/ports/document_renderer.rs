//! Document rendering port.
//!
//! Renders one of the four fixed templates to a PDF byte blob. Rendering is
//! pure: no I/O, no partial output.

use thiserror::Error;

use crate::domain::document::DocumentType;
use crate::domain::event::Event;
use crate::domain::user::{PaymentEntry, User};

/// Input for one rendering.
#[derive(Debug, Clone, Copy)]
pub enum RenderRequest<'a> {
    AffiliationCertificate { user: &'a User },
    PaymentReceipt { user: &'a User, payment: &'a PaymentEntry },
    CourseCertificate { user: &'a User, course: &'a Event },
    MembershipForm { user: &'a User },
}

impl RenderRequest<'_> {
    pub fn document_type(&self) -> DocumentType {
        match self {
            RenderRequest::AffiliationCertificate { .. } => DocumentType::AffiliationCertificate,
            RenderRequest::PaymentReceipt { .. } => DocumentType::PaymentReceipt,
            RenderRequest::CourseCertificate { .. } => DocumentType::CourseCertificate,
            RenderRequest::MembershipForm { .. } => DocumentType::MembershipForm,
        }
    }

    pub fn user(&self) -> &User {
        match self {
            RenderRequest::AffiliationCertificate { user }
            | RenderRequest::PaymentReceipt { user, .. }
            | RenderRequest::CourseCertificate { user, .. }
            | RenderRequest::MembershipForm { user } => user,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub size: usize,
}

impl RenderedDocument {
    pub fn new(bytes: Vec<u8>) -> Self {
        let size = bytes.len();
        Self { bytes, size }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("missing data for {document}: {field}")]
    MissingData {
        document: &'static str,
        field: &'static str,
    },

    #[error("rendering failed: {0}")]
    Failed(String),
}

pub trait DocumentRenderer: Send + Sync {
    fn render(&self, request: RenderRequest<'_>) -> Result<RenderedDocument, RenderError>;
}
