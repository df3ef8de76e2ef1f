//! Document handlers.

mod issue_document;

pub use issue_document::{
    DocumentKind, IssueDocumentCommand, IssueDocumentHandler, IssueDocumentResult,
};
