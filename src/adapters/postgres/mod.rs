//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! Every aggregate is persisted whole as JSONB alongside a few indexed
//! columns used for lookups and filtering. The schema lives in the
//! `migrations/` directory at the crate root.
//!
//! - `PostgresUserRepository` - Accounts, unique on email
//! - `PostgresDocumentRepository` - Generated PDFs
//! - `PostgresEventRepository` - Events and courses
//! - `PostgresSuggestionRepository` - Suggestion box
//! - `PostgresSubmissionRepository` - Contact and affiliation forms
//! - `PostgresUnmatchedPaymentRepository` - Payments awaiting manual matching
//! - Accounting: transactions, invoices and membership fees

mod accounting_repository;
mod document_repository;
mod event_repository;
mod submission_repository;
mod suggestion_repository;
mod support;
mod user_repository;

pub use accounting_repository::{
    PostgresInvoiceRepository, PostgresMembershipFeeRepository, PostgresTransactionRepository,
};
pub use document_repository::PostgresDocumentRepository;
pub use event_repository::PostgresEventRepository;
pub use submission_repository::{
    PostgresSubmissionRepository, PostgresUnmatchedPaymentRepository,
};
pub use suggestion_repository::PostgresSuggestionRepository;
pub use user_repository::PostgresUserRepository;
