//! In-memory repositories.
//!
//! Used by tests and by local runs without a database. Each repository keeps
//! its records behind a `tokio::sync::RwLock` and applies the same
//! uniqueness rules as the PostgreSQL adapters.

mod accounting;
mod documents;
mod events;
mod submissions;
mod suggestions;
mod users;

pub use accounting::{
    InMemoryInvoiceRepository, InMemoryMembershipFeeRepository, InMemoryTransactionRepository,
};
pub use documents::InMemoryDocumentRepository;
pub use events::InMemoryEventRepository;
pub use submissions::{InMemorySubmissionRepository, InMemoryUnmatchedPaymentRepository};
pub use suggestions::InMemorySuggestionRepository;
pub use users::InMemoryUserRepository;
