//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the union portal domain.

mod auth;
mod email;
mod errors;
mod ids;
mod money;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, Role};
pub use email::{is_plausible_email, Email};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    ChallengeId, DocumentId, EventId, FeeId, InvoiceId, PaymentId, SubmissionId, SuggestionId,
    TransactionId, UserId,
};
pub use money::Money;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
