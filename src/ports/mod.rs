//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `UserRepository`, `DocumentRepository`, `EventRepository`
//! - `TransactionRepository`, `InvoiceRepository`, `MembershipFeeRepository`
//! - `SuggestionRepository`, `SubmissionRepository`, `UnmatchedPaymentRepository`
//!
//! ## Security Ports
//!
//! - `PasswordHasher` - Salted slow password digests
//! - `TokenIssuer` / `SessionValidator` - Signed session tokens
//! - `RateLimiter` - Fixed-window request budgets
//! - `ChallengeStore` - Shared captcha challenge state
//!
//! ## Integration Ports
//!
//! - `PaymentProvider` - Hosted checkout and webhook verification
//! - `DocumentRenderer` - PDF templates
//! - `EmailSender` - Outbound mail transport

mod accounting_repository;
mod challenge_store;
mod document_renderer;
mod document_repository;
mod email_sender;
mod event_repository;
mod password_hasher;
mod payment_provider;
mod rate_limiter;
mod session_validator;
mod submission_repository;
mod suggestion_repository;
mod token_issuer;
mod user_repository;

pub use accounting_repository::{
    FeeFilter, InvoiceRepository, MembershipFeeRepository, TransactionFilter,
    TransactionRepository,
};
pub use challenge_store::ChallengeStore;
pub use document_renderer::{DocumentRenderer, RenderError, RenderRequest, RenderedDocument};
pub use document_repository::DocumentRepository;
pub use email_sender::{EmailError, EmailMessage, EmailSender};
pub use event_repository::EventRepository;
pub use password_hasher::{PasswordError, PasswordHasher};
pub use payment_provider::{PaymentError, PaymentErrorCode, PaymentProvider};
pub use rate_limiter::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitScope,
    RateLimitStatus, RateLimiter,
};
pub use session_validator::SessionValidator;
pub use submission_repository::{SubmissionRepository, UnmatchedPaymentRepository};
pub use suggestion_repository::SuggestionRepository;
pub use token_issuer::{IssuedToken, TokenIssuer};
pub use user_repository::{Page, UserFilter, UserRepository, UserStats};
