//! Email adapters.
//!
//! - `ResendEmailSender` - Resend HTTP API transport
//! - `RecordingEmailSender` - keeps messages in memory for tests
//! - `templates` - HTML bodies for every notification
//! - `Notifier` - best-effort delivery; failures are logged, never returned

mod notifier;
mod recording;
mod resend;
pub mod templates;

pub use notifier::Notifier;
pub use recording::RecordingEmailSender;
pub use resend::ResendEmailSender;
