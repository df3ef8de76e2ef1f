//! Accounting handlers with logic beyond a single repository call.

mod accounting_summary;
mod create_invoice;
mod generate_fees;

pub use accounting_summary::{AccountingSummary, AccountingSummaryHandler};
pub use create_invoice::{CreateInvoiceCommand, CreateInvoiceHandler};
pub use generate_fees::{GenerateFeesCommand, GenerateFeesHandler, GenerateFeesResult};
