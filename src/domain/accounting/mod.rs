//! Accounting module - transactions, invoices and membership fees.
//!
//! Each record owns a status state machine and, where applicable, derived
//! totals that are recomputed whenever the record changes.

mod fee;
mod invoice;
mod transaction;

pub use fee::{FeePeriod, FeeStatus, MembershipFee};
pub use invoice::{
    Customer, Invoice, InvoiceStatus, InvoiceTotals, LineItem, MAX_LINE_QUANTITY, MAX_UNIT_PRICE,
};
pub use transaction::{Transaction, TransactionKind, TransactionStatus};
