//! Axum router for accounting.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    add_fee_payment, add_invoice_payment, approve_transaction, cancel_invoice,
    cancel_transaction, create_invoice, create_transaction, generate_fees, get_invoice,
    get_summary, issue_invoice, list_fees, list_invoices, list_transactions,
    mark_fee_overdue, mark_invoice_overdue, waive_fee,
};

/// # Routes (admin only)
/// - `GET|POST /transactions`, `POST /transactions/{id}/approve|cancel`
/// - `GET|POST /invoices`, `GET /invoices/{id}`,
///   `POST /invoices/{id}/issue|payments|cancel|overdue`
/// - `GET /fees`, `POST /fees/generate`, `POST /fees/{id}/payments|waive|overdue`
/// - `GET /summary`
pub fn accounting_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/:id/approve", post(approve_transaction))
        .route("/transactions/:id/cancel", post(cancel_transaction))
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/:id", get(get_invoice))
        .route("/invoices/:id/issue", post(issue_invoice))
        .route("/invoices/:id/payments", post(add_invoice_payment))
        .route("/invoices/:id/cancel", post(cancel_invoice))
        .route("/invoices/:id/overdue", post(mark_invoice_overdue))
        .route("/fees", get(list_fees))
        .route("/fees/generate", post(generate_fees))
        .route("/fees/:id/payments", post(add_fee_payment))
        .route("/fees/:id/waive", post(waive_fee))
        .route("/fees/:id/overdue", post(mark_fee_overdue))
        .route("/summary", get(get_summary))
}
