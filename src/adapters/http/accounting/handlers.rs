//! HTTP handlers for accounting. Admin only.

use axum::extract::State;

use crate::application::handlers::accounting::{
    AccountingSummary, CreateInvoiceCommand, GenerateFeesCommand, GenerateFeesResult,
};
use crate::domain::accounting::{Invoice, MembershipFee, Transaction};
use crate::domain::foundation::{DomainError, FeeId, InvoiceId, Timestamp, TransactionId, UserId};
use crate::ports::{FeeFilter, TransactionFilter};

use super::super::envelope::ApiResponse;
use super::super::error::ApiError;
use super::super::middleware::RequireAdmin;
use super::super::params::{parse_filter, parse_id, ApiPath, ApiQuery};
use super::super::state::AppState;
use super::super::validation::{OptionalJson, ValidatedJson};
use super::dto::{
    CancelRequest, CreateInvoiceRequest, CreateTransactionRequest, FeeListQuery,
    GenerateFeesRequest, InvoiceListQuery, PaymentRequest, TransactionListQuery, WaiveRequest,
};

const TRANSACTION_NOT_FOUND: &str = "Movimiento no encontrado";
const INVOICE_NOT_FOUND: &str = "Factura no encontrada";
const FEE_NOT_FOUND: &str = "Cuota no encontrada";

// ════════════════════════════════════════════════════════════════════════════════
// Transactions
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/accounting/transactions - Optional `kind` and `status` filters
pub async fn list_transactions(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiQuery(query): ApiQuery<TransactionListQuery>,
) -> Result<ApiResponse<Vec<Transaction>>, ApiError> {
    let filter = TransactionFilter {
        kind: parse_filter("kind", query.kind.as_deref())?,
        status: parse_filter("status", query.status.as_deref())?,
    };
    Ok(ApiResponse::ok(state.transactions.list(&filter).await?))
}

/// POST /api/accounting/transactions - Record a pending income or expense
pub async fn create_transaction(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(req): ValidatedJson<CreateTransactionRequest>,
) -> Result<ApiResponse<Transaction>, ApiError> {
    let transaction = Transaction::record(
        req.kind,
        req.category,
        req.description,
        req.amount,
        req.date.unwrap_or_else(Timestamp::now),
        req.user_id,
        admin.id,
    )
    .map_err(DomainError::from)?;

    state.transactions.create(&transaction).await?;
    tracing::info!(
        admin_id = %admin.id,
        transaction_id = %transaction.id,
        amount = %transaction.amount,
        "Transaction recorded"
    );
    Ok(ApiResponse::created(transaction))
}

async fn load_transaction(state: &AppState, raw_id: &str) -> Result<Transaction, ApiError> {
    let id: TransactionId = parse_id(raw_id, TRANSACTION_NOT_FOUND)?;
    state
        .transactions
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(TRANSACTION_NOT_FOUND))
}

/// POST /api/accounting/transactions/{id}/approve
pub async fn approve_transaction(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<Transaction>, ApiError> {
    let mut transaction = load_transaction(&state, &id).await?;
    transaction.approve(admin.id)?;
    state.transactions.update(&transaction).await?;
    tracing::info!(admin_id = %admin.id, transaction_id = %transaction.id, "Transaction approved");
    Ok(ApiResponse::ok(transaction))
}

/// POST /api/accounting/transactions/{id}/cancel - Body with `reason` is optional
pub async fn cancel_transaction(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<String>,
    OptionalJson(body): OptionalJson<CancelRequest>,
) -> Result<ApiResponse<Transaction>, ApiError> {
    let reason = body.and_then(|b| b.reason);
    let mut transaction = load_transaction(&state, &id).await?;
    transaction.cancel(reason)?;
    state.transactions.update(&transaction).await?;
    tracing::info!(admin_id = %admin.id, transaction_id = %transaction.id, "Transaction cancelled");
    Ok(ApiResponse::ok(transaction))
}

// ════════════════════════════════════════════════════════════════════════════════
// Invoices
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/accounting/invoices - Optional `status` filter
pub async fn list_invoices(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiQuery(query): ApiQuery<InvoiceListQuery>,
) -> Result<ApiResponse<Vec<Invoice>>, ApiError> {
    let status = parse_filter("status", query.status.as_deref())?;
    Ok(ApiResponse::ok(state.invoices.list(status).await?))
}

/// POST /api/accounting/invoices - Draft a new invoice
pub async fn create_invoice(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(req): ValidatedJson<CreateInvoiceRequest>,
) -> Result<ApiResponse<Invoice>, ApiError> {
    let tax_rate = req.tax_rate();
    let invoice = state
        .create_invoice_handler()
        .handle(CreateInvoiceCommand {
            customer: req.customer,
            items: req.items,
            tax_rate,
            due_date: req.due_date,
            notes: req.notes,
        })
        .await?;
    Ok(ApiResponse::created(invoice))
}

async fn load_invoice(state: &AppState, raw_id: &str) -> Result<Invoice, ApiError> {
    let id: InvoiceId = parse_id(raw_id, INVOICE_NOT_FOUND)?;
    state
        .invoices
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(INVOICE_NOT_FOUND))
}

/// Loads, mutates and persists an invoice in one step.
async fn with_invoice<F>(state: &AppState, raw_id: &str, change: F) -> Result<Invoice, ApiError>
where
    F: FnOnce(&mut Invoice) -> Result<(), DomainError>,
{
    let mut invoice = load_invoice(state, raw_id).await?;
    change(&mut invoice)?;
    state.invoices.update(&invoice).await?;
    Ok(invoice)
}

/// GET /api/accounting/invoices/{id}
pub async fn get_invoice(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<Invoice>, ApiError> {
    Ok(ApiResponse::ok(load_invoice(&state, &id).await?))
}

/// POST /api/accounting/invoices/{id}/issue
pub async fn issue_invoice(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<Invoice>, ApiError> {
    let invoice = with_invoice(&state, &id, |i| i.issue(Timestamp::now())).await?;
    tracing::info!(admin_id = %admin.id, number = invoice.number(), "Invoice issued");
    Ok(ApiResponse::ok(invoice))
}

/// POST /api/accounting/invoices/{id}/payments - Paid in full flips it to paid
pub async fn add_invoice_payment(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<PaymentRequest>,
) -> Result<ApiResponse<Invoice>, ApiError> {
    let invoice = with_invoice(&state, &id, |i| i.add_payment(req.amount)).await?;
    tracing::info!(
        admin_id = %admin.id,
        number = invoice.number(),
        amount = %req.amount,
        "Invoice payment recorded"
    );
    Ok(ApiResponse::ok(invoice))
}

/// POST /api/accounting/invoices/{id}/cancel
pub async fn cancel_invoice(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<Invoice>, ApiError> {
    let invoice = with_invoice(&state, &id, Invoice::cancel).await?;
    tracing::info!(admin_id = %admin.id, number = invoice.number(), "Invoice cancelled");
    Ok(ApiResponse::ok(invoice))
}

/// POST /api/accounting/invoices/{id}/overdue
pub async fn mark_invoice_overdue(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<Invoice>, ApiError> {
    let invoice = with_invoice(&state, &id, Invoice::mark_overdue).await?;
    Ok(ApiResponse::ok(invoice))
}

// ════════════════════════════════════════════════════════════════════════════════
// Membership fees
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/accounting/fees - Filters: `userId`, `year`, `month`, `status`
pub async fn list_fees(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiQuery(query): ApiQuery<FeeListQuery>,
) -> Result<ApiResponse<Vec<MembershipFee>>, ApiError> {
    let user_id = query
        .user_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<UserId>()
                .map_err(|_| ApiError::field("userId", "Identificador no válido"))
        })
        .transpose()?;
    let filter = FeeFilter {
        user_id,
        year: query.year,
        month: query.month,
        status: parse_filter("status", query.status.as_deref())?,
    };
    Ok(ApiResponse::ok(state.fees.list(&filter).await?))
}

/// POST /api/accounting/fees/generate - One fee per active member for a month
pub async fn generate_fees(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(req): ValidatedJson<GenerateFeesRequest>,
) -> Result<ApiResponse<GenerateFeesResult>, ApiError> {
    let amount = req
        .amount
        .unwrap_or(state.settings.checkout.membership_fee);
    let result = state
        .generate_fees_handler()
        .handle(GenerateFeesCommand {
            year: req.year,
            month: req.month,
            amount,
        })
        .await?;
    tracing::info!(admin_id = %admin.id, created = result.created, "Fee batch requested");
    Ok(ApiResponse::created(result))
}

async fn with_fee<F>(state: &AppState, raw_id: &str, change: F) -> Result<MembershipFee, ApiError>
where
    F: FnOnce(&mut MembershipFee) -> Result<(), DomainError>,
{
    let id: FeeId = parse_id(raw_id, FEE_NOT_FOUND)?;
    let mut fee = state
        .fees
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(FEE_NOT_FOUND))?;
    change(&mut fee)?;
    state.fees.update(&fee).await?;
    Ok(fee)
}

/// POST /api/accounting/fees/{id}/payments
pub async fn add_fee_payment(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<PaymentRequest>,
) -> Result<ApiResponse<MembershipFee>, ApiError> {
    let fee = with_fee(&state, &id, |f| f.add_payment(req.amount, Timestamp::now())).await?;
    tracing::info!(admin_id = %admin.id, fee_id = %fee.id, amount = %req.amount, "Fee payment recorded");
    Ok(ApiResponse::ok(fee))
}

/// POST /api/accounting/fees/{id}/waive
pub async fn waive_fee(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<String>,
    ValidatedJson(req): ValidatedJson<WaiveRequest>,
) -> Result<ApiResponse<MembershipFee>, ApiError> {
    let fee = with_fee(&state, &id, |f| f.waive(req.reason.trim())).await?;
    tracing::info!(admin_id = %admin.id, fee_id = %fee.id, "Fee waived");
    Ok(ApiResponse::ok(fee))
}

/// POST /api/accounting/fees/{id}/overdue
pub async fn mark_fee_overdue(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse<MembershipFee>, ApiError> {
    let fee = with_fee(&state, &id, MembershipFee::mark_overdue).await?;
    Ok(ApiResponse::ok(fee))
}

// ════════════════════════════════════════════════════════════════════════════════
// Summary
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/accounting/summary - Balance, outstanding invoices and pending fees
pub async fn get_summary(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<ApiResponse<AccountingSummary>, ApiError> {
    let summary = state.accounting_summary_handler().handle().await?;
    Ok(ApiResponse::ok(summary))
}
