//! Shared application state for every route group.

use std::net::IpAddr;
use std::sync::Arc;

use crate::adapters::email::Notifier;
use crate::application::handlers::accounting::{
    AccountingSummaryHandler, CreateInvoiceHandler, GenerateFeesHandler,
};
use crate::application::handlers::admin::AdminStatsHandler;
use crate::application::handlers::auth::{
    ChangePasswordHandler, LoginHandler, RegisterHandler, VerifySessionHandler,
};
use crate::application::handlers::documents::IssueDocumentHandler;
use crate::application::handlers::payment::{
    CheckoutSettings, CreateCheckoutSessionHandler, HandlePaymentWebhookHandler,
};
use crate::application::handlers::submissions::{
    IssueCaptchaHandler, SubmitAffiliationHandler, SubmitContactHandler,
};
use crate::application::handlers::suggestions::{
    ChangeSuggestionStatusHandler, SubmitSuggestionHandler,
};
use crate::config::{AppConfig, Environment};
use crate::ports::{
    ChallengeStore, DocumentRenderer, DocumentRepository, EventRepository, InvoiceRepository,
    MembershipFeeRepository, PasswordHasher, PaymentProvider, RateLimiter, SessionValidator,
    SubmissionRepository, SuggestionRepository, TokenIssuer, TransactionRepository,
    UnmatchedPaymentRepository, UserRepository,
};

/// Values read once from configuration.
#[derive(Debug, Clone)]
pub struct PortalSettings {
    pub environment: Environment,
    pub checkout: CheckoutSettings,
    pub captcha_ttl_secs: u64,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Proxies allowed to report the client address in `X-Forwarded-For`.
    pub trusted_proxies: Vec<IpAddr>,
}

impl PortalSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            environment: config.server.environment,
            checkout: CheckoutSettings::from_config(config),
            captcha_ttl_secs: config.limits.captcha_ttl_secs,
            cors_origins: config.server.cors_origins_list(),
            request_timeout_secs: config.server.request_timeout_secs,
            trusted_proxies: config.server.trusted_proxies_list().unwrap_or_default(),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Cloned per request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub events: Arc<dyn EventRepository>,
    pub suggestions: Arc<dyn SuggestionRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub unmatched_payments: Arc<dyn UnmatchedPaymentRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub fees: Arc<dyn MembershipFeeRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub sessions: Arc<dyn SessionValidator>,
    pub renderer: Arc<dyn DocumentRenderer>,
    pub payments: Arc<dyn PaymentProvider>,
    pub captcha: Arc<dyn ChallengeStore>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub notifier: Notifier,
    pub settings: Arc<PortalSettings>,
}

impl AppState {
    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(self.users.clone(), self.hasher.clone(), self.tokens.clone())
    }

    pub fn register_handler(&self) -> RegisterHandler {
        RegisterHandler::new(
            self.users.clone(),
            self.hasher.clone(),
            self.tokens.clone(),
            Arc::new(self.issue_document_handler()),
            self.notifier.clone(),
        )
    }

    pub fn verify_session_handler(&self) -> VerifySessionHandler {
        VerifySessionHandler::new(self.users.clone())
    }

    pub fn change_password_handler(&self) -> ChangePasswordHandler {
        ChangePasswordHandler::new(self.users.clone(), self.hasher.clone(), self.notifier.clone())
    }

    pub fn issue_document_handler(&self) -> IssueDocumentHandler {
        IssueDocumentHandler::new(
            self.users.clone(),
            self.documents.clone(),
            self.events.clone(),
            self.renderer.clone(),
        )
    }

    pub fn checkout_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(
            self.users.clone(),
            self.payments.clone(),
            self.settings.checkout.clone(),
        )
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.payments.clone(),
            self.users.clone(),
            self.unmatched_payments.clone(),
            Arc::new(self.issue_document_handler()),
            self.notifier.clone(),
        )
    }

    pub fn captcha_handler(&self) -> IssueCaptchaHandler {
        IssueCaptchaHandler::new(self.captcha.clone(), self.settings.captcha_ttl_secs)
    }

    pub fn contact_handler(&self) -> SubmitContactHandler {
        SubmitContactHandler::new(
            self.captcha.clone(),
            self.submissions.clone(),
            self.notifier.clone(),
        )
    }

    pub fn affiliation_handler(&self) -> SubmitAffiliationHandler {
        SubmitAffiliationHandler::new(
            self.captcha.clone(),
            self.submissions.clone(),
            self.notifier.clone(),
        )
    }

    pub fn submit_suggestion_handler(&self) -> SubmitSuggestionHandler {
        SubmitSuggestionHandler::new(self.suggestions.clone())
    }

    pub fn suggestion_status_handler(&self) -> ChangeSuggestionStatusHandler {
        ChangeSuggestionStatusHandler::new(self.suggestions.clone(), self.notifier.clone())
    }

    pub fn admin_stats_handler(&self) -> AdminStatsHandler {
        AdminStatsHandler::new(
            self.users.clone(),
            self.documents.clone(),
            self.suggestions.clone(),
            self.unmatched_payments.clone(),
        )
    }

    pub fn create_invoice_handler(&self) -> CreateInvoiceHandler {
        CreateInvoiceHandler::new(self.invoices.clone())
    }

    pub fn generate_fees_handler(&self) -> GenerateFeesHandler {
        GenerateFeesHandler::new(self.users.clone(), self.fees.clone())
    }

    pub fn accounting_summary_handler(&self) -> AccountingSummaryHandler {
        AccountingSummaryHandler::new(
            self.transactions.clone(),
            self.invoices.clone(),
            self.fees.clone(),
        )
    }
}
