//! Shared wiring for handler tests: in-memory repositories plus the real
//! argon2 and JWT adapters.

use std::sync::Arc;

use secrecy::SecretString;

use crate::adapters::auth::{Argon2PasswordHasher, JwtSessionService};
use crate::adapters::captcha::InMemoryChallengeStore;
use crate::adapters::document::PdfDocumentRenderer;
use crate::adapters::email::{Notifier, RecordingEmailSender};
use crate::adapters::memory::{
    InMemoryDocumentRepository, InMemoryEventRepository, InMemoryInvoiceRepository,
    InMemoryMembershipFeeRepository, InMemorySubmissionRepository, InMemorySuggestionRepository,
    InMemoryTransactionRepository, InMemoryUnmatchedPaymentRepository, InMemoryUserRepository,
};
use crate::adapters::stripe::MockPaymentProvider;
use crate::domain::foundation::{Email, Role};
use crate::domain::user::{Profile, User};
use crate::ports::{PasswordHasher, UserRepository};

use super::documents::IssueDocumentHandler;

pub const PASSWORD: &str = "secreto123";
pub const WEBHOOK_SECRET: &str = "whsec_test_secret";
pub const ADMIN_INBOX: &str = "junta@sindicato.example";

pub struct Fixture {
    pub users: Arc<InMemoryUserRepository>,
    pub documents: Arc<InMemoryDocumentRepository>,
    pub events: Arc<InMemoryEventRepository>,
    pub suggestions: Arc<InMemorySuggestionRepository>,
    pub submissions: Arc<InMemorySubmissionRepository>,
    pub unmatched: Arc<InMemoryUnmatchedPaymentRepository>,
    pub transactions: Arc<InMemoryTransactionRepository>,
    pub invoices: Arc<InMemoryInvoiceRepository>,
    pub fees: Arc<InMemoryMembershipFeeRepository>,
    pub captcha: Arc<InMemoryChallengeStore>,
    pub hasher: Arc<Argon2PasswordHasher>,
    pub sessions: Arc<JwtSessionService>,
    pub payments: Arc<MockPaymentProvider>,
    pub emails: RecordingEmailSender,
}

impl Fixture {
    pub fn new() -> Self {
        let secret = SecretString::new("test-secret-that-is-at-least-32-bytes!".to_string());
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            documents: Arc::new(InMemoryDocumentRepository::new()),
            events: Arc::new(InMemoryEventRepository::new()),
            suggestions: Arc::new(InMemorySuggestionRepository::new()),
            submissions: Arc::new(InMemorySubmissionRepository::new()),
            unmatched: Arc::new(InMemoryUnmatchedPaymentRepository::new()),
            transactions: Arc::new(InMemoryTransactionRepository::new()),
            invoices: Arc::new(InMemoryInvoiceRepository::new()),
            fees: Arc::new(InMemoryMembershipFeeRepository::new()),
            captcha: Arc::new(InMemoryChallengeStore::default()),
            hasher: Arc::new(Argon2PasswordHasher::insecure_fast().expect("argon2 params")),
            sessions: Arc::new(JwtSessionService::new(&secret, 3600)),
            payments: Arc::new(MockPaymentProvider::new(WEBHOOK_SECRET)),
            emails: RecordingEmailSender::new(),
        }
    }

    pub fn notifier(&self) -> Notifier {
        Notifier::new(Arc::new(self.emails.clone()), Some(ADMIN_INBOX.to_string()))
    }

    pub fn issue_documents(&self) -> IssueDocumentHandler {
        IssueDocumentHandler::new(
            self.users.clone(),
            self.documents.clone(),
            self.events.clone(),
            Arc::new(PdfDocumentRenderer::default()),
        )
    }

    pub async fn member(&self, email: &str) -> User {
        self.user_with_role(email, Role::Member).await
    }

    pub async fn admin(&self, email: &str) -> User {
        self.user_with_role(email, Role::Admin).await
    }

    async fn user_with_role(&self, email: &str, role: Role) -> User {
        let user = User::register(
            Email::parse(email).unwrap(),
            self.hasher.hash(PASSWORD).unwrap(),
            Profile {
                name: "Ana García".to_string(),
                ..Default::default()
            },
            role,
        );
        self.users.create(&user).await.unwrap();
        user
    }
}
