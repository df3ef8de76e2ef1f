//! RegisterHandler - creates a member account and signs it in.

use std::sync::Arc;

use crate::adapters::email::Notifier;
use crate::application::ApplicationError;
use crate::domain::foundation::{DomainError, Email, ErrorCode, Role};
use crate::domain::user::{Profile, User};
use crate::ports::{IssuedToken, PasswordHasher, TokenIssuer, UserRepository};

use crate::application::handlers::documents::{DocumentKind, IssueDocumentCommand, IssueDocumentHandler};

#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RegisterResult {
    pub user: User,
    pub token: IssuedToken,
}

/// Registration never fails because of the membership form or the welcome
/// email; both are attempted after the account is stored.
pub struct RegisterHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    documents: Arc<IssueDocumentHandler>,
    notifier: Notifier,
}

impl RegisterHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        documents: Arc<IssueDocumentHandler>,
        notifier: Notifier,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            documents,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: RegisterCommand) -> Result<RegisterResult, ApplicationError> {
        let email = Email::parse(&cmd.email).map_err(DomainError::from)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(email_taken(&email));
        }

        let digest = self.hasher.hash(&cmd.password)?;
        let profile = Profile {
            name: cmd.name.trim().to_string(),
            phone: cmd.phone.filter(|p| !p.trim().is_empty()),
            department: cmd.department.filter(|d| !d.trim().is_empty()),
        };
        let user = User::register(email, digest, profile, Role::Member);

        // The repository enforces uniqueness again for concurrent registrations.
        self.users.create(&user).await?;
        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, "User registered");

        let user = self.issue_membership_form(user).await;
        self.notifier.welcome(&user).await;

        Ok(RegisterResult { user, token })
    }

    async fn issue_membership_form(&self, user: User) -> User {
        let cmd = IssueDocumentCommand {
            user_id: user.id,
            kind: DocumentKind::MembershipForm,
        };
        match self.documents.handle(cmd).await {
            Ok(_) => match self.users.find_by_id(&user.id).await {
                Ok(Some(updated)) => updated,
                _ => user,
            },
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Membership form generation failed");
                user
            }
        }
    }
}

fn email_taken(email: &Email) -> ApplicationError {
    ApplicationError::Domain(DomainError::new(
        ErrorCode::EmailTaken,
        format!("Ya existe una cuenta con el email {}", email),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::ports::DocumentRepository;

    fn handler(fx: &Fixture) -> RegisterHandler {
        RegisterHandler::new(
            fx.users.clone(),
            fx.hasher.clone(),
            fx.sessions.clone(),
            Arc::new(fx.issue_documents()),
            fx.notifier(),
        )
    }

    fn cmd(email: &str) -> RegisterCommand {
        RegisterCommand {
            email: email.to_string(),
            password: "Abc123!".to_string(),
            name: "Ana".to_string(),
            phone: None,
            department: Some(String::new()),
        }
    }

    #[tokio::test]
    async fn creates_member_with_form_and_welcome_email() {
        let fx = Fixture::new();
        let result = handler(&fx).handle(cmd("a@b.com")).await.unwrap();

        assert_eq!(result.user.role, Role::Member);
        assert!(result.user.profile.department.is_none());
        assert_ne!(result.user.password_hash, "Abc123!");
        assert_eq!(result.user.documents.len(), 1);
        assert_eq!(fx.documents.count().await.unwrap(), 1);
        assert_eq!(fx.emails.sent_to("a@b.com").len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_without_new_record() {
        let fx = Fixture::new();
        let handler = handler(&fx);
        handler.handle(cmd("a@b.com")).await.unwrap();

        let err = handler.handle(cmd("A@B.com")).await.unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::EmailTaken));
        assert_eq!(fx.users.len().await, 1);
    }

    #[tokio::test]
    async fn email_failure_does_not_block_registration() {
        let fx = Fixture::new();
        fx.emails.fail_all();

        let result = handler(&fx).handle(cmd("a@b.com")).await;

        assert!(result.is_ok());
        assert_eq!(fx.users.len().await, 1);
    }
}
