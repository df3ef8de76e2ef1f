//! LoginHandler - exchanges email and password for a session token.
//!
//! Unknown email, inactive account and wrong password all produce the same
//! `InvalidCredentials` error, and each costs one password hash.

use std::sync::Arc;

use crate::application::ApplicationError;
use crate::domain::foundation::{Email, Timestamp};
use crate::domain::user::User;
use crate::ports::{IssuedToken, PasswordHasher, TokenIssuer, UserRepository};

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: User,
    pub token: IssuedToken,
}

pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Result<LoginResult, ApplicationError> {
        let Ok(email) = Email::parse(&cmd.email) else {
            self.hasher.verify_absent(&cmd.password);
            return Err(ApplicationError::InvalidCredentials);
        };

        let Some(mut user) = self.users.find_by_email(&email).await? else {
            self.hasher.verify_absent(&cmd.password);
            tracing::info!(email = %email, "Login rejected: unknown email");
            return Err(ApplicationError::InvalidCredentials);
        };

        if !self.hasher.verify(&cmd.password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(ApplicationError::InvalidCredentials);
        }

        if !user.is_active() {
            tracing::info!(user_id = %user.id, status = user.status.as_str(), "Login rejected: account not active");
            return Err(ApplicationError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        user.record_login(Timestamp::now());
        self.users.update(&user).await?;

        tracing::info!(user_id = %user.id, login_count = user.login_count, "User logged in");
        Ok(LoginResult { user, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{Fixture, PASSWORD};
    use crate::domain::user::AccountStatus;
    use crate::ports::PasswordError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn handler(fx: &Fixture) -> LoginHandler {
        LoginHandler::new(fx.users.clone(), fx.hasher.clone(), fx.sessions.clone())
    }

    /// Counts every hash or verification passed through to the real hasher.
    struct CountingHasher {
        inner: Arc<dyn PasswordHasher>,
        calls: AtomicUsize,
    }

    impl PasswordHasher for CountingHasher {
        fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.hash(plaintext)
        }

        fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.verify(plaintext, digest)
        }
    }

    fn cmd(email: &str, password: &str) -> LoginCommand {
        LoginCommand {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn valid_credentials_issue_token_and_count_login() {
        let fx = Fixture::new();
        let user = fx.member("ana@example.com").await;

        let result = handler(&fx).handle(cmd("ANA@example.com ", PASSWORD)).await.unwrap();

        assert_eq!(result.user.id, user.id);
        assert!(!result.token.token.is_empty());
        let stored = fx.users.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.login_count, 1);
        assert!(stored.last_login.is_some());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let fx = Fixture::new();
        fx.member("ana@example.com").await;
        let handler = handler(&fx);

        let wrong_password = handler
            .handle(cmd("ana@example.com", "otraClave1"))
            .await
            .unwrap_err();
        let unknown_email = handler
            .handle(cmd("nadie@example.com", PASSWORD))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, ApplicationError::InvalidCredentials));
        assert!(matches!(unknown_email, ApplicationError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn every_rejection_costs_one_hash() {
        let fx = Fixture::new();
        let mut inactive = fx.member("baja@example.com").await;
        inactive.change_status(AccountStatus::Inactive).unwrap();
        fx.users.update(&inactive).await.unwrap();
        fx.member("ana@example.com").await;

        let hasher = Arc::new(CountingHasher {
            inner: fx.hasher.clone(),
            calls: AtomicUsize::new(0),
        });
        let handler = LoginHandler::new(fx.users.clone(), hasher.clone(), fx.sessions.clone());

        for (email, password) in [
            ("nadie@example.com", PASSWORD),
            ("no es un email", PASSWORD),
            ("ana@example.com", "otraClave1"),
            ("baja@example.com", PASSWORD),
        ] {
            let before = hasher.calls.load(Ordering::SeqCst);
            let err = handler.handle(cmd(email, password)).await.unwrap_err();
            assert!(matches!(err, ApplicationError::InvalidCredentials));
            assert_eq!(hasher.calls.load(Ordering::SeqCst) - before, 1, "{email}");
        }
    }

    #[tokio::test]
    async fn inactive_account_is_rejected() {
        let fx = Fixture::new();
        let mut user = fx.member("ana@example.com").await;
        user.change_status(AccountStatus::Inactive).unwrap();
        fx.users.update(&user).await.unwrap();

        let err = handler(&fx)
            .handle(cmd("ana@example.com", PASSWORD))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidCredentials));
    }
}
