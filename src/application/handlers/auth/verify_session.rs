//! VerifySessionHandler - resolves a validated token to the current account.
//!
//! The token only proves identity; the account is reloaded so a
//! deactivated member is rejected even with an unexpired token.

use std::sync::Arc;

use crate::application::ApplicationError;
use crate::domain::foundation::{AuthError, UserId};
use crate::domain::user::User;
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct VerifySessionQuery {
    pub user_id: UserId,
}

pub struct VerifySessionHandler {
    users: Arc<dyn UserRepository>,
}

impl VerifySessionHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, query: VerifySessionQuery) -> Result<User, ApplicationError> {
        let user = self
            .users
            .find_by_id(&query.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        if !user.is_active() {
            return Err(AuthError::AccountInactive.into());
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::user::AccountStatus;

    #[tokio::test]
    async fn active_user_is_returned() {
        let fx = Fixture::new();
        let user = fx.member("ana@example.com").await;
        let handler = VerifySessionHandler::new(fx.users.clone());

        let found = handler.handle(VerifySessionQuery { user_id: user.id }).await.unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn deactivated_user_requires_reauthentication() {
        let fx = Fixture::new();
        let mut user = fx.member("ana@example.com").await;
        user.change_status(AccountStatus::Inactive).unwrap();
        fx.users.update(&user).await.unwrap();
        let handler = VerifySessionHandler::new(fx.users.clone());

        let err = handler
            .handle(VerifySessionQuery { user_id: user.id })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Auth(AuthError::AccountInactive)));
    }

    #[tokio::test]
    async fn missing_user_is_auth_failure() {
        let fx = Fixture::new();
        let handler = VerifySessionHandler::new(fx.users.clone());
        let err = handler
            .handle(VerifySessionQuery { user_id: UserId::new() })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Auth(AuthError::UserNotFound)));
    }
}
