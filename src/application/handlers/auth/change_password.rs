//! ChangePasswordHandler - replaces the password after re-verifying the
//! current one.

use std::sync::Arc;

use crate::adapters::email::Notifier;
use crate::application::ApplicationError;
use crate::domain::foundation::{ErrorCode, UserId};
use crate::ports::{PasswordHasher, UserRepository};

#[derive(Debug, Clone)]
pub struct ChangePasswordCommand {
    pub user_id: UserId,
    pub current_password: String,
    pub new_password: String,
}

pub struct ChangePasswordHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    notifier: Notifier,
}

impl ChangePasswordHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        notifier: Notifier,
    ) -> Self {
        Self {
            users,
            hasher,
            notifier,
        }
    }

    pub async fn handle(&self, cmd: ChangePasswordCommand) -> Result<(), ApplicationError> {
        if cmd.new_password == cmd.current_password {
            return Err(ApplicationError::validation(
                "newPassword",
                "La nueva contraseña debe ser distinta de la actual",
            ));
        }

        let mut user = self.users.find_by_id(&cmd.user_id).await?.ok_or_else(|| {
            ApplicationError::not_found(ErrorCode::UserNotFound, "Usuario no encontrado")
        })?;

        if !self.hasher.verify(&cmd.current_password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Password change rejected: wrong current password");
            return Err(ApplicationError::validation(
                "currentPassword",
                "La contraseña actual no es correcta",
            ));
        }

        user.set_password_hash(self.hasher.hash(&cmd.new_password)?);
        self.users.update(&user).await?;
        tracing::info!(user_id = %user.id, "Password changed");

        self.notifier.password_changed(&user).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{Fixture, PASSWORD};

    fn handler(fx: &Fixture) -> ChangePasswordHandler {
        ChangePasswordHandler::new(fx.users.clone(), fx.hasher.clone(), fx.notifier())
    }

    #[tokio::test]
    async fn same_password_is_always_rejected() {
        let fx = Fixture::new();
        let user = fx.member("ana@example.com").await;

        let err = handler(&fx)
            .handle(ChangePasswordCommand {
                user_id: user.id,
                current_password: PASSWORD.into(),
                new_password: PASSWORD.into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::ValidationFailed));
        let stored = fx.users.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn wrong_current_password_is_rejected() {
        let fx = Fixture::new();
        let user = fx.member("ana@example.com").await;

        let err = handler(&fx)
            .handle(ChangePasswordCommand {
                user_id: user.id,
                current_password: "noEsEsta1".into(),
                new_password: "nuevaClave2".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::ValidationFailed));
    }

    #[tokio::test]
    async fn new_password_replaces_digest_and_notifies() {
        let fx = Fixture::new();
        let user = fx.member("ana@example.com").await;

        handler(&fx)
            .handle(ChangePasswordCommand {
                user_id: user.id,
                current_password: PASSWORD.into(),
                new_password: "nuevaClave2".into(),
            })
            .await
            .unwrap();

        let stored = fx.users.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(fx.hasher.verify("nuevaClave2", &stored.password_hash).unwrap());
        assert!(!fx.hasher.verify(PASSWORD, &stored.password_hash).unwrap());
        assert_eq!(fx.emails.sent_to("ana@example.com").len(), 1);
    }
}
