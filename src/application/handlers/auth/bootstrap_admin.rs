//! BootstrapAdminHandler - ensures the configured admin account exists.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::application::ApplicationError;
use crate::domain::foundation::{DomainError, Email, Role};
use crate::domain::user::{Profile, User};
use crate::ports::{PasswordHasher, UserRepository};

#[derive(Debug, Clone)]
pub struct BootstrapAdminCommand {
    pub email: String,
    pub password: SecretString,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapAdminResult {
    Created,
    /// An account with that email already exists; it is left untouched.
    AlreadyPresent { is_admin: bool },
}

pub struct BootstrapAdminHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl BootstrapAdminHandler {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    pub async fn handle(
        &self,
        cmd: BootstrapAdminCommand,
    ) -> Result<BootstrapAdminResult, ApplicationError> {
        let email = Email::parse(&cmd.email).map_err(DomainError::from)?;

        if let Some(existing) = self.users.find_by_email(&email).await? {
            let is_admin = existing.role.is_admin();
            if !is_admin {
                tracing::warn!(user_id = %existing.id, "Bootstrap admin email belongs to a non-admin account");
            }
            return Ok(BootstrapAdminResult::AlreadyPresent { is_admin });
        }

        let digest = self.hasher.hash(cmd.password.expose_secret())?;
        let admin = User::register(
            email,
            digest,
            Profile {
                name: cmd.name,
                ..Default::default()
            },
            Role::Admin,
        );
        self.users.create(&admin).await?;
        tracing::info!(user_id = %admin.id, "Admin account created");
        Ok(BootstrapAdminResult::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;

    fn cmd() -> BootstrapAdminCommand {
        BootstrapAdminCommand {
            email: "admin@sindicato.example".into(),
            password: SecretString::new("cambiar-esto-1".into()),
            name: "Administrador".into(),
        }
    }

    #[tokio::test]
    async fn creates_admin_once() {
        let fx = Fixture::new();
        let handler = BootstrapAdminHandler::new(fx.users.clone(), fx.hasher.clone());

        assert_eq!(handler.handle(cmd()).await.unwrap(), BootstrapAdminResult::Created);
        assert_eq!(
            handler.handle(cmd()).await.unwrap(),
            BootstrapAdminResult::AlreadyPresent { is_admin: true }
        );
        assert_eq!(fx.users.len().await, 1);

        let email = Email::parse("admin@sindicato.example").unwrap();
        let admin = fx.users.find_by_email(&email).await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(admin.is_active());
    }
}
