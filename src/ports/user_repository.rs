//! User repository port.
//!
//! Email uniqueness is enforced here: `create` rejects a second account with
//! the same normalised address with `ErrorCode::EmailTaken`.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{DomainError, Email, Role, Timestamp, UserId};
use crate::domain::user::{AccountStatus, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user.
    ///
    /// # Errors
    ///
    /// - `EmailTaken` if another account already uses the email
    /// - `DatabaseError` on persistence failure
    async fn create(&self, user: &User) -> Result<(), DomainError>;

    /// Replace an existing user.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the user doesn't exist
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError>;

    /// Filtered, paginated listing ordered by creation date, newest first.
    async fn list(&self, filter: &UserFilter) -> Result<Page<User>, DomainError>;

    /// Every account with `AccountStatus::Active`.
    async fn list_active(&self) -> Result<Vec<User>, DomainError>;

    async fn stats(&self, now: Timestamp) -> Result<UserStats, DomainError>;
}

/// Admin listing filter.
#[derive(Debug, Clone)]
pub struct UserFilter {
    pub status: Option<AccountStatus>,
    pub role: Option<Role>,
    /// Case-insensitive match against email and name.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

impl Default for UserFilter {
    fn default() -> Self {
        Self {
            status: None,
            role: None,
            search: None,
            page: 1,
            per_page: 20,
        }
    }
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        if self.status.map_or(false, |s| s != user.status) {
            return false;
        }
        if self.role.map_or(false, |r| r != user.role) {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let term = term.to_lowercase();
                user.email.as_str().contains(&term)
                    || user.profile.name.to_lowercase().contains(&term)
            }
            None => true,
        }
    }

    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.per_page as usize
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: u64,
    pub active: u64,
    pub pending: u64,
    pub inactive: u64,
    pub admins: u64,
    pub active_memberships: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Profile;

    fn user(email: &str, name: &str) -> User {
        User::register(
            Email::parse(email).unwrap(),
            "hash",
            Profile {
                name: name.to_string(),
                ..Default::default()
            },
            Role::Member,
        )
    }

    #[test]
    fn user_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn UserRepository) {}
    }

    #[test]
    fn filter_matches_search_on_name_and_email() {
        let filter = UserFilter {
            search: Some("GARC".into()),
            ..Default::default()
        };
        assert!(filter.matches(&user("x@example.com", "Lucía García")));
        assert!(filter.matches(&user("garcia@example.com", "Lucía")));
        assert!(!filter.matches(&user("x@example.com", "Pedro")));
    }

    #[test]
    fn filter_matches_role_and_status() {
        let u = user("a@example.com", "A");
        let admins = UserFilter {
            role: Some(Role::Admin),
            ..Default::default()
        };
        let active = UserFilter {
            status: Some(AccountStatus::Active),
            ..Default::default()
        };
        assert!(!admins.matches(&u));
        assert!(active.matches(&u));
    }

    #[test]
    fn offset_is_one_based() {
        let f = UserFilter {
            page: 3,
            per_page: 10,
            ..Default::default()
        };
        assert_eq!(f.offset(), 20);
        assert_eq!(UserFilter { page: 0, ..Default::default() }.offset(), 0);
    }
}
