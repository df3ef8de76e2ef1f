use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Email, ErrorCode, Timestamp, UserId};
use crate::domain::user::{AccountStatus, User};
use crate::ports::{Page, UserFilter, UserRepository, UserStats};

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::new(
                ErrorCode::EmailTaken,
                format!("Email already registered: {}", user.email),
            ));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(DomainError::new(ErrorCode::EmailTaken, "Email already registered"));
        }
        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::UserNotFound,
                format!("User not found: {}", user.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn list(&self, filter: &UserFilter) -> Result<Page<User>, DomainError> {
        let users = self.users.read().await;
        let mut matching: Vec<&User> = users.values().filter(|u| filter.matches(u)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(filter.offset())
            .take(filter.per_page as usize)
            .cloned()
            .collect();
        Ok(Page {
            items,
            total,
            page: filter.page.max(1),
            per_page: filter.per_page,
        })
    }

    async fn list_active(&self) -> Result<Vec<User>, DomainError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.is_active())
            .cloned()
            .collect())
    }

    async fn stats(&self, now: Timestamp) -> Result<UserStats, DomainError> {
        let users = self.users.read().await;
        let mut stats = UserStats::default();
        for user in users.values() {
            stats.total += 1;
            match user.status {
                AccountStatus::Active => stats.active += 1,
                AccountStatus::Pending => stats.pending += 1,
                AccountStatus::Inactive => stats.inactive += 1,
            }
            if user.role.is_admin() {
                stats.admins += 1;
            }
            if user.membership.is_active_at(now) {
                stats.active_memberships += 1;
            }
        }
        Ok(stats)
    }
}
