//! User aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DocumentId, DomainError, Email, ErrorCode, PaymentId, Role, StateMachine, Timestamp, UserId,
};

use super::membership::MembershipInfo;
use super::payment_history::PaymentEntry;

/// Account lifecycle status. Accounts are never hard-deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Pending,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Pending => "pending",
            AccountStatus::Inactive => "inactive",
        }
    }
}

impl StateMachine for AccountStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use AccountStatus::*;
        match self {
            Pending => vec![Active, Inactive],
            Active => vec![Inactive],
            Inactive => vec![Active],
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "pending" => Ok(AccountStatus::Pending),
            "inactive" => Ok(AccountStatus::Inactive),
            other => Err(DomainError::validation(
                "status",
                format!("Unknown account status: {}", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub phone: Option<String>,
    pub department: Option<String>,
}

/// Profile picture stored inline as base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePhoto {
    pub content_type: String,
    pub data: String,
    pub updated_at: Timestamp,
}

/// Partial profile update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
}

/// A registered account: identity, credentials, profile and membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub password_hash: String,
    pub profile: Profile,
    pub role: Role,
    pub status: AccountStatus,
    #[serde(default)]
    pub membership: MembershipInfo,
    #[serde(default)]
    pub login_count: u32,
    pub last_login: Option<Timestamp>,
    pub photo: Option<ProfilePhoto>,
    #[serde(default)]
    pub payment_history: Vec<PaymentEntry>,
    #[serde(default)]
    pub documents: Vec<DocumentId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Creates a new account with an already-hashed password.
    pub fn register(
        email: Email,
        password_hash: impl Into<String>,
        profile: Profile,
        role: Role,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: UserId::new(),
            email,
            password_hash: password_hash.into(),
            profile,
            role,
            status: AccountStatus::Active,
            membership: MembershipInfo::default(),
            login_count: 0,
            last_login: None,
            photo: None,
            payment_history: Vec::new(),
            documents: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    pub fn ensure_active(&self) -> Result<(), DomainError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::AccountInactive,
                format!("Account {} is {}", self.id, self.status.as_str()),
            ))
        }
    }

    pub fn record_login(&mut self, now: Timestamp) {
        self.login_count = self.login_count.saturating_add(1);
        self.last_login = Some(now);
        self.touch(now);
    }

    pub fn set_password_hash(&mut self, hash: impl Into<String>) {
        self.password_hash = hash.into();
        self.touch(Timestamp::now());
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.profile.name = name;
        }
        if let Some(phone) = update.phone {
            self.profile.phone = Some(phone).filter(|p| !p.is_empty());
        }
        if let Some(department) = update.department {
            self.profile.department = Some(department).filter(|d| !d.is_empty());
        }
        self.touch(Timestamp::now());
    }

    pub fn set_photo(&mut self, content_type: impl Into<String>, data: impl Into<String>) {
        let now = Timestamp::now();
        self.photo = Some(ProfilePhoto {
            content_type: content_type.into(),
            data: data.into(),
            updated_at: now,
        });
        self.touch(now);
    }

    pub fn clear_photo(&mut self) {
        self.photo = None;
        self.touch(Timestamp::now());
    }

    pub fn change_status(&mut self, target: AccountStatus) -> Result<(), DomainError> {
        if self.status == target {
            return Ok(());
        }
        self.status = self.status.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
        })?;
        self.touch(Timestamp::now());
        Ok(())
    }

    pub fn has_payment_for_session(&self, session_id: &str) -> bool {
        self.payment_history
            .iter()
            .any(|p| p.session_id.as_deref() == Some(session_id))
    }

    /// Records a completed payment and activates or extends the membership.
    pub fn append_payment(&mut self, entry: PaymentEntry) {
        let paid_at = entry.paid_at;
        self.payment_history.push(entry);
        self.membership.activate_or_extend(paid_at);
        self.touch(Timestamp::now());
    }

    /// Links a generated receipt to an existing payment entry.
    pub fn attach_receipt(&mut self, payment_id: PaymentId, document_id: DocumentId) -> bool {
        match self.payment_history.iter_mut().find(|p| p.id == payment_id) {
            Some(entry) => {
                entry.receipt_document_id = Some(document_id);
                self.link_document(document_id);
                true
            }
            None => false,
        }
    }

    pub fn link_document(&mut self, document_id: DocumentId) {
        if !self.documents.contains(&document_id) {
            self.documents.push(document_id);
            self.touch(Timestamp::now());
        }
    }

    pub fn unlink_document(&mut self, document_id: DocumentId) -> bool {
        let before = self.documents.len();
        self.documents.retain(|d| *d != document_id);
        let removed = self.documents.len() != before;
        if removed {
            self.touch(Timestamp::now());
        }
        removed
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;
    use crate::domain::user::MembershipStatus;

    fn test_user() -> User {
        User::register(
            Email::parse("ana@example.com").unwrap(),
            "$argon2id$stub",
            Profile {
                name: "Ana".to_string(),
                ..Default::default()
            },
            Role::Member,
        )
    }

    fn payment(session: &str) -> PaymentEntry {
        PaymentEntry::new(
            Money::from_cents(5000),
            "eur",
            "Cuota anual",
            Some(session.to_string()),
            Timestamp::now(),
        )
    }

    #[test]
    fn register_starts_active_without_membership() {
        let user = test_user();
        assert!(user.is_active());
        assert_eq!(user.membership.status, MembershipStatus::None);
        assert_eq!(user.login_count, 0);
    }

    #[test]
    fn record_login_updates_audit_fields() {
        let mut user = test_user();
        let now = Timestamp::now();
        user.record_login(now);
        user.record_login(now);
        assert_eq!(user.login_count, 2);
        assert_eq!(user.last_login, Some(now));
    }

    #[test]
    fn inactive_account_fails_active_check() {
        let mut user = test_user();
        user.change_status(AccountStatus::Inactive).unwrap();
        let err = user.ensure_active().unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountInactive);
    }

    #[test]
    fn cannot_move_active_account_back_to_pending() {
        let mut user = test_user();
        let err = user.change_status(AccountStatus::Pending).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn append_payment_activates_membership() {
        let mut user = test_user();
        user.append_payment(payment("cs_1"));
        assert_eq!(user.payment_history.len(), 1);
        assert_eq!(user.membership.status, MembershipStatus::Active);
        assert!(user.has_payment_for_session("cs_1"));
        assert!(!user.has_payment_for_session("cs_2"));
    }

    #[test]
    fn attach_receipt_links_document_once() {
        let mut user = test_user();
        let entry = payment("cs_1");
        let payment_id = entry.id;
        user.append_payment(entry);

        let doc = DocumentId::new();
        assert!(user.attach_receipt(payment_id, doc));
        user.link_document(doc);

        assert_eq!(user.documents, vec![doc]);
        assert_eq!(user.payment_history[0].receipt_document_id, Some(doc));
    }

    #[test]
    fn update_profile_clears_empty_optionals() {
        let mut user = test_user();
        user.update_profile(ProfileUpdate {
            phone: Some("600123123".to_string()),
            ..Default::default()
        });
        assert_eq!(user.profile.phone.as_deref(), Some("600123123"));

        user.update_profile(ProfileUpdate {
            phone: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(user.profile.phone, None);
        assert_eq!(user.profile.name, "Ana");
    }

    #[test]
    fn unlink_document_reports_removal() {
        let mut user = test_user();
        let doc = DocumentId::new();
        user.link_document(doc);
        assert!(user.unlink_document(doc));
        assert!(!user.unlink_document(doc));
    }
}
