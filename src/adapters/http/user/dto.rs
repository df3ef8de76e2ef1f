//! HTTP DTOs for the caller's own account.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Role, Timestamp, UserId};
use crate::domain::user::{AccountStatus, MembershipInfo, ProfilePhoto, User};

use super::super::validation::{FieldError, Validate, Validator};

pub const PHOTO_CONTENT_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];
pub const MAX_PHOTO_BYTES: usize = 2 * 1024 * 1024;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Partial profile update. Omitted fields stay as they are.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
}

impl Validate for UpdateProfileRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        if self.name.as_deref().map_or(false, |n| n.trim().is_empty()) {
            v.push("name", "Campo obligatorio");
        }
        v.field("name", self.name.as_deref()).min_len(2).max_len(100);
        v.field("phone", self.phone.as_deref()).phone();
        v.field("department", self.department.as_deref()).max_len(100);
        v.finish()
    }
}

/// Profile photo as base64.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPhotoRequest {
    pub content_type: String,
    pub data: String,
}

impl Validate for UploadPhotoRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.field("contentType", Some(self.content_type.as_str()))
            .required()
            .one_of(&PHOTO_CONTENT_TYPES);
        v.field("data", Some(self.data.as_str()))
            .required()
            .check(|d| BASE64.decode(d).is_ok(), "La imagen no es base64 válido")
            .check(
                |d| BASE64.decode(d).map_or(false, |bytes| bytes.len() <= MAX_PHOTO_BYTES),
                "La imagen no puede superar 2 MB",
            );
        v.finish()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoView {
    pub content_type: String,
    pub data: String,
    pub updated_at: Timestamp,
}

impl From<&ProfilePhoto> for PhotoView {
    fn from(photo: &ProfilePhoto) -> Self {
        Self {
            content_type: photo.content_type.clone(),
            data: photo.data.clone(),
            updated_at: photo.updated_at,
        }
    }
}

/// Account as shown to its owner and to admins. Never includes the
/// password digest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub role: Role,
    pub status: AccountStatus,
    pub membership: MembershipInfo,
    pub login_count: u32,
    pub last_login: Option<Timestamp>,
    pub photo: Option<PhotoView>,
    pub created_at: Timestamp,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.as_str().to_string(),
            name: user.profile.name.clone(),
            phone: user.profile.phone.clone(),
            department: user.profile.department.clone(),
            role: user.role,
            status: user.status,
            membership: user.membership.clone(),
            login_count: user.login_count,
            last_login: user.last_login,
            photo: user.photo.as_ref().map(PhotoView::from),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipView {
    #[serde(flatten)]
    pub info: MembershipInfo,
    pub active: bool,
    pub payments: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Email;
    use crate::domain::user::Profile;

    #[test]
    fn user_view_has_no_password() {
        let user = User::register(
            Email::parse("ana@example.com").unwrap(),
            "$argon2id$v=19$secret",
            Profile {
                name: "Ana".into(),
                ..Default::default()
            },
            Role::Member,
        );
        let json = serde_json::to_value(UserView::from(&user)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2"));
        assert_eq!(json["email"], "ana@example.com");
    }

    #[test]
    fn photo_must_be_supported_and_small() {
        let ok = UploadPhotoRequest {
            content_type: "image/png".into(),
            data: BASE64.encode([0u8; 16]),
        };
        assert!(ok.validate().is_ok());

        let gif = UploadPhotoRequest {
            content_type: "image/gif".into(),
            ..ok.clone()
        };
        assert_eq!(gif.validate().unwrap_err()[0].field, "contentType");

        let huge = UploadPhotoRequest {
            data: BASE64.encode(vec![0u8; MAX_PHOTO_BYTES + 1]),
            ..ok
        };
        assert_eq!(huge.validate().unwrap_err()[0].field, "data");
    }

    #[test]
    fn blank_name_is_rejected() {
        let req = UpdateProfileRequest {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(req.validate().unwrap_err().len(), 1);
    }
}
