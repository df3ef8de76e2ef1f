//! HTTP DTOs for the admin panel.

use serde::Deserialize;

use crate::domain::event::EventDetails;
use crate::domain::foundation::Role;
use crate::domain::user::AccountStatus;

use super::super::error::ApiError;
use super::super::params::Pagination;
use super::super::validation::{FieldError, Validate, Validator};

pub const ACCOUNT_STATUSES: [&str; 2] = ["active", "inactive"];
pub const ROLES: [&str; 3] = ["member", "afiliado", "admin"];

/// `GET /api/admin/users` query string.
///
/// Pagination fields are inlined: flattened structs lose numeric types in
/// query strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListQuery {
    pub status: Option<String>,
    pub role: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl UserListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn status(&self) -> Result<Option<AccountStatus>, ApiError> {
        self.status
            .as_deref()
            .map(|s| {
                s.parse()
                    .map_err(|_| ApiError::field("status", "Estado de cuenta desconocido"))
            })
            .transpose()
    }

    pub fn role(&self) -> Result<Option<Role>, ApiError> {
        self.role
            .as_deref()
            .map(|r| r.parse().map_err(|_| ApiError::field("role", "Rol desconocido")))
            .transpose()
    }

    pub fn search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeAccountStatusRequest {
    pub status: String,
}

impl Validate for ChangeAccountStatusRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.field("status", Some(self.status.as_str()))
            .required()
            .one_of(&ACCOUNT_STATUSES);
        v.finish()
    }
}

impl Validate for EventDetails {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut v = Validator::new();
        v.field("title", Some(self.title.as_str())).max_len(200);
        v.field("location", self.location.as_deref()).max_len(200);
        v.field("description", Some(self.description.as_str())).max_len(10_000);
        let mut errors = v.finish().err().unwrap_or_default();
        if let Err(e) = EventDetails::validate(self) {
            errors.push(FieldError::new(e.field(), e.to_string()));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_without_title_is_rejected() {
        let details: EventDetails = serde_json::from_value(serde_json::json!({
            "title": "  ",
            "description": "",
            "kind": "course"
        }))
        .unwrap();
        let errors = Validate::validate(&details).unwrap_err();
        assert_eq!(errors[0].field, "title");
    }

    #[test]
    fn legacy_role_spelling_is_accepted() {
        let query = UserListQuery {
            role: Some("afiliado".into()),
            ..Default::default()
        };
        assert_eq!(query.role().unwrap(), Some(Role::Member));
    }

    #[test]
    fn blank_search_is_ignored() {
        let query = UserListQuery {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(query.search(), None);
    }

    #[test]
    fn unknown_status_is_a_field_error() {
        let query = UserListQuery {
            status: Some("deleted".into()),
            ..Default::default()
        };
        assert!(matches!(query.status(), Err(ApiError::Validation(_))));
    }
}
