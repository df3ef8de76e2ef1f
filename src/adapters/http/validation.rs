//! Request validation.
//!
//! DTOs implement [`Validate`] by running a [`Validator`] over their fields.
//! Each field stops at its first failing rule; every failing field is
//! reported together so the client can highlight all of them at once.

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::foundation::is_plausible_email;

use super::error::ApiError;

pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 128;

/// One rejected field in a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Request bodies that check business rules beyond what serde enforces.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// Collects field errors across a chain of rules.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the rule chain for one field.
    pub fn field<'v, 'a>(&'v mut self, name: &'static str, value: Option<&'a str>) -> FieldRules<'v, 'a> {
        FieldRules {
            validator: self,
            name,
            value,
            failed: false,
        }
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Rules applied to a single optional string field.
///
/// Rules other than [`FieldRules::required`] pass when the value is absent
/// or blank.
pub struct FieldRules<'v, 'a> {
    validator: &'v mut Validator,
    name: &'static str,
    value: Option<&'a str>,
    failed: bool,
}

impl<'v, 'a> FieldRules<'v, 'a> {
    fn present(&self) -> Option<&'a str> {
        if self.failed {
            return None;
        }
        self.value.map(str::trim).filter(|v| !v.is_empty())
    }

    fn fail(mut self, message: impl Into<String>) -> Self {
        self.validator.push(self.name, message);
        self.failed = true;
        self
    }

    pub fn required(self) -> Self {
        if !self.failed && self.value.map_or(true, |v| v.trim().is_empty()) {
            return self.fail("Campo obligatorio");
        }
        self
    }

    pub fn min_len(self, min: usize) -> Self {
        match self.present() {
            Some(v) if v.chars().count() < min => {
                self.fail(format!("Debe tener al menos {} caracteres", min))
            }
            _ => self,
        }
    }

    pub fn max_len(self, max: usize) -> Self {
        match self.present() {
            Some(v) if v.chars().count() > max => {
                self.fail(format!("Debe tener como máximo {} caracteres", max))
            }
            _ => self,
        }
    }

    pub fn email(self) -> Self {
        match self.present() {
            Some(v) if !is_plausible_email(v) => self.fail("Email no válido"),
            _ => self,
        }
    }

    /// Digits with optional spaces, dashes and a leading `+`; 9 to 15 digits.
    pub fn phone(self) -> Self {
        match self.present() {
            Some(v) if !is_plausible_phone(v) => self.fail("Teléfono no válido"),
            _ => self,
        }
    }

    pub fn one_of(self, allowed: &[&str]) -> Self {
        match self.present() {
            Some(v) if !allowed.contains(&v) => {
                self.fail(format!("Valor no permitido. Opciones: {}", allowed.join(", ")))
            }
            _ => self,
        }
    }

    pub fn check(self, ok: impl FnOnce(&str) -> bool, message: &str) -> Self {
        match self.present() {
            Some(v) if !ok(v) => self.fail(message),
            _ => self,
        }
    }
}

impl Validator {
    /// Numeric bounds for a field that is not a string.
    pub fn range<T: PartialOrd + std::fmt::Display>(
        &mut self,
        name: &'static str,
        value: T,
        min: T,
        max: T,
    ) -> &mut Self {
        if value < min || value > max {
            self.push(name, format!("Debe estar entre {} y {}", min, max));
        }
        self
    }
}

pub fn is_plausible_phone(value: &str) -> bool {
    let body = value.strip_prefix('+').unwrap_or(value);
    if !body.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == '-') {
        return false;
    }
    let digits = body.chars().filter(char::is_ascii_digit).count();
    (9..=15).contains(&digits)
}

/// Password rules: length bounds plus at least one letter and one digit.
pub fn password_policy(v: &mut Validator, field: &'static str, password: &str) {
    v.field(field, Some(password))
        .required()
        .min_len(PASSWORD_MIN_LEN)
        .max_len(PASSWORD_MAX_LEN)
        .check(
            |p| p.chars().any(char::is_alphabetic) && p.chars().any(|c| c.is_ascii_digit()),
            "Debe contener al menos una letra y un número",
        );
}

/// Maps a body rejection to 400 and runs [`Validate`] on the result.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    let Json(value) = result.map_err(|err| ApiError::BadRequest(err.body_text()))?;
    value.validate().map_err(ApiError::Validation)?;
    Ok(value)
}

/// JSON body extractor that rejects with the standard error envelope.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let result = Json::<T>::from_request(req, state).await;
        extract_validated_json(result).map(ValidatedJson)
    }
}

/// Optional JSON body. An empty body is `None`; anything else must parse
/// and validate like [`ValidatedJson`].
#[derive(Debug)]
pub struct OptionalJson<T>(pub Option<T>);

#[async_trait]
impl<T, S> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|err| ApiError::BadRequest(err.body_text()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJson(None));
        }
        let value: T = serde_json::from_slice(&body).map_err(|err| {
            ApiError::BadRequest(format!("Failed to parse the request body as JSON: {}", err))
        })?;
        value.validate().map_err(ApiError::Validation)?;
        Ok(OptionalJson(Some(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Signup {
        name: String,
        email: String,
        phone: Option<String>,
        password: String,
    }

    impl Validate for Signup {
        fn validate(&self) -> Result<(), Vec<FieldError>> {
            let mut v = Validator::new();
            v.field("name", Some(self.name.as_str())).required().max_len(10);
            v.field("email", Some(self.email.as_str())).required().email();
            v.field("phone", self.phone.as_deref()).phone();
            password_policy(&mut v, "password", &self.password);
            v.finish()
        }
    }

    fn signup() -> Signup {
        Signup {
            name: "Lucía".into(),
            email: "lucia@example.com".into(),
            phone: None,
            password: "secreto1".into(),
        }
    }

    #[test]
    fn valid_body_passes() {
        assert!(signup().validate().is_ok());
    }

    #[test]
    fn collects_every_failing_field_once() {
        let body = Signup {
            name: "".into(),
            email: "nope".into(),
            phone: Some("12ab".into()),
            password: "abc".into(),
        };
        let errors = body.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "phone", "password"]);
        assert_eq!(errors[0].message, "Campo obligatorio");
    }

    #[test]
    fn password_needs_letter_and_digit() {
        for bad in ["abcdefg", "1234567", "a1"] {
            let mut body = signup();
            body.password = bad.into();
            assert!(body.validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn phone_accepts_common_formats() {
        assert!(is_plausible_phone("+34 600 123 456"));
        assert!(is_plausible_phone("600-123-456"));
        assert!(!is_plausible_phone("600"));
        assert!(!is_plausible_phone("600.123.456"));
    }

    #[test]
    fn one_of_and_range() {
        let mut v = Validator::new();
        v.field("urgency", Some("urgente")).one_of(&["baja", "media", "alta"]);
        v.range("month", 13u32, 1, 12);
        let errors = v.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[1].field, "month");
    }

    #[derive(serde::Deserialize)]
    struct Note {
        reason: Option<String>,
    }

    impl Validate for Note {
        fn validate(&self) -> Result<(), Vec<FieldError>> {
            let mut v = Validator::new();
            v.field("reason", self.reason.as_deref()).max_len(5);
            v.finish()
        }
    }

    async fn optional_note(body: &'static str) -> Result<Option<Note>, ApiError> {
        let req = Request::new(axum::body::Body::from(body));
        OptionalJson::<Note>::from_request(req, &())
            .await
            .map(|OptionalJson(note)| note)
    }

    #[tokio::test]
    async fn optional_body_may_be_empty_but_not_malformed() {
        assert!(optional_note("").await.unwrap().is_none());
        assert!(optional_note("  \n").await.unwrap().is_none());
        let note = optional_note(r#"{"reason":"ok"}"#).await.unwrap().unwrap();
        assert_eq!(note.reason.as_deref(), Some("ok"));

        assert!(matches!(optional_note("{not json").await, Err(ApiError::BadRequest(_))));
        assert!(matches!(
            optional_note(r#"{"reason":"far too long"}"#).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn optional_rules_skip_absent_values() {
        let mut v = Validator::new();
        v.field("phone", None).phone().max_len(3);
        assert!(v.finish().is_ok());
    }
}
