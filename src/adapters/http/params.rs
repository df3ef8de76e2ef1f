//! Path and query parameter helpers shared by the route groups.

use std::str::FromStr;

use async_trait::async_trait;
use axum::extract::rejection::PathRejection;
use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::ApiError;

/// Query string extractor that rejects with the standard error envelope.
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|err| ApiError::BadRequest(err.body_text()))?;
        Ok(ApiQuery(value))
    }
}

/// Path segment extractor that rejects with the standard error envelope.
///
/// Undecodable segments are the client's fault; a handler mounted on a route
/// without the expected parameters is ours.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|err| match err {
                PathRejection::FailedToDeserializePathParams(e) => {
                    ApiError::BadRequest(e.body_text())
                }
                other => ApiError::internal(other.body_text()),
            })?;
        Ok(ApiPath(value))
    }
}

/// Parses a path id. Anything that is not a valid id is reported as missing.
pub fn parse_id<T: FromStr>(raw: &str, not_found: &str) -> Result<T, ApiError> {
    raw.parse::<T>()
        .map_err(|_| ApiError::not_found(not_found.to_string()))
}

/// Parses an optional query filter through the type's serde names, so
/// `?status=issued` accepts exactly what the API emits.
pub fn parse_filter<T: DeserializeOwned>(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<T>, ApiError> {
    raw.filter(|s| !s.is_empty())
        .map(|s| {
            serde_json::from_value(serde_json::Value::String(s.to_string()))
                .map_err(|_| ApiError::field(field, format!("Valor no válido: {}", s)))
        })
        .transpose()
}

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// `?page=&perPage=` with sane bounds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl Pagination {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::EventId;
    use axum::http::StatusCode;

    #[test]
    fn malformed_ids_are_not_found() {
        let err = parse_id::<EventId>("nope", "Evento no encontrado").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let id = EventId::new();
        assert_eq!(parse_id::<EventId>(&id.to_string(), "x").unwrap(), id);
    }

    #[test]
    fn filters_use_wire_names() {
        use crate::domain::accounting::InvoiceStatus;

        let status: Option<InvoiceStatus> = parse_filter("status", Some("overdue")).unwrap();
        assert_eq!(status, Some(InvoiceStatus::Overdue));
        assert_eq!(parse_filter::<InvoiceStatus>("status", Some("")).unwrap(), None);
        assert!(parse_filter::<InvoiceStatus>("status", Some("Overdue")).is_err());
    }

    #[derive(Debug, Deserialize)]
    struct YearQuery {
        year: Option<i32>,
    }

    fn parts(uri: &str) -> Parts {
        axum::http::Request::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn malformed_query_maps_to_bad_request() {
        let ApiQuery(query) = ApiQuery::<YearQuery>::from_request_parts(&mut parts("/?year=2024"), &())
            .await
            .unwrap();
        assert_eq!(query.year, Some(2024));

        let err = ApiQuery::<YearQuery>::from_request_parts(&mut parts("/?year=abc"), &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn path_outside_a_route_is_an_internal_error() {
        let err = ApiPath::<String>::from_request_parts(&mut parts("/x"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn pagination_is_clamped() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(1000),
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.per_page(), MAX_PER_PAGE);
        assert_eq!(Pagination::default().per_page(), DEFAULT_PER_PAGE);
    }
}
