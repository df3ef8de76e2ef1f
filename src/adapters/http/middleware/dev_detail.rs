//! Copies the internal error text into 500 bodies while developing.
//!
//! Only mounted when the server runs in the development environment.

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::super::envelope::ErrorBody;
use super::super::error::{InternalDetail, INTERNAL_MESSAGE};

pub async fn expose_internal_detail(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.status() != StatusCode::INTERNAL_SERVER_ERROR {
        return response;
    }
    let Some(InternalDetail(detail)) = response.extensions().get::<InternalDetail>().cloned() else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    let mut body = ErrorBody::new("INTERNAL_ERROR", INTERNAL_MESSAGE);
    body.detail = Some(detail);
    let fresh = Json(body).into_response();
    let (fresh_parts, fresh_body) = fresh.into_parts();
    parts.headers.extend(fresh_parts.headers);
    Response::from_parts(parts, fresh_body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::error::ApiError;
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/boom", get(|| async { ApiError::internal("pool timed out") }))
            .route("/missing", get(|| async { ApiError::not_found("nada") }))
            .layer(axum::middleware::from_fn(expose_internal_detail))
    }

    async fn get_json(path: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(axum::http::Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn internal_errors_show_detail() {
        let (status, body) = get_json("/boom").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "pool timed out");
        assert_eq!(body["message"], INTERNAL_MESSAGE);
    }

    #[tokio::test]
    async fn other_errors_pass_through() {
        let (status, body) = get_json("/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.get("detail").is_none());
    }
}
