//! Rate limiting middleware for axum.
//!
//! Two layers use the `RateLimiter` port:
//!
//! 1. `rate_limit_middleware` - global and per-IP limits on every request
//! 2. `resource_rate_limit` - a per-IP budget for one resource, mounted on
//!    the routes it protects (suggestion box, login)
//!
//! Rate limit status is returned in standard HTTP headers:
//! - `X-RateLimit-Limit`: Maximum requests allowed in the window
//! - `X-RateLimit-Remaining`: Requests remaining in the current window
//! - `X-RateLimit-Reset`: Unix timestamp when the window resets
//! - `Retry-After`: Seconds to wait (only on 429 response)
//!
//! A limiter that cannot be reached fails open.
//!
//! The client address is the socket peer. Forwarding headers only count when
//! that peer is one of the [`TrustedProxies`] installed by the router.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::{request::Parts, Extensions, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::ports::{RateLimitKey, RateLimitResult, RateLimiter, RateLimitStatus};

use super::super::error::ApiError;

/// Rate limiter middleware state.
pub type RateLimiterState = Arc<dyn RateLimiter>;

/// Standard rate limit header names.
pub mod headers {
    use super::HeaderName;

    pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
    pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
    pub static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
}

/// Global, then per-IP.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiterState>,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = request_client_ip(request.headers(), request.extensions());

    if let Some(rejection) = consume(limiter.as_ref(), RateLimitKey::global()).await.err() {
        return rejection.into_response();
    }

    if let Some(ip) = &client_ip {
        if let Some(rejection) = consume(limiter.as_ref(), RateLimitKey::client(ip)).await.err() {
            return rejection.into_response();
        }
    }

    let mut response = next.run(request).await;

    if let Some(ip) = &client_ip {
        if let Ok(status) = limiter.status(RateLimitKey::client(ip)).await {
            add_rate_limit_headers(response.headers_mut(), &status);
        }
    }

    response
}

/// State for [`resource_rate_limit`]: the limiter plus the resource name.
#[derive(Clone)]
pub struct ResourceLimit {
    pub limiter: Arc<dyn RateLimiter>,
    pub resource: &'static str,
}

impl ResourceLimit {
    pub fn new(limiter: Arc<dyn RateLimiter>, resource: &'static str) -> Self {
        Self { limiter, resource }
    }
}

/// Per-IP budget for a single resource.
///
/// Requests without a resolvable client address share one bucket.
pub async fn resource_rate_limit(
    State(limit): State<ResourceLimit>,
    request: Request,
    next: Next,
) -> Response {
    let ip = request_client_ip(request.headers(), request.extensions())
        .unwrap_or_else(|| "unknown".to_string());
    let key = RateLimitKey::client_resource(&ip, limit.resource);

    match consume(limit.limiter.as_ref(), key).await {
        Ok(Some(status)) => {
            let mut response = next.run(request).await;
            add_rate_limit_headers(response.headers_mut(), &status);
            response
        }
        Ok(None) => next.run(request).await,
        Err(rejection) => {
            tracing::info!(
                ip = %ip,
                resource = limit.resource,
                retry_after_secs = rejection.retry_after_secs,
                "Rate limit exceeded"
            );
            rejection.into_response()
        }
    }
}

/// Consumes one request from `key`. `Ok(None)` when the limiter is unavailable.
async fn consume(
    limiter: &dyn RateLimiter,
    key: RateLimitKey,
) -> Result<Option<RateLimitStatus>, RateLimitRejection> {
    match limiter.check(key).await {
        Ok(RateLimitResult::Allowed(status)) => Ok(Some(status)),
        Ok(RateLimitResult::Denied(denied)) => Err(RateLimitRejection {
            limit: denied.limit,
            retry_after_secs: denied.retry_after_secs,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Rate limiter unavailable");
            Ok(None)
        }
    }
}

/// Reverse proxies whose `X-Forwarded-For` entries are believed.
///
/// Installed as a request extension; when absent no proxy is trusted.
#[derive(Debug, Clone, Default)]
pub struct TrustedProxies(Arc<Vec<IpAddr>>);

impl TrustedProxies {
    pub fn new(proxies: impl IntoIterator<Item = IpAddr>) -> Self {
        Self(Arc::new(proxies.into_iter().collect()))
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.0.contains(ip)
    }
}

/// Client address as seen through any trusted proxies.
///
/// 1. No socket address: unknown
/// 2. Peer is not a trusted proxy: the peer
/// 3. Otherwise `X-Forwarded-For` is walked right to left and the first hop
///    that is not itself a trusted proxy wins; `X-Real-IP` stands in when the
///    proxy sends no forwarded chain
pub fn client_ip(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    trusted: Option<&TrustedProxies>,
) -> Option<String> {
    let peer = connect_info?.0.ip();
    let Some(trusted) = trusted.filter(|t| t.contains(&peer)) else {
        return Some(peer.to_string());
    };

    let hops: Vec<&str> = headers
        .get_all("X-Forwarded-For")
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(','))
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .collect();

    if hops.is_empty() {
        let real_ip = headers
            .get("X-Real-IP")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.trim().parse::<IpAddr>().ok());
        return Some(real_ip.unwrap_or(peer).to_string());
    }

    let mut client = peer;
    for hop in hops.iter().rev() {
        match hop.parse::<IpAddr>() {
            Ok(ip) => {
                client = ip;
                if !trusted.contains(&ip) {
                    break;
                }
            }
            Err(_) => break,
        }
    }
    Some(client.to_string())
}

fn request_client_ip(headers: &HeaderMap, extensions: &Extensions) -> Option<String> {
    client_ip(headers, extensions.get(), extensions.get())
}

/// Extractor for the caller's address, used to stamp public submissions.
#[derive(Debug, Clone)]
pub struct ClientIp(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(request_client_ip(&parts.headers, &parts.extensions)))
    }
}

fn add_rate_limit_headers(headers: &mut HeaderMap, status: &RateLimitStatus) {
    headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(status.limit));
    headers.insert(headers::X_RATELIMIT_REMAINING.clone(), HeaderValue::from(status.remaining));
    headers.insert(
        headers::X_RATELIMIT_RESET.clone(),
        HeaderValue::from(status.reset_at.as_unix_secs()),
    );
}

/// Rejection for rate limit exceeded.
#[derive(Debug, Clone)]
pub struct RateLimitRejection {
    pub limit: u32,
    pub retry_after_secs: u32,
}

impl IntoResponse for RateLimitRejection {
    fn into_response(self) -> Response {
        let mut response = ApiError::RateLimited {
            retry_after_secs: self.retry_after_secs,
        }
        .into_response();
        let headers = response.headers_mut();
        headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(self.limit));
        headers.insert(headers::X_RATELIMIT_REMAINING.clone(), HeaderValue::from(0u32));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::rate_limiter::{RateLimitConfig, InMemoryRateLimiter, ResourceLimits, SUGGESTIONS_RESOURCE};
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    fn limiter(per_window: u32) -> Arc<dyn RateLimiter> {
        let mut config = RateLimitConfig::default();
        config.resources.insert(
            SUGGESTIONS_RESOURCE.to_string(),
            ResourceLimits {
                requests_per_window: per_window,
                window_secs: 3600,
            },
        );
        Arc::new(InMemoryRateLimiter::new(config))
    }

    fn app(limiter: Arc<dyn RateLimiter>) -> Router {
        Router::new()
            .route("/suggestions", post(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                ResourceLimit::new(limiter, SUGGESTIONS_RESOURCE),
                resource_rate_limit,
            ))
    }

    fn connected(ip: &str) -> ConnectInfo<SocketAddr> {
        ConnectInfo(SocketAddr::new(ip.parse().unwrap(), 40000))
    }

    fn from_ip(ip: &str) -> HttpRequest<Body> {
        let mut request = HttpRequest::builder()
            .method("POST")
            .uri("/suggestions")
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(connected(ip));
        request
    }

    fn via_proxy(proxy: &str, forwarded_for: &str) -> HttpRequest<Body> {
        let mut request = from_ip(proxy);
        request.headers_mut().insert(
            "X-Forwarded-For",
            HeaderValue::from_str(forwarded_for).unwrap(),
        );
        request
    }

    fn proxies(ips: &[&str]) -> TrustedProxies {
        TrustedProxies::new(ips.iter().map(|ip| ip.parse().unwrap()))
    }

    fn forwarded(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-For", HeaderValue::from_static(value));
        headers
    }

    // ════════════════════════════════════════════════════════════════════════════
    // IP Extraction
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn forwarded_headers_are_ignored_without_trusted_proxies() {
        let peer = connected("198.51.100.9");
        let headers = forwarded("1.2.3.4");
        assert_eq!(client_ip(&headers, Some(&peer), None), Some("198.51.100.9".to_string()));
        assert_eq!(
            client_ip(&headers, Some(&peer), Some(&TrustedProxies::default())),
            Some("198.51.100.9".to_string())
        );
    }

    #[test]
    fn forwarded_headers_from_untrusted_peer_are_ignored() {
        let trusted = proxies(&["10.0.0.1"]);
        let peer = connected("198.51.100.9");
        assert_eq!(
            client_ip(&forwarded("1.2.3.4"), Some(&peer), Some(&trusted)),
            Some("198.51.100.9".to_string())
        );
    }

    #[test]
    fn rightmost_untrusted_hop_wins_behind_a_proxy() {
        let trusted = proxies(&["10.0.0.1", "10.0.0.2"]);
        let peer = connected("10.0.0.1");
        assert_eq!(
            client_ip(&forwarded("6.6.6.6, 1.2.3.4, 10.0.0.2"), Some(&peer), Some(&trusted)),
            Some("1.2.3.4".to_string())
        );
        assert_eq!(
            client_ip(&forwarded("garbage, 1.2.3.4"), Some(&peer), Some(&trusted)),
            Some("1.2.3.4".to_string())
        );
        assert_eq!(
            client_ip(&forwarded("1.2.3.4, garbage"), Some(&peer), Some(&trusted)),
            Some("10.0.0.1".to_string())
        );
    }

    #[test]
    fn real_ip_is_used_only_from_a_trusted_proxy() {
        let trusted = proxies(&["10.0.0.1"]);
        let mut headers = HeaderMap::new();
        headers.insert("X-Real-IP", HeaderValue::from_static("9.9.9.9"));

        assert_eq!(
            client_ip(&headers, Some(&connected("10.0.0.1")), Some(&trusted)),
            Some("9.9.9.9".to_string())
        );
        assert_eq!(
            client_ip(&headers, Some(&connected("198.51.100.9")), Some(&trusted)),
            Some("198.51.100.9".to_string())
        );
    }

    #[test]
    fn unknown_without_socket_address() {
        assert_eq!(client_ip(&forwarded("1.2.3.4"), None, Some(&proxies(&["10.0.0.1"]))), None);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Resource limits
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn sixth_request_in_window_is_rejected() {
        let app = app(limiter(5));
        for _ in 0..5 {
            let response = app.clone().oneshot(from_ip("1.1.1.1")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.clone().oneshot(from_ip("1.1.1.1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("retry-after"));
    }

    #[tokio::test]
    async fn budgets_are_per_address() {
        let app = app(limiter(1));
        assert_eq!(app.clone().oneshot(from_ip("1.1.1.1")).await.unwrap().status(), StatusCode::OK);
        assert_eq!(
            app.clone().oneshot(from_ip("1.1.1.1")).await.unwrap().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(app.clone().oneshot(from_ip("2.2.2.2")).await.unwrap().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rotating_forwarded_for_does_not_reset_the_budget() {
        let app = app(limiter(2));
        for spoofed in ["1.1.1.1", "2.2.2.2"] {
            let response = app.clone().oneshot(via_proxy("198.51.100.9", spoofed)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        let response = app
            .clone()
            .oneshot(via_proxy("198.51.100.9", "3.3.3.3"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn trusted_proxy_forwards_distinct_clients() {
        let app = app(limiter(1)).layer(axum::Extension(proxies(&["10.0.0.1"])));
        let first = app.clone().oneshot(via_proxy("10.0.0.1", "1.1.1.1")).await.unwrap();
        let second = app.clone().oneshot(via_proxy("10.0.0.1", "2.2.2.2")).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::OK);

        let spoofed = app
            .clone()
            .oneshot(via_proxy("10.0.0.1", "9.9.9.9, 1.1.1.1"))
            .await
            .unwrap();
        assert_eq!(spoofed.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn allowed_responses_carry_quota_headers() {
        let response = app(limiter(5)).oneshot(from_ip("3.3.3.3")).await.unwrap();
        assert_eq!(response.headers()["x-ratelimit-limit"], "5");
        assert_eq!(response.headers()["x-ratelimit-remaining"], "4");
    }
}
