//! Origin policy applied in front of every route.

use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, ORIGIN, VARY,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use super::error::ApiError;

pub const ALLOWED_METHODS: &str = "GET, POST, DELETE, PATCH, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Content-Encoding, Authorization, X-Request-ID";
const PREFLIGHT_MAX_AGE: &str = "600";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    Any,
    Origins(Vec<String>),
}

impl CorsPolicy {
    /// `*` allows everything; otherwise a comma-separated origin list.
    pub fn parse(value: &str) -> Self {
        let origins: Vec<String> = value
            .split(',')
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            CorsPolicy::Any
        } else {
            CorsPolicy::Origins(origins)
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        match self {
            CorsPolicy::Any => true,
            CorsPolicy::Origins(origins) => {
                let origin = origin.trim_end_matches('/');
                origins.iter().any(|allowed| allowed == origin)
            }
        }
    }

    fn decorate(&self, headers: &mut HeaderMap, origin: &HeaderValue) {
        match self {
            CorsPolicy::Any => {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
            }
            CorsPolicy::Origins(_) => {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
                headers.insert(VARY, HeaderValue::from_static("Origin"));
            }
        }
    }
}

/// Rejects foreign origins with 403 and answers preflights with 204.
/// Requests without an `Origin` header are not cross-origin and pass untouched.
pub async fn cors(State(policy): State<Arc<CorsPolicy>>, request: Request, next: Next) -> Response {
    let Some(origin) = request.headers().get(ORIGIN).cloned() else {
        return next.run(request).await;
    };

    let origin_str = origin.to_str().unwrap_or_default();
    if !policy.allows(origin_str) {
        return ApiError::OriginNotAllowed(origin_str.to_string()).into_response();
    }

    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        let headers = response.headers_mut();
        policy.decorate(headers, &origin);
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(
            ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE),
        );
        return response;
    }

    let mut response = next.run(request).await;
    policy.decorate(response.headers_mut(), &origin);
    response
}
