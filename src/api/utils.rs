//! Extractors and helpers shared by the handlers.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::api::error::ApiError;
use crate::vendor::REQUEST_ID_HEADER;

/// Parses and validates Content-Type header for application/json
///
/// Accepts:
/// - `application/json`
/// - `application/json; charset=utf-8`
///
/// Rejects:
/// - `application/jsonp`
/// - `application/json-patch+json`
/// - `text/json`
/// - Malformed media types
pub fn parse_content_type(content_type: &str) -> Result<mime::Mime, ApiError> {
    let media_type: mime::Mime = content_type.parse().map_err(|_| {
        ApiError::InvalidPayload(format!("invalid Content-Type: {}", content_type))
    })?;

    if media_type.type_() != mime::APPLICATION || media_type.subtype() != mime::JSON {
        return Err(ApiError::InvalidPayload(format!(
            "Content-Type must be application/json, got: {}/{}",
            media_type.type_(),
            media_type.subtype()
        )));
    }

    Ok(media_type)
}

/// JSON request body whose rejections use the API error envelope.
///
/// A missing Content-Type is tolerated; a present one must be JSON.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(content_type) = request.headers().get(CONTENT_TYPE) {
            let content_type = content_type
                .to_str()
                .map_err(|_| ApiError::InvalidPayload("invalid Content-Type".to_string()))?;
            parse_content_type(content_type)?;
        }

        let body = Bytes::from_request(request, state)
            .await
            .map_err(|e| ApiError::InvalidPayload(e.body_text()))?;
        let value = serde_json::from_slice(&body)?;
        Ok(JsonBody(value))
    }
}

/// Mandatory `X-Request-ID`, forwarded to the vendor on media push/pull calls.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| RequestId(value.to_string()))
            .ok_or(ApiError::MissingRequestId)
    }
}

/// Wraps an already encoded JSON document.
pub fn json_response(body: Bytes) -> Response {
    (
        [(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())],
        body,
    )
        .into_response()
}
