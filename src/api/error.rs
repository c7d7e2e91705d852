use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use super::models::ErrorResponse;
use crate::error::ServiceError;
use crate::token::TokenError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("payload invalid: {0}")]
    InvalidPayload(String),
    #[error("X-Request-ID header is required")]
    MissingRequestId,
    #[error("origin not allowed: {0}")]
    OriginNotAllowed(String),
    #[error("{0} is not enabled")]
    Disabled(&'static str),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload(_) | ApiError::MissingRequestId => StatusCode::BAD_REQUEST,
            ApiError::OriginNotAllowed(_) => StatusCode::FORBIDDEN,
            ApiError::Disabled(_) => StatusCode::NOT_FOUND,
            ApiError::Service(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidPayload(_) => "INVALID_PAYLOAD",
            ApiError::MissingRequestId => "MISSING_REQUEST_ID",
            ApiError::OriginNotAllowed(_) => "ORIGIN_NOT_ALLOWED",
            ApiError::Disabled(_) => "CAPABILITY_DISABLED",
            ApiError::Service(err) => err.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(code = self.code(), error = %self, "Request failed");
        }

        let body = ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        };

        (status, Json(json!(body))).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::InvalidPayload(value.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(value: TokenError) -> Self {
        ApiError::Service(ServiceError::Token(value))
    }
}
