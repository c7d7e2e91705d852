use axum::{Json, extract::State, response::IntoResponse, response::Response};
use std::collections::HashMap;

use super::{
    error::ApiError,
    models::{HealthResponse, PingResponse, TokenResponse},
    state::AppState,
    utils::{JsonBody, json_response},
};
use crate::token::TokenRequest;
use crate::vendor::stamp;

/// Liveness probe (GET /ping)
pub async fn ping() -> impl IntoResponse {
    Json(PingResponse { message: "pong" })
}

/// Enabled capabilities and vendor call counters (GET /health)
///
/// Nothing here calls the vendor; a running process reports healthy.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let mut components = HashMap::new();
    components.insert("api".to_string(), "healthy".to_string());
    components.insert("tokens".to_string(), "healthy".to_string());

    let availability = |enabled: bool| {
        if enabled { "enabled" } else { "disabled" }.to_string()
    };
    components.insert(
        "cloud_recording".to_string(),
        availability(state.recording.is_some()),
    );
    components.insert(
        "transcription".to_string(),
        availability(state.transcription.is_some()),
    );
    let (push, pull) = state
        .rtmp
        .as_ref()
        .map(|rtmp| (rtmp.push_enabled(), rtmp.pull_enabled()))
        .unwrap_or((false, false));
    components.insert("media_push".to_string(), availability(push));
    components.insert("media_pull".to_string(), availability(pull));

    Json(HealthResponse {
        status: "healthy".to_string(),
        components,
        vendor: state.metrics.snapshot(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Access token issuance (POST /token/getNew)
///
/// Body: `{tokenType: rtc|rtm|chat, channel?, role?, uid?, expire?}`.
pub async fn get_token(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<TokenRequest>,
) -> Result<Response, ApiError> {
    let token = state.tokens.issue(&request)?;
    Ok(json_response(stamp(TokenResponse { token })?))
}
