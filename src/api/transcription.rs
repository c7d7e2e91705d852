//! `/rtt/*` handlers

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::response::Response;

use super::{
    error::ApiError,
    state::AppState,
    utils::{JsonBody, json_response},
};
use crate::transcription::models::{BuilderTokenParam, StartTranscription};

pub async fn start(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<StartTranscription>,
) -> Result<Response, ApiError> {
    let body = state.transcription()?.start(request).await?;
    Ok(json_response(body))
}

/// POST /rtt/stop/{taskId} with `{builderToken}`
pub async fn stop(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    JsonBody(param): JsonBody<BuilderTokenParam>,
) -> Result<Response, ApiError> {
    let body = state
        .transcription()?
        .stop(&task_id, &param.builder_token)
        .await?;
    Ok(json_response(body))
}

/// GET /rtt/status/{taskId}?builderToken=
pub async fn status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    query: Result<Query<BuilderTokenParam>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(param) = query.map_err(|e| ApiError::InvalidPayload(e.body_text()))?;
    let body = state
        .transcription()?
        .query(&task_id, &param.builder_token)
        .await?;
    Ok(json_response(body))
}
