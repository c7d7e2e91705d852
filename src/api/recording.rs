//! `/cloud_recording/*` handlers

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Response;

use super::{
    error::ApiError,
    state::AppState,
    utils::{JsonBody, json_response},
};
use crate::recording::models::{
    RecordingSession, StartRecording, StopRecording, UpdateLayout, UpdateSubscription,
};

pub async fn start(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<StartRecording>,
) -> Result<Response, ApiError> {
    let body = state.recording()?.start(request).await?;
    Ok(json_response(body))
}

pub async fn stop(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<StopRecording>,
) -> Result<Response, ApiError> {
    let body = state.recording()?.stop(request).await?;
    Ok(json_response(body))
}

/// GET /cloud_recording/status?cname=&uid=&resourceId=&sid=&recordingMode=
pub async fn status(
    State(state): State<AppState>,
    query: Result<Query<RecordingSession>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(session) = query.map_err(|e| ApiError::InvalidPayload(e.body_text()))?;
    let body = state.recording()?.query(session).await?;
    Ok(json_response(body))
}

pub async fn update_subscriber_list(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateSubscription>,
) -> Result<Response, ApiError> {
    let body = state.recording()?.update_subscription(request).await?;
    Ok(json_response(body))
}

pub async fn update_layout(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdateLayout>,
) -> Result<Response, ApiError> {
    let body = state.recording()?.update_layout(request).await?;
    Ok(json_response(body))
}
