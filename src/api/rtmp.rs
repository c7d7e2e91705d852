//! `/rtmp/push/*` and `/rtmp/pull/*` handlers
//!
//! Every route here requires `X-Request-ID`; it is checked before the body
//! is read and forwarded on the vendor call.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Response;

use super::{
    error::ApiError,
    state::AppState,
    utils::{JsonBody, RequestId, json_response},
};
use crate::rtmp::models::{
    RegionQuery, StartPull, StartPush, StopPull, StopPush, UpdatePull, UpdatePush,
};

fn region(query: Result<Query<RegionQuery>, QueryRejection>) -> Result<String, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidPayload(e.body_text()))?;
    Ok(query.region)
}

pub async fn start_push(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    JsonBody(request): JsonBody<StartPush>,
) -> Result<Response, ApiError> {
    let body = state.rtmp()?.start_push(request, &request_id).await?;
    Ok(json_response(body))
}

pub async fn stop_push(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    JsonBody(request): JsonBody<StopPush>,
) -> Result<Response, ApiError> {
    let body = state.rtmp()?.stop_push(request, &request_id).await?;
    Ok(json_response(body))
}

pub async fn update_push(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    JsonBody(request): JsonBody<UpdatePush>,
) -> Result<Response, ApiError> {
    let body = state.rtmp()?.update_push(request, &request_id).await?;
    Ok(json_response(body))
}

pub async fn list_push(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    query: Result<Query<RegionQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let region = region(query)?;
    let body = state.rtmp()?.list_push(&region, &request_id).await?;
    Ok(json_response(body))
}

pub async fn start_pull(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    JsonBody(request): JsonBody<StartPull>,
) -> Result<Response, ApiError> {
    let body = state.rtmp()?.start_pull(request, &request_id).await?;
    Ok(json_response(body))
}

pub async fn stop_pull(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    JsonBody(request): JsonBody<StopPull>,
) -> Result<Response, ApiError> {
    let body = state.rtmp()?.stop_pull(request, &request_id).await?;
    Ok(json_response(body))
}

pub async fn update_pull(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    JsonBody(request): JsonBody<UpdatePull>,
) -> Result<Response, ApiError> {
    let body = state.rtmp()?.update_pull(request, &request_id).await?;
    Ok(json_response(body))
}

pub async fn list_pull(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    query: Result<Query<RegionQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let region = region(query)?;
    let body = state.rtmp()?.list_pull(&region, &request_id).await?;
    Ok(json_response(body))
}
