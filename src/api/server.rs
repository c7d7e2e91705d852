use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::header::{CACHE_CONTROL, EXPIRES, PRAGMA};
use axum::http::{HeaderName, HeaderValue};
use axum::response::Response;
use axum::{Router, middleware, routing::get, routing::post};
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};

use super::{middleware::cors, recording, rtmp, services, state::AppState, transcription};
use crate::config::Config;
use crate::vendor::rfc3339_now;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub const TIMESTAMP_HEADER: &str = "x-timestamp";

/// Every route, with the response header policy and origin checks applied.
pub fn router(state: AppState) -> Router {
    let cors_policy = state.cors.clone();

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/ping", get(services::ping))
        .route("/health", get(services::health))
        .route("/token/getNew", post(services::get_token))
        .route("/cloud_recording/start", post(recording::start))
        .route("/cloud_recording/stop", post(recording::stop))
        .route("/cloud_recording/status", get(recording::status))
        .route(
            "/cloud_recording/update/subscriber-list",
            post(recording::update_subscriber_list),
        )
        .route(
            "/cloud_recording/update/layout",
            post(recording::update_layout),
        )
        .route("/rtt/start", post(transcription::start))
        .route("/rtt/stop/{task_id}", post(transcription::stop))
        .route("/rtt/status/{task_id}", get(transcription::status))
        .route("/rtmp/push/start", post(rtmp::start_push))
        .route("/rtmp/push/stop", post(rtmp::stop_push))
        .route("/rtmp/push/update", post(rtmp::update_push))
        .route("/rtmp/push/list", get(rtmp::list_push))
        .route("/rtmp/pull/start", post(rtmp::start_pull))
        .route("/rtmp/pull/stop", post(rtmp::stop_pull))
        .route("/rtmp/pull/update", post(rtmp::update_pull))
        .route("/rtmp/pull/list", get(rtmp::list_pull))
        .with_state(state)
        // gzip request bodies are inflated before any extractor runs
        .layer(RequestDecompressionLayer::new())
        .layer(middleware::from_fn_with_state(cors_policy, cors))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("private, no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            EXPIRES,
            HeaderValue::from_static("-1"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(TIMESTAMP_HEADER),
            |_: &Response| HeaderValue::from_str(&rfc3339_now()).ok(),
        ))
        .layer(trace_layer)
}

pub async fn run(address: Option<SocketAddr>, config_path: Option<PathBuf>) -> Result<(), AnyError> {
    info!("Loading configuration");
    let config = match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .map_err(|e| format!("Failed to load config: {}", e))?;

    let address = address.unwrap_or(config.server.bind_addr);
    let state = AppState::from_config(config)
        .map_err(|e| format!("Failed to initialise services: {}", e))?;

    info!(
        cloud_recording = state.recording.is_some(),
        transcription = state.transcription.is_some(),
        rtmp = state.rtmp.is_some(),
        "Services initialised"
    );

    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "mediagate listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
