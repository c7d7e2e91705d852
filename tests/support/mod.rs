//! Shared fixtures for the HTTP surface tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use bytes::Bytes;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use mediagate::api::{AppState, router};
use mediagate::config::Config;
use mediagate::error::{Result, ServiceError};
use mediagate::observability::Metrics;
use mediagate::vendor::{Dispatch, OutboundRequest};

pub const APP_ID: &str = "970ca35de60c44645bbae8a215061b33";
pub const APP_CERTIFICATE: &str = "5cfd2fd1755d40ecb72977518be15d3b";

/// In-process stand-in for the vendor: replays canned replies in order and
/// records what would have been sent.
#[derive(Default)]
pub struct ScriptedDispatch {
    replies: Mutex<VecDeque<Result<Bytes>>>,
    seen: Mutex<Vec<OutboundRequest>>,
}

impl ScriptedDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, body: Value) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(Bytes::from(body.to_string())));
        self
    }

    pub fn fail(self, err: ServiceError) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dispatch for ScriptedDispatch {
    async fn dispatch(&self, request: OutboundRequest) -> Result<Bytes> {
        request.ensure_body()?;
        self.seen.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Transport("no scripted reply".to_string())))
    }
}

/// Every capability enabled against `https://api.example.com`.
pub fn full_config() -> Config {
    let config_toml = format!(
        r#"
[app]
app_id = "{APP_ID}"
app_certificate = "{APP_CERTIFICATE}"

[vendor]
base_url = "https://api.example.com"
customer_id = "customer"
customer_secret = "secret"

[storage]
vendor = 1
region = 3
bucket = "recordings"
access_key = "AKIA"
secret_key = "shh"

[cloud_recording]
path = "/v1/apps"

[transcription]
path = "/api/speech-to-text/v1/projects/{{appId}}"

[rtmp]
push_path = "v1/projects/{{appId}}"
pull_path = "v1/projects/{{appId}}/cloud-player"
"#
    );

    toml::from_str(&config_toml).expect("Failed to parse test config")
}

/// Token issuance only; no vendor capability.
pub fn token_only_config() -> Config {
    let config_toml = format!(
        r#"
[app]
app_id = "{APP_ID}"
app_certificate = "{APP_CERTIFICATE}"
"#
    );

    toml::from_str(&config_toml).expect("Failed to parse test config")
}

pub fn build_app(config: Config, vendor: Arc<ScriptedDispatch>) -> Router {
    let state = AppState::with_dispatcher(config, vendor, Arc::new(Metrics::new()))
        .expect("Failed to build app state");
    router(state)
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
