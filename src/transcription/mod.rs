//! Real-time transcription facade.
//!
//! Every task call is authorised by a builder token; the caller keeps it
//! together with the task id and relays both on stop and query.

pub mod models;

use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{Result, ServiceError};
use crate::ids::UidGenerator;
use crate::storage::StorageConfig;
use crate::token::{RtcRole, TokenIssuer};
use crate::vendor::{Dispatch, OutboundRequest, parse, path_segment, stamp, with_query};

use models::{
    BuilderTokenRequest, BuilderTokenResponse, CaptionConfig, RtcConfig, StartTaskBody,
    StartTranscription, StartedTranscription, StoppedTranscription, TaskResponse,
};

pub const DEFAULT_MAX_IDLE_SECONDS: i64 = 30;
pub const MIN_IDLE_SECONDS: i64 = 5;
pub const MAX_IDLE_SECONDS: i64 = 2_592_000;
pub const DEFAULT_LANGUAGE: &str = "en-US";

pub struct TranscriptionService {
    root: String,
    storage: StorageConfig,
    dispatcher: Arc<dyn Dispatch>,
    tokens: Arc<dyn TokenIssuer>,
    uids: UidGenerator,
}

impl TranscriptionService {
    pub fn new(
        root: &str,
        storage: StorageConfig,
        dispatcher: Arc<dyn Dispatch>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            root: root.trim_end_matches('/').to_string(),
            storage,
            dispatcher,
            tokens,
            uids: UidGenerator::new(),
        }
    }

    pub fn with_uid_generator(mut self, uids: UidGenerator) -> Self {
        self.uids = uids;
        self
    }

    pub async fn start(&self, request: StartTranscription) -> Result<Bytes> {
        let channel = request.channel_name.trim();
        if channel.is_empty() {
            return Err(ServiceError::MalformedRequest(
                "channelName is required".to_string(),
            ));
        }

        let acquired = self.acquire_builder_token(channel).await?;

        let sub_bot_uid = self.uids.next_string();
        let pub_bot_uid = self.distinct_uid(&sub_bot_uid);
        let sub_bot_token = self
            .tokens
            .rtc_token(channel, &sub_bot_uid, RtcRole::Subscriber)?;
        let pub_bot_token = self
            .tokens
            .rtc_token(channel, &pub_bot_uid, RtcRole::Publisher)?;

        let caption_config = if request.enable_storage.unwrap_or(false) {
            let mut storage = self.storage.for_session(channel, Utc::now());
            if request.enable_ntp_timestamp.unwrap_or(false) {
                storage = storage.with_ntp_timestamp();
            }
            Some(CaptionConfig { storage })
        } else {
            None
        };

        let body = StartTaskBody {
            languages: request
                .languages
                .filter(|languages| !languages.is_empty())
                .unwrap_or_else(|| vec![DEFAULT_LANGUAGE.to_string()]),
            max_idle_time: max_idle_time(request.max_idle_time),
            rtc_config: RtcConfig {
                channel_name: channel.to_string(),
                sub_bot_uid,
                sub_bot_token,
                pub_bot_uid,
                pub_bot_token,
                subscribe_audio_uids: request.subscribe_audio_uids.unwrap_or_default(),
                cryption_mode: request.cryption_mode,
                secret: request.secret,
                salt: request.salt,
            },
            caption_config,
            translate_config: request.translate_config,
        };

        let url = with_query(
            &format!("{}/tasks", self.root),
            &[("builderToken", acquired.token_name.as_str())],
        )?;
        let raw = self
            .dispatcher
            .dispatch(OutboundRequest::post(url, &body)?)
            .await?;
        let started: TaskResponse = parse(&raw)?;
        info!(channel, task_id = %started.task_id, status = %started.status, "Transcription started");

        stamp(StartedTranscription {
            acquire: acquired,
            start: started,
        })
    }

    /// The builder token is scoped to an instance; the channel name is used as instance id.
    pub async fn acquire_builder_token(&self, instance_id: &str) -> Result<BuilderTokenResponse> {
        let body = BuilderTokenRequest {
            instance_id: instance_id.to_string(),
        };
        let raw = self
            .dispatcher
            .dispatch(OutboundRequest::post(
                format!("{}/builderTokens", self.root),
                &body,
            )?)
            .await?;
        let acquired: BuilderTokenResponse = parse(&raw)?;
        debug!(instance_id, "Acquired builder token");
        Ok(acquired)
    }

    pub async fn stop(&self, task_id: &str, builder_token: &str) -> Result<Bytes> {
        let url = self.task_url(task_id, builder_token)?;
        self.dispatcher
            .dispatch(OutboundRequest::delete(url))
            .await?;
        info!(task_id, "Transcription stopped");

        stamp(StoppedTranscription {
            task_id: task_id.to_string(),
            status: "Success",
        })
    }

    pub async fn query(&self, task_id: &str, builder_token: &str) -> Result<Bytes> {
        let url = self.task_url(task_id, builder_token)?;
        let raw = self.dispatcher.dispatch(OutboundRequest::get(url)).await?;
        let status: TaskResponse = parse(&raw)?;
        stamp(status)
    }

    fn task_url(&self, task_id: &str, builder_token: &str) -> Result<String> {
        if task_id.is_empty() || builder_token.is_empty() {
            return Err(ServiceError::MalformedRequest(
                "taskId and builderToken are required".to_string(),
            ));
        }
        let task_id = path_segment(task_id, "taskId")?;
        with_query(
            &format!("{}/tasks/{}", self.root, task_id),
            &[("builderToken", builder_token)],
        )
    }

    fn distinct_uid(&self, taken: &str) -> String {
        loop {
            let uid = self.uids.next_string();
            if uid != taken {
                return uid;
            }
        }
    }
}

/// Falls back to the default outside `[5, 2592000]` seconds.
fn max_idle_time(requested: Option<i64>) -> i64 {
    requested
        .filter(|seconds| (MIN_IDLE_SECONDS..=MAX_IDLE_SECONDS).contains(seconds))
        .unwrap_or(DEFAULT_MAX_IDLE_SECONDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::sample_storage;
    use crate::token::{APP_CERTIFICATE, APP_ID, AccessTokenIssuer};
    use crate::vendor::testing::ScriptedVendor;
    use reqwest::Method;
    use serde_json::{Value, json};

    const ROOT: &str = "https://api.example.com/api/speech-to-text/v1/projects/app";

    fn service(vendor: Arc<ScriptedVendor>) -> TranscriptionService {
        let tokens = Arc::new(AccessTokenIssuer::new(APP_ID, APP_CERTIFICATE).unwrap());
        TranscriptionService::new(ROOT, sample_storage(), vendor, tokens)
            .with_uid_generator(UidGenerator::with_seed(11))
    }

    fn scripted_start() -> Arc<ScriptedVendor> {
        Arc::new(
            ScriptedVendor::new()
                .reply(json!({"tokenName": "bt-1", "createTs": 1700000000, "instanceId": "lecture"}))
                .reply(json!({"taskId": "task-1", "createTs": 1700000001, "status": "STARTED"})),
        )
    }

    fn decode(bytes: &Bytes) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_max_idle_time_window() {
        assert_eq!(max_idle_time(None), 30);
        assert_eq!(max_idle_time(Some(4)), 30);
        assert_eq!(max_idle_time(Some(5)), 5);
        assert_eq!(max_idle_time(Some(2_592_000)), 2_592_000);
        assert_eq!(max_idle_time(Some(2_592_001)), 30);
    }

    #[tokio::test]
    async fn test_start_acquires_then_starts_with_two_bots() {
        let vendor = scripted_start();
        let svc = service(vendor.clone());

        let request: StartTranscription = serde_json::from_value(json!({
            "channelName": "lecture",
            "subscribeAudioUids": ["101"]
        }))
        .unwrap();
        let response = decode(&svc.start(request).await.unwrap());

        assert_eq!(response["acquire"]["tokenName"], "bt-1");
        assert_eq!(response["start"]["taskId"], "task-1");
        assert!(response["timestamp"].is_string());

        let sent = vendor.requests();
        assert_eq!(sent[0].url, format!("{ROOT}/builderTokens"));
        assert_eq!(
            sent[0].body.as_ref().unwrap(),
            &json!({"instanceId": "lecture"})
        );
        assert_eq!(sent[1].url, format!("{ROOT}/tasks?builderToken=bt-1"));

        let body = sent[1].body.as_ref().unwrap();
        assert_eq!(body["languages"], json!(["en-US"]));
        assert_eq!(body["maxIdleTime"], 30);
        assert!(body.get("captionConfig").is_none());

        let rtc = &body["rtcConfig"];
        assert_eq!(rtc["channelName"], "lecture");
        assert_eq!(rtc["subscribeAudioUids"], json!(["101"]));
        assert_ne!(rtc["subBotUid"], rtc["pubBotUid"]);
        assert_ne!(rtc["subBotToken"], rtc["pubBotToken"]);
    }

    #[tokio::test]
    async fn test_start_with_caption_storage() {
        let vendor = scripted_start();
        let svc = service(vendor.clone());

        let request: StartTranscription = serde_json::from_value(json!({
            "channelName": "lecture-hall",
            "languages": ["en-US", "es-ES"],
            "maxIdleTime": 600,
            "enableStorage": true,
            "enableNTPtimestamp": true
        }))
        .unwrap();
        svc.start(request).await.unwrap();

        let body = vendor.requests()[1].body.clone().unwrap();
        assert_eq!(body["languages"], json!(["en-US", "es-ES"]));
        assert_eq!(body["maxIdleTime"], 600);
        let storage = &body["captionConfig"]["storage"];
        assert_eq!(storage["fileNamePrefix"][0], "lecturehall");
        assert_eq!(storage["extensionParams"]["enableNTPtimestamp"], true);
    }

    #[tokio::test]
    async fn test_start_stops_after_failed_acquire() {
        let vendor = Arc::new(ScriptedVendor::new().fail(ServiceError::VendorRejected {
            status: 403,
            body: "forbidden".to_string(),
        }));
        let svc = service(vendor.clone());

        let request = StartTranscription {
            channel_name: "lecture".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            svc.start(request).await,
            Err(ServiceError::VendorRejected { status: 403, .. })
        ));
        assert_eq!(vendor.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_stop_deletes_task() {
        let vendor = Arc::new(ScriptedVendor::new().reply(json!({})));
        let svc = service(vendor.clone());

        let response = decode(&svc.stop("task-1", "bt/1+").await.unwrap());
        assert_eq!(response["taskId"], "task-1");
        assert_eq!(response["status"], "Success");
        assert!(response["timestamp"].is_string());

        let sent = vendor.requests();
        assert_eq!(sent[0].method, Method::DELETE);
        assert_eq!(
            sent[0].url,
            format!("{ROOT}/tasks/task-1?builderToken=bt%2F1%2B")
        );
        assert!(sent[0].body.is_none());
    }

    #[tokio::test]
    async fn test_query_returns_task_status() {
        let vendor = Arc::new(ScriptedVendor::new().reply(json!({
            "taskId": "task-1", "createTs": 1700000001, "status": "IN_PROGRESS"
        })));
        let svc = service(vendor.clone());

        let response = decode(&svc.query("task-1", "bt-1").await.unwrap());
        assert_eq!(response["status"], "IN_PROGRESS");
        assert_eq!(vendor.requests()[0].method, Method::GET);
    }

    #[tokio::test]
    async fn test_task_calls_require_builder_token() {
        let vendor = Arc::new(ScriptedVendor::new());
        let svc = service(vendor.clone());

        assert!(matches!(
            svc.query("task-1", "").await,
            Err(ServiceError::MalformedRequest(_))
        ));
        assert!(vendor.requests().is_empty());
    }

    #[tokio::test]
    async fn test_task_id_cannot_escape_tasks_collection() {
        let vendor = Arc::new(ScriptedVendor::new().reply(json!({})));
        let svc = service(vendor.clone());

        svc.stop("../../../../../v1/apps/other/cloud_recording/acquire", "bt")
            .await
            .unwrap();

        let sent = vendor.requests();
        assert_eq!(
            sent[0].url,
            format!(
                "{ROOT}/tasks/..%2F..%2F..%2F..%2F..%2Fv1%2Fapps%2Fother%2Fcloud_recording%2Facquire?builderToken=bt"
            )
        );
    }

    #[tokio::test]
    async fn test_task_id_query_characters_are_encoded() {
        let vendor = Arc::new(ScriptedVendor::new().reply(json!({})));
        let svc = service(vendor.clone());

        svc.stop("x?builderToken=y#", "bt").await.unwrap();
        assert_eq!(
            vendor.requests()[0].url,
            format!("{ROOT}/tasks/x%3FbuilderToken=y%23?builderToken=bt")
        );

        assert!(matches!(
            svc.stop("..", "bt").await,
            Err(ServiceError::MalformedRequest(_))
        ));
        assert_eq!(vendor.requests().len(), 1);
    }
}
