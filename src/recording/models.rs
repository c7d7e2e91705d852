//! Cloud recording payloads: client input, vendor request bodies and vendor
//! responses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::file_list::FileList;
use crate::error::{Result, ServiceError};
use crate::storage::StorageConfig;

// ---- client input ---------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRecording {
    pub channel_name: String,
    #[serde(default)]
    pub scene_mode: Option<String>,
    #[serde(default)]
    pub recording_mode: Option<String>,
    #[serde(default)]
    pub exclude_resource_ids: Option<Vec<String>>,
    #[serde(default)]
    pub recording_config: Option<RecordingConfig>,
    #[serde(default)]
    pub recording_file_config: Option<RecordingFileConfig>,
    #[serde(default)]
    pub snapshot_config: Option<SnapshotConfig>,
    #[serde(default)]
    pub extension_service_config: Option<ExtensionServiceConfig>,
    #[serde(default)]
    pub apps_collection: Option<AppsCollection>,
    #[serde(default)]
    pub transcode_options: Option<TranscodeOptions>,
}

/// Identifiers of a running recording, owned and relayed by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingSession {
    pub cname: String,
    pub uid: String,
    pub resource_id: String,
    pub sid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_mode: Option<String>,
}

impl RecordingSession {
    pub fn ensure_complete(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("cname", &self.cname),
            ("uid", &self.uid),
            ("resourceId", &self.resource_id),
            ("sid", &self.sid),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::MalformedRequest(format!(
                "missing session fields: {}",
                missing.join(", ")
            )))
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopRecording {
    #[serde(flatten)]
    pub session: RecordingSession,
    #[serde(default)]
    pub async_stop: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSubscription {
    #[serde(flatten)]
    pub session: RecordingSession,
    #[serde(rename = "recordingConfig")]
    pub update: UpdateSubscriptionClientRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLayout {
    #[serde(flatten)]
    pub session: RecordingSession,
    #[serde(rename = "recordingConfig")]
    pub layout: UpdateLayoutClientRequest,
}

// ---- shared configuration -------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingConfig {
    #[serde(default)]
    pub channel_type: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decryption_mode: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_idle_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_types: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_stream_type: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribe_audio_uids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsubscribe_audio_uids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribe_video_uids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsubscribe_video_uids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribe_uid_group: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_profile: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcoding_config: Option<TranscodingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_resolution_uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixed_video_layout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_user_background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_config: Option<Vec<LayoutConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_config: Option<Vec<BackgroundConfig>>,
}

/// Region of one user inside the mixed canvas; coordinates are canvas fractions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub x_axis: f64,
    pub y_axis: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_mode: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackgroundConfig {
    pub uid: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_mode: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingFileConfig {
    pub av_file_type: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_interval: Option<u32>,
    pub file_type: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_handle_policy: Option<String>,
    pub extension_services: Vec<ExtensionService>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionService {
    pub service_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_handle_policy: Option<String>,
    /// Web page recorder parameters are forwarded untouched.
    pub service_param: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppsCollection {
    pub combination_policy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeOptions {
    pub trans_config: TransConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<TranscodeAudio>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransConfig {
    pub trans_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeAudio {
    pub sample_rate: String,
    pub bitrate: String,
    pub channels: String,
}

// ---- vendor request bodies ------------------------------------------------

/// Envelope shared by every session-scoped vendor call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBody<T> {
    pub cname: String,
    pub uid: String,
    pub client_request: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub storage_config: StorageConfig,
    pub recording_config: RecordingConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_file_config: Option<RecordingFileConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_config: Option<SnapshotConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_service_config: Option<ExtensionServiceConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apps_collection: Option<AppsCollection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcode_options: Option<TranscodeOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquireClientRequest {
    pub scene: u32,
    pub resource_expired_hour: u32,
    pub start_parameter: ClientRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_resource_ids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StopClientRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub async_stop: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscriptionClientRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_subscribe: Option<StreamSubscribe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_recording_config: Option<WebRecordingConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtmp_publish_config: Option<RtmpPublishConfig>,
}

impl UpdateSubscriptionClientRequest {
    /// Clears alternatives that carry no content so they are not forwarded.
    pub fn drop_empty_alternatives(&mut self) {
        if self.stream_subscribe.as_ref().is_some_and(StreamSubscribe::is_empty) {
            self.stream_subscribe = None;
        }
        if self
            .rtmp_publish_config
            .as_ref()
            .is_some_and(|publish| publish.outputs.is_empty())
        {
            self.rtmp_publish_config = None;
        }
    }

    /// Exactly one of the three alternatives may carry content. An empty
    /// `streamSubscribe` or an `rtmpPublishConfig` without outputs counts as absent.
    pub fn validate(&self) -> Result<()> {
        let set = [
            self.stream_subscribe
                .as_ref()
                .is_some_and(|subscribe| !subscribe.is_empty()),
            self.web_recording_config.is_some(),
            self.rtmp_publish_config
                .as_ref()
                .is_some_and(|publish| !publish.outputs.is_empty()),
        ]
        .into_iter()
        .filter(|present| *present)
        .count();

        if set == 1 {
            Ok(())
        } else {
            Err(ServiceError::InvalidConfiguration(format!(
                "exactly one of streamSubscribe, webRecordingConfig or rtmpPublishConfig must be set, got {}",
                set
            )))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamSubscribe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_uid_list: Option<AudioUidList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_uid_list: Option<VideoUidList>,
}

impl StreamSubscribe {
    pub fn is_empty(&self) -> bool {
        let audio_empty = self.audio_uid_list.as_ref().is_none_or(|list| {
            uids_empty(&list.subscribe_audio_uids) && uids_empty(&list.unsubscribe_audio_uids)
        });
        let video_empty = self.video_uid_list.as_ref().is_none_or(|list| {
            uids_empty(&list.subscribe_video_uids) && uids_empty(&list.unsubscribe_video_uids)
        });
        audio_empty && video_empty
    }
}

fn uids_empty(uids: &Option<Vec<String>>) -> bool {
    uids.as_ref().is_none_or(Vec::is_empty)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioUidList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribe_audio_uids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsubscribe_audio_uids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoUidList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribe_video_uids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsubscribe_video_uids: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebRecordingConfig {
    pub onhold: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RtmpPublishConfig {
    pub outputs: Vec<RtmpOutput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtmpOutput {
    pub rtmp_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLayoutClientRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_resolution_uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixed_video_layout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_user_background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_config: Option<Vec<LayoutConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_config: Option<Vec<BackgroundConfig>>,
}

// ---- vendor responses -----------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquireResponse {
    pub resource_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub resource_id: String,
    pub sid: String,
}

/// Stop and query responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRecordingResponse {
    pub resource_id: String,
    pub sid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_response: Option<ServerResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_list_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_list: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploading_status: Option<String>,
    /// Mode specific fields (status, extensionServiceState, ...) passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServerResponse {
    pub fn has_file_list(&self) -> bool {
        self.file_list_mode.is_some() || self.file_list.is_some()
    }

    /// Decode the file list by its mode and write the typed form back.
    pub fn normalize_file_list(&mut self) -> Result<FileList> {
        let list = FileList::decode(self.file_list_mode.as_deref(), self.file_list.as_ref())?;
        let encoded =
            serde_json::to_value(&list).map_err(|e| ServiceError::Encode(e.to_string()))?;
        self.file_list = Some(encoded);
        Ok(list)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    pub sid: String,
}
