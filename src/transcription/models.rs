use serde::{Deserialize, Serialize};

use crate::storage::StorageConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTranscription {
    pub channel_name: String,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    /// At most three speakers are transcribed.
    #[serde(default)]
    pub subscribe_audio_uids: Option<Vec<String>>,
    #[serde(default)]
    pub cryption_mode: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub salt: Option<String>,
    #[serde(default)]
    pub max_idle_time: Option<i64>,
    #[serde(default)]
    pub translate_config: Option<TranslateConfig>,
    #[serde(default)]
    pub enable_storage: Option<bool>,
    #[serde(default, rename = "enableNTPtimestamp")]
    pub enable_ntp_timestamp: Option<bool>,
}

/// Query string or body carrying the builder token of a running task.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderTokenParam {
    #[serde(default)]
    pub builder_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateConfig {
    pub force_translate_interval: u32,
    pub languages: Vec<TranslateLanguage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateLanguage {
    pub source: String,
    pub target: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderTokenRequest {
    pub instance_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTaskBody {
    pub languages: Vec<String>,
    pub max_idle_time: i64,
    pub rtc_config: RtcConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption_config: Option<CaptionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate_config: Option<TranslateConfig>,
}

/// Channel settings for the audio subscriber bot and the caption publisher bot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RtcConfig {
    pub channel_name: String,
    pub sub_bot_uid: String,
    pub sub_bot_token: String,
    pub pub_bot_uid: String,
    pub pub_bot_token: String,
    pub subscribe_audio_uids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cryption_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptionConfig {
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderTokenResponse {
    pub token_name: String,
    #[serde(default)]
    pub create_ts: i64,
    #[serde(default)]
    pub instance_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub task_id: String,
    #[serde(default)]
    pub create_ts: i64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartedTranscription {
    pub acquire: BuilderTokenResponse,
    pub start: TaskResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoppedTranscription {
    pub task_id: String,
    pub status: &'static str,
}
