//! RTMP converter (push) and cloud player (pull) payloads.

use serde::{Deserialize, Serialize};

// ---- push -------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPush {
    #[serde(default)]
    pub converter_name: Option<String>,
    pub rtc_channel: String,
    pub stream_url: String,
    pub stream_key: String,
    pub region: String,
    #[serde(default)]
    pub region_hint_ip: Option<String>,
    #[serde(default)]
    pub use_transcoding: bool,
    #[serde(default)]
    pub rtc_stream_uid: Option<String>,
    #[serde(default)]
    pub audio_options: Option<PushAudioOptions>,
    #[serde(default)]
    pub video_options: Option<PushVideoOptions>,
    #[serde(default)]
    pub idle_time_out: Option<u32>,
    #[serde(default)]
    pub jitter_buffer_size_ms: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPush {
    pub converter_id: String,
    pub region: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePush {
    pub converter_id: String,
    pub region: String,
    #[serde(default)]
    pub stream_url: Option<String>,
    #[serde(default)]
    pub stream_key: Option<String>,
    pub rtc_channel: String,
    #[serde(default)]
    pub video_options: Option<PushVideoOptions>,
    #[serde(default)]
    pub jitter_buffer_size_ms: Option<u32>,
    #[serde(default)]
    pub sequence_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConverterBody {
    pub converter: Converter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Converter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcode_options: Option<TranscodeOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_options: Option<RawOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtmp_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_time_out: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jitter_buffer_size_ms: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOptions {
    pub rtc_channel: String,
    pub rtc_stream_uid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeOptions {
    pub rtc_channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_options: Option<PushAudioOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_options: Option<PushVideoOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushAudioOptions {
    pub codec_profile: String,
    pub sample_rate: u32,
    pub bitrate: u32,
    pub audio_channels: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushVideoOptions {
    pub canvas: Canvas,
    #[serde(default)]
    pub layout: Vec<Layout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<Vertical>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_placeholder_image_url: Option<String>,
    /// Codec settings are fixed once a converter runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gop: Option<u32>,
    pub bitrate: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sei_options: Option<SeiOptions>,
}

impl PushVideoOptions {
    pub fn without_codec(mut self) -> Self {
        self.codec = None;
        self.codec_profile = None;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub rtc_stream_uid: String,
    pub region: LayoutRegion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRegion {
    pub x_pos: u32,
    pub y_pos: u32,
    pub z_index: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vertical {
    pub max_resolution_uid: u32,
    pub fill_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeiOptions {
    pub source: SeiSource,
    pub sink: SeiSink,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeiSource {
    pub metadata: bool,
    pub datastream: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customized: Option<SeiCustomized>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeiCustomized {
    pub prefix_for_agora_sei: String,
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeiSink {
    #[serde(rename = "type")]
    pub kind: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartPushResponse {
    pub converter: ConverterState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverterState {
    pub id: String,
    #[serde(default)]
    pub create_ts: i64,
    #[serde(default)]
    pub update_ts: i64,
    #[serde(default)]
    pub state: String,
}

// ---- pull -------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPull {
    pub channel_name: String,
    pub stream_url: String,
    pub region: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default, rename = "name")]
    pub player_name: Option<String>,
    #[serde(default)]
    pub stream_origin_ip: Option<String>,
    #[serde(default)]
    pub audio_options: Option<PullAudioOptions>,
    #[serde(default)]
    pub video_options: Option<PullVideoOptions>,
    #[serde(default)]
    pub idle_time_out: Option<u32>,
    #[serde(default)]
    pub play_ts: Option<i64>,
    #[serde(default)]
    pub encrypt_mode: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPull {
    pub player_id: String,
    pub region: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePull {
    pub player_id: String,
    pub region: String,
    #[serde(default)]
    pub stream_url: Option<String>,
    #[serde(default)]
    pub audio_options: Option<PullAudioOptions>,
    #[serde(default)]
    pub video_options: Option<PullVideoOptions>,
    #[serde(default)]
    pub is_pause: Option<bool>,
    #[serde(default)]
    pub seek_position: Option<u64>,
    #[serde(default)]
    pub sequence_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerBody<T> {
    pub player: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_options: Option<PullAudioOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_options: Option<PullVideoOptions>,
    pub stream_url: String,
    pub channel_name: String,
    pub token: String,
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_time_out: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_ts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypt_mode: Option<String>,
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_options: Option<PullAudioOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_options: Option<PullVideoOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_pause: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seek_position: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullAudioOptions {
    /// Sample rate, bitrate and channel preset in `0..=5`.
    pub profile: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullVideoOptions {
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_height_adaption: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<u32>,
    pub bitrate: u32,
    pub codec: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gop: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartPullResponse {
    pub player: PlayerState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    pub id: String,
    #[serde(default)]
    pub create_ts: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

// ---- shared -----------------------------------------------------------------

/// Query string of the list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionQuery {
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationStatus {
    pub status: &'static str,
}

impl OperationStatus {
    pub fn success() -> Self {
        Self { status: "Success" }
    }
}
