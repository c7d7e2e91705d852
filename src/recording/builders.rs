//! URL templates and defaults for the cloud recording REST contract.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use super::models::RecordingConfig;
use crate::error::ServiceError;
use crate::vendor::path_segment;

pub const ALL_STREAMS: &str = "#allstream#";
pub const RESOURCE_EXPIRED_HOURS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingMode {
    Individual,
    #[default]
    Mix,
    Web,
}

impl RecordingMode {
    /// Absent or empty selects the composite mode.
    pub fn resolve(mode: Option<&str>) -> Result<Self, ServiceError> {
        match mode {
            None | Some("") => Ok(RecordingMode::default()),
            Some(mode) => mode.parse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecordingMode::Individual => "individual",
            RecordingMode::Mix => "mix",
            RecordingMode::Web => "web",
        }
    }
}

impl FromStr for RecordingMode {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(RecordingMode::Individual),
            "mix" => Ok(RecordingMode::Mix),
            "web" => Ok(RecordingMode::Web),
            _ => Err(ServiceError::InvalidConfiguration(
                "Invalid recording mode.".to_string(),
            )),
        }
    }
}

impl fmt::Display for RecordingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vendor scene code for the acquire call.
pub fn scene_code(scene: Option<&str>) -> u32 {
    match scene {
        None | Some("") | Some("realtime") => 0,
        Some("web") => 1,
        Some("postponed") => 2,
        Some(other) => {
            warn!(scene = other, "Unknown scene mode, using realtime");
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Stop,
    Query,
    Update,
    UpdateLayout,
}

impl SessionAction {
    fn segment(self) -> &'static str {
        match self {
            SessionAction::Stop => "stop",
            SessionAction::Query => "query",
            SessionAction::Update => "update",
            SessionAction::UpdateLayout => "updateLayout",
        }
    }
}

/// `{base}/{appId}/cloud_recording`
pub fn recording_root(base_url: &str, app_id: &str) -> String {
    format!("{}/{}/cloud_recording", base_url.trim_end_matches('/'), app_id)
}

pub fn acquire_url(root: &str) -> String {
    format!("{root}/acquire")
}

pub fn start_url(
    root: &str,
    resource_id: &str,
    mode: RecordingMode,
) -> Result<String, ServiceError> {
    let resource_id = path_segment(resource_id, "resourceId")?;
    Ok(format!("{root}/resourceid/{resource_id}/mode/{mode}/start"))
}

pub fn session_url(
    root: &str,
    resource_id: &str,
    sid: &str,
    mode: RecordingMode,
    action: SessionAction,
) -> Result<String, ServiceError> {
    let resource_id = path_segment(resource_id, "resourceId")?;
    let sid = path_segment(sid, "sid")?;
    Ok(format!(
        "{root}/resourceid/{resource_id}/sid/{sid}/mode/{mode}/{}",
        action.segment()
    ))
}

pub fn default_recording_config() -> RecordingConfig {
    RecordingConfig {
        channel_type: 0,
        stream_types: Some(2),
        video_stream_type: Some(0),
        stream_mode: Some("standard".to_string()),
        max_idle_time: Some(120),
        subscribe_audio_uids: Some(vec![ALL_STREAMS.to_string()]),
        subscribe_video_uids: Some(vec![ALL_STREAMS.to_string()]),
        subscribe_uid_group: Some(0),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ROOT: &str = "https://api.example.com/v1/apps/app/cloud_recording";

    #[test]
    fn test_recording_root_trims_trailing_slash() {
        assert_eq!(
            recording_root("https://api.example.com/v1/apps/", "app"),
            ROOT
        );
    }

    #[test]
    fn test_url_segment_order() {
        assert_eq!(acquire_url(ROOT), format!("{ROOT}/acquire"));
        assert_eq!(
            start_url(ROOT, "rid", RecordingMode::Mix).unwrap(),
            format!("{ROOT}/resourceid/rid/mode/mix/start")
        );
        assert_eq!(
            session_url(ROOT, "rid", "sid", RecordingMode::Individual, SessionAction::Stop).unwrap(),
            format!("{ROOT}/resourceid/rid/sid/sid/mode/individual/stop")
        );
        assert_eq!(
            session_url(ROOT, "rid", "sid", RecordingMode::Web, SessionAction::Query).unwrap(),
            format!("{ROOT}/resourceid/rid/sid/sid/mode/web/query")
        );
        assert_eq!(
            session_url(ROOT, "r", "s", RecordingMode::Mix, SessionAction::UpdateLayout).unwrap(),
            format!("{ROOT}/resourceid/r/sid/s/mode/mix/updateLayout")
        );
    }

    #[test]
    fn test_session_ids_are_single_segments() {
        let url = session_url(
            ROOT,
            "../../../../other/cloud_recording/acquire",
            "sid",
            RecordingMode::Mix,
            SessionAction::Stop,
        )
        .unwrap();
        assert_eq!(
            url,
            format!(
                "{ROOT}/resourceid/..%2F..%2F..%2F..%2Fother%2Fcloud_recording%2Facquire/sid/sid/mode/mix/stop"
            )
        );

        let url = start_url(ROOT, "rid?x=1#", RecordingMode::Mix).unwrap();
        assert_eq!(url, format!("{ROOT}/resourceid/rid%3Fx=1%23/mode/mix/start"));

        assert!(matches!(
            session_url(ROOT, "rid", "..", RecordingMode::Mix, SessionAction::Query),
            Err(ServiceError::MalformedRequest(_))
        ));
    }

    #[test]
    fn test_recording_mode_resolution() {
        assert_eq!(RecordingMode::resolve(None).unwrap(), RecordingMode::Mix);
        assert_eq!(RecordingMode::resolve(Some("")).unwrap(), RecordingMode::Mix);
        assert_eq!(
            RecordingMode::resolve(Some("web")).unwrap(),
            RecordingMode::Web
        );
        let err = RecordingMode::resolve(Some("composite")).unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "invalid configuration: Invalid recording mode.");
    }

    #[test]
    fn test_scene_codes() {
        assert_eq!(scene_code(None), 0);
        assert_eq!(scene_code(Some("realtime")), 0);
        assert_eq!(scene_code(Some("web")), 1);
        assert_eq!(scene_code(Some("postponed")), 2);
        assert_eq!(scene_code(Some("later")), 0);
    }

    #[test]
    fn test_default_config_is_fully_populated() {
        assert_eq!(
            serde_json::to_value(default_recording_config()).unwrap(),
            json!({
                "channelType": 0,
                "maxIdleTime": 120,
                "streamTypes": 2,
                "videoStreamType": 0,
                "subscribeAudioUids": ["#allstream#"],
                "subscribeVideoUids": ["#allstream#"],
                "subscribeUidGroup": 0,
                "streamMode": "standard"
            })
        );
    }
}
