use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::storage::StorageConfig;
use crate::vendor::HttpConfig;

/// Placeholder replaced with the app id in configured vendor paths.
pub const APP_ID_PLACEHOLDER: &str = "{appId}";

/// Top-level configuration
///
/// Each capability section that is present enables the matching facade.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub vendor: VendorConfig,
    #[serde(default)]
    pub storage: Option<StorageSection>,
    #[serde(default)]
    pub cloud_recording: Option<CloudRecordingConfig>,
    #[serde(default)]
    pub transcription: Option<TranscriptionConfig>,
    #[serde(default)]
    pub rtmp: Option<RtmpConfig>,
}

impl Config {
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            connect_timeout: Duration::from_secs(self.server.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.server.request_timeout_secs),
            ..HttpConfig::default()
        }
    }

    /// `vendor.base_url` joined with a configured path, app id filled in.
    pub fn vendor_url(&self, path: &str) -> String {
        let path = expand_app_id(path, &self.app.app_id);
        let base = self.vendor.base_url.trim_end_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path.trim_start_matches('/'))
        }
    }

    pub fn uses_vendor(&self) -> bool {
        self.cloud_recording.is_some() || self.transcription.is_some() || self.rtmp.is_some()
    }
}

pub fn expand_app_id(path: &str, app_id: &str) -> String {
    path.replace(APP_ID_PLACEHOLDER, app_id)
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// `*` or a comma-separated list of allowed origins.
    #[serde(default = "default_cors_allow_origin")]
    pub cors_allow_origin: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_allow_origin: default_cors_allow_origin(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_cors_allow_origin() -> String {
    "*".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

/// Application identity used for token signing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app_id: String,
    /// Usually supplied through `APP_CERTIFICATE`; never written back out.
    #[serde(default, skip_serializing)]
    pub app_certificate: String,
}

/// Vendor REST endpoint and customer credential
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VendorConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default, skip_serializing)]
    pub customer_secret: String,
}

/// Third-party bucket receiving recordings and captions
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageSection {
    #[serde(default)]
    pub vendor: u32,
    #[serde(default)]
    pub region: u32,
    #[serde(default)]
    pub bucket: String,
    #[serde(default, skip_serializing)]
    pub access_key: String,
    #[serde(default, skip_serializing)]
    pub secret_key: String,
}

impl StorageSection {
    pub fn to_storage_config(&self) -> StorageConfig {
        StorageConfig {
            vendor: self.vendor,
            region: self.region,
            bucket: self.bucket.clone(),
            access_key: self.access_key.clone(),
            secret_key: self.secret_key.clone(),
            file_name_prefix: None,
            extension_params: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CloudRecordingConfig {
    #[serde(default = "default_cloud_recording_path")]
    pub path: String,
}

impl Default for CloudRecordingConfig {
    fn default() -> Self {
        Self {
            path: default_cloud_recording_path(),
        }
    }
}

fn default_cloud_recording_path() -> String {
    "/v1/apps".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscriptionConfig {
    #[serde(default = "default_transcription_path")]
    pub path: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            path: default_transcription_path(),
        }
    }
}

fn default_transcription_path() -> String {
    "/api/speech-to-text/v1/projects/{appId}".to_string()
}

/// Media push and pull paths, relative to `{base_url}/{region}/`.
/// An empty path disables that half.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RtmpConfig {
    #[serde(default = "default_push_path")]
    pub push_path: String,
    #[serde(default = "default_pull_path")]
    pub pull_path: String,
}

impl Default for RtmpConfig {
    fn default() -> Self {
        Self {
            push_path: default_push_path(),
            pull_path: default_pull_path(),
        }
    }
}

fn default_push_path() -> String {
    "v1/projects/{appId}".to_string()
}

fn default_pull_path() -> String {
    "v1/projects/{appId}/cloud-player".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.server.cors_allow_origin, "*");
        assert_eq!(config.server.request_timeout_secs, 10);
        assert!(config.storage.is_none());
        assert!(!config.uses_vendor());
    }

    #[test]
    fn test_vendor_url_joins_and_expands() {
        let mut config = Config::default();
        config.app.app_id = "abc".to_string();
        config.vendor.base_url = "https://api.example.com/".to_string();

        assert_eq!(
            config.vendor_url(&TranscriptionConfig::default().path),
            "https://api.example.com/api/speech-to-text/v1/projects/abc"
        );
        assert_eq!(
            config.vendor_url("/v1/apps"),
            "https://api.example.com/v1/apps"
        );
        assert_eq!(config.vendor_url(""), "https://api.example.com");
    }

    #[test]
    fn test_http_config_follows_server_timeouts() {
        let mut config = Config::default();
        config.server.request_timeout_secs = 3;
        let http = config.http_config();
        assert_eq!(http.request_timeout, Duration::from_secs(3));
        assert_eq!(http.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_secrets_are_not_serialized() {
        let mut config = Config::default();
        config.app.app_certificate = "cert".to_string();
        config.vendor.customer_secret = "secret".to_string();
        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("cert"));
        assert!(!rendered.contains("secret"));
    }
}
