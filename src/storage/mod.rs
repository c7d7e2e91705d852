//! Third-party cloud storage destination for recordings and captions.
//!
//! The facade-owned [`StorageConfig`] is read-only after startup; every start
//! call derives its own copy carrying a per-call file name prefix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    pub vendor: u32,
    pub region: u32,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name_prefix: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_params: Option<ExtensionParams>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Aligns caption timestamps with NTP for subtitle sync.
    #[serde(
        rename = "enableNTPtimestamp",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub enable_ntp_timestamp: Option<bool>,
}

impl StorageConfig {
    /// Per-call copy targeting `[channel, YYYYMMDD, HHMMSS]`.
    pub fn for_session(&self, channel: &str, at: DateTime<Utc>) -> Self {
        let mut config = self.clone();
        config.file_name_prefix = Some(file_name_prefix(channel, at));
        config
    }

    pub fn with_ntp_timestamp(mut self) -> Self {
        self.extension_params
            .get_or_insert_with(ExtensionParams::default)
            .enable_ntp_timestamp = Some(true);
        self
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("vendor", &self.vendor)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("file_name_prefix", &self.file_name_prefix)
            .field("extension_params", &self.extension_params)
            .finish()
    }
}

/// Hyphens are not accepted in vendor prefixes.
pub fn file_name_prefix(channel: &str, at: DateTime<Utc>) -> Vec<String> {
    vec![
        channel.replace('-', ""),
        at.format("%Y%m%d").to_string(),
        at.format("%H%M%S").to_string(),
    ]
}
