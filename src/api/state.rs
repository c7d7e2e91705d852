use std::sync::Arc;

use super::error::ApiError;
use super::middleware::CorsPolicy;
use crate::config::{Config, StorageSection, expand_app_id};
use crate::error::{Result, ServiceError};
use crate::observability::Metrics;
use crate::recording::CloudRecordingService;
use crate::rtmp::RtmpService;
use crate::storage::StorageConfig;
use crate::token::{AccessTokenIssuer, TokenIssuer};
use crate::transcription::TranscriptionService;
use crate::vendor::{Dispatch, VendorClient, VendorCredential};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub recording: Option<Arc<CloudRecordingService>>,
    pub transcription: Option<Arc<TranscriptionService>>,
    pub rtmp: Option<Arc<RtmpService>>,
    pub cors: Arc<CorsPolicy>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Production wiring: every facade shares one reqwest-backed dispatcher.
    pub fn from_config(config: Config) -> Result<Self> {
        let metrics = Arc::new(Metrics::new());
        let credential =
            VendorCredential::basic(&config.vendor.customer_id, &config.vendor.customer_secret)?;
        let client = VendorClient::new(config.http_config(), credential, metrics.clone())?;
        Self::with_dispatcher(config, Arc::new(client), metrics)
    }

    /// Builds the enabled facades on top of any [`Dispatch`] implementation.
    pub fn with_dispatcher(
        config: Config,
        dispatcher: Arc<dyn Dispatch>,
        metrics: Arc<Metrics>,
    ) -> Result<Self> {
        let app_id = config.app.app_id.as_str();
        let tokens: Arc<dyn TokenIssuer> = Arc::new(AccessTokenIssuer::new(
            app_id,
            config.app.app_certificate.as_str(),
        )?);
        let storage = config
            .storage
            .as_ref()
            .map(StorageSection::to_storage_config);

        let recording = match &config.cloud_recording {
            Some(section) => Some(Arc::new(CloudRecordingService::new(
                &config.vendor_url(&section.path),
                app_id,
                require_storage(&storage, "cloud_recording")?,
                dispatcher.clone(),
                tokens.clone(),
            ))),
            None => None,
        };

        let transcription = match &config.transcription {
            Some(section) => Some(Arc::new(TranscriptionService::new(
                &config.vendor_url(&section.path),
                require_storage(&storage, "transcription")?,
                dispatcher.clone(),
                tokens.clone(),
            ))),
            None => None,
        };

        let rtmp = config.rtmp.as_ref().map(|section| {
            Arc::new(RtmpService::new(
                &config.vendor.base_url,
                Some(expand_app_id(&section.push_path, app_id)),
                Some(expand_app_id(&section.pull_path, app_id)),
                dispatcher.clone(),
                tokens.clone(),
            ))
        });

        let cors = Arc::new(CorsPolicy::parse(&config.server.cors_allow_origin));

        Ok(Self {
            config: Arc::new(config),
            tokens,
            recording,
            transcription,
            rtmp,
            cors,
            metrics,
        })
    }

    pub fn recording(&self) -> std::result::Result<&CloudRecordingService, ApiError> {
        self.recording
            .as_deref()
            .ok_or(ApiError::Disabled("cloud recording"))
    }

    pub fn transcription(&self) -> std::result::Result<&TranscriptionService, ApiError> {
        self.transcription
            .as_deref()
            .ok_or(ApiError::Disabled("transcription"))
    }

    pub fn rtmp(&self) -> std::result::Result<&RtmpService, ApiError> {
        self.rtmp.as_deref().ok_or(ApiError::Disabled("rtmp"))
    }
}

fn require_storage(storage: &Option<StorageConfig>, capability: &str) -> Result<StorageConfig> {
    storage.clone().ok_or_else(|| {
        ServiceError::InvalidConfiguration(format!("{capability} requires a [storage] section"))
    })
}
