//! Configuration management for mediagate
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use mediagate::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `MEDIAGATE__<section>__<key>`
//!
//! Examples:
//! - `MEDIAGATE__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `MEDIAGATE__VENDOR__BASE_URL=https://api.example.com`
//!
//! Secrets come from `APP_CERTIFICATE`, `CUSTOMER_SECRET`,
//! `STORAGE_BUCKET_ACCESS_KEY` and `STORAGE_BUCKET_SECRET_KEY`.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/mediagate.toml`.
//! This can be overridden using the `MEDIAGATE_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{
    APP_ID_PLACEHOLDER, AppConfig, CloudRecordingConfig, Config, RtmpConfig, ServerConfig,
    StorageSection, TranscriptionConfig, VendorConfig, expand_app_id,
};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`MEDIAGATE__*` and the secret variables)
    /// 2. TOML file (default: `config/mediagate.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - Validation fails (missing credentials, incomplete storage, etc.)
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
