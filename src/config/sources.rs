use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "MEDIAGATE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/mediagate.toml";
const ENV_PREFIX: &str = "MEDIAGATE";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = load_from_sources(config_path)?;
    load_secrets(&mut config, |name| env::var(name).ok());

    Ok(config)
}

/// Load secrets from environment variables into config.
/// Storage keys only land in an existing `[storage]` section.
fn load_secrets<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(certificate) = lookup("APP_CERTIFICATE") {
        config.app.app_certificate = certificate;
    }
    if let Some(secret) = lookup("CUSTOMER_SECRET") {
        config.vendor.customer_secret = secret;
    }

    if let Some(storage) = config.storage.as_mut() {
        if let Some(access_key) = lookup("STORAGE_BUCKET_ACCESS_KEY") {
            storage.access_key = access_key;
        }
        if let Some(secret_key) = lookup("STORAGE_BUCKET_SECRET_KEY") {
            storage.secret_key = secret_key;
        }
    }
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // MEDIAGATE__SERVER__BIND_ADDR -> server.bind_addr
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
