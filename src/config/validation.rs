use super::models::{Config, StorageSection};
use crate::token::is_app_credential;
use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("app.{field} is required")]
    MissingAppCredential { field: &'static str },

    #[error("app.{field} must be 32 hexadecimal characters")]
    InvalidAppCredential { field: &'static str },

    #[error("vendor.{field} is required when a vendor capability is enabled")]
    MissingVendorField { field: &'static str },

    #[error("vendor.base_url '{url}' is not a valid URL")]
    InvalidVendorUrl { url: String },

    #[error("{capability} requires a [storage] section")]
    MissingStorage { capability: &'static str },

    #[error("storage.{field} is required")]
    IncompleteStorage { field: &'static str },

    #[error("server.request_timeout_secs must be positive")]
    InvalidRequestTimeout,

    #[error("[rtmp] must enable push_path, pull_path or both")]
    RtmpWithoutPaths,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_app(config)?;
    validate_server(config)?;
    validate_vendor(config)?;
    validate_storage(config)?;
    validate_rtmp(config)?;
    Ok(())
}

/// Token signing needs both halves of the app credential
fn validate_app(config: &Config) -> Result<(), ValidationError> {
    for (field, value) in [
        ("app_id", &config.app.app_id),
        ("app_certificate", &config.app.app_certificate),
    ] {
        if value.is_empty() {
            return Err(ValidationError::MissingAppCredential { field });
        }
        if !is_app_credential(value) {
            return Err(ValidationError::InvalidAppCredential { field });
        }
    }
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    if config.server.request_timeout_secs == 0 {
        return Err(ValidationError::InvalidRequestTimeout);
    }
    Ok(())
}

fn validate_vendor(config: &Config) -> Result<(), ValidationError> {
    if !config.uses_vendor() {
        return Ok(());
    }

    let vendor = &config.vendor;
    for (field, value) in [
        ("base_url", &vendor.base_url),
        ("customer_id", &vendor.customer_id),
        ("customer_secret", &vendor.customer_secret),
    ] {
        if value.is_empty() {
            return Err(ValidationError::MissingVendorField { field });
        }
    }

    if Url::parse(&vendor.base_url).is_err() {
        return Err(ValidationError::InvalidVendorUrl {
            url: vendor.base_url.clone(),
        });
    }
    Ok(())
}

/// Recording and caption uploads need a complete bucket description
fn validate_storage(config: &Config) -> Result<(), ValidationError> {
    let capability = if config.cloud_recording.is_some() {
        "cloud_recording"
    } else if config.transcription.is_some() {
        "transcription"
    } else {
        return Ok(());
    };

    let storage = config
        .storage
        .as_ref()
        .ok_or(ValidationError::MissingStorage { capability })?;
    check_storage_fields(storage)
}

fn check_storage_fields(storage: &StorageSection) -> Result<(), ValidationError> {
    for (field, value) in [
        ("bucket", &storage.bucket),
        ("access_key", &storage.access_key),
        ("secret_key", &storage.secret_key),
    ] {
        if value.is_empty() {
            return Err(ValidationError::IncompleteStorage { field });
        }
    }
    Ok(())
}

fn validate_rtmp(config: &Config) -> Result<(), ValidationError> {
    if let Some(rtmp) = &config.rtmp {
        if rtmp.push_path.trim_matches('/').is_empty() && rtmp.pull_path.trim_matches('/').is_empty()
        {
            return Err(ValidationError::RtmpWithoutPaths);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::models::*;
    use super::*;

    fn create_test_config() -> Config {
        Config {
            app: AppConfig {
                app_id: "970ca35de60c44645bbae8a215061b33".to_string(),
                app_certificate: "5cfd2fd1755d40ecb72977518be15d3b".to_string(),
            },
            vendor: VendorConfig {
                base_url: "https://api.example.com".to_string(),
                customer_id: "customer".to_string(),
                customer_secret: "secret".to_string(),
            },
            storage: Some(StorageSection {
                vendor: 1,
                region: 0,
                bucket: "recordings".to_string(),
                access_key: "AKIA".to_string(),
                secret_key: "shh".to_string(),
            }),
            cloud_recording: Some(CloudRecordingConfig::default()),
            transcription: Some(TranscriptionConfig::default()),
            rtmp: Some(RtmpConfig::default()),
            ..Config::default()
        }
    }

    #[test]
    fn test_valid_config() {
        let config = create_test_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_token_only_deployment() {
        let config = Config {
            app: create_test_config().app,
            ..Config::default()
        };
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_missing_app_certificate() {
        let mut config = create_test_config();
        config.app.app_certificate.clear();

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::MissingAppCredential {
                field: "app_certificate"
            })
        ));
    }

    #[test]
    fn test_app_id_must_be_hex() {
        let mut config = create_test_config();
        config.app.app_id = "not-a-valid-app-id-not-a-valid-a".to_string();

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::InvalidAppCredential { field: "app_id" })
        ));
    }

    #[test]
    fn test_vendor_credentials_required() {
        let mut config = create_test_config();
        config.vendor.customer_secret.clear();

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::MissingVendorField {
                field: "customer_secret"
            })
        ));
    }

    #[test]
    fn test_vendor_url_must_parse() {
        let mut config = create_test_config();
        config.vendor.base_url = "api.example.com".to_string();

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::InvalidVendorUrl { .. })
        ));
    }

    #[test]
    fn test_recording_requires_storage() {
        let mut config = create_test_config();
        config.storage = None;

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::MissingStorage {
                capability: "cloud_recording"
            })
        ));

        config.cloud_recording = None;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::MissingStorage {
                capability: "transcription"
            })
        ));

        config.transcription = None;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_storage_keys_required() {
        let mut config = create_test_config();
        if let Some(storage) = config.storage.as_mut() {
            storage.secret_key.clear();
        }

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::IncompleteStorage {
                field: "secret_key"
            })
        ));
    }

    #[test]
    fn test_zero_request_timeout() {
        let mut config = create_test_config();
        config.server.request_timeout_secs = 0;

        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidRequestTimeout)
        ));
    }

    #[test]
    fn test_rtmp_needs_one_path() {
        let mut config = create_test_config();
        config.rtmp = Some(RtmpConfig {
            push_path: String::new(),
            pull_path: "/".to_string(),
        });

        assert!(matches!(
            validate(&config),
            Err(ValidationError::RtmpWithoutPaths)
        ));

        config.rtmp = Some(RtmpConfig {
            push_path: String::new(),
            ..RtmpConfig::default()
        });
        assert!(validate(&config).is_ok());
    }
}
