//! Media push (RTMP converters) and media pull (cloud player) facade.
//!
//! Both halves are optional; a disabled half answers with an invalid
//! configuration error instead of calling the vendor.

pub mod models;
mod pull;
mod push;

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{Result, ServiceError};
use crate::ids::UidGenerator;
use crate::token::TokenIssuer;
use crate::vendor::{Dispatch, path_segment};

pub const REGIONS: [&str; 4] = ["na", "eu", "ap", "cn"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    NorthAmerica,
    Europe,
    AsiaPacific,
    China,
}

impl Region {
    pub fn as_str(self) -> &'static str {
        match self {
            Region::NorthAmerica => "na",
            Region::Europe => "eu",
            Region::AsiaPacific => "ap",
            Region::China => "cn",
        }
    }
}

impl FromStr for Region {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "na" => Ok(Region::NorthAmerica),
            "eu" => Ok(Region::Europe),
            "ap" => Ok(Region::AsiaPacific),
            "cn" => Ok(Region::China),
            _ => Err(ServiceError::InvalidConfiguration(
                "Invalid region specified.".to_string(),
            )),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct RtmpService {
    base_url: String,
    push_path: Option<String>,
    pull_path: Option<String>,
    dispatcher: Arc<dyn Dispatch>,
    tokens: Arc<dyn TokenIssuer>,
    uids: UidGenerator,
}

impl RtmpService {
    /// Paths are relative to `{base_url}/{region}/` with the app id already filled in.
    pub fn new(
        base_url: &str,
        push_path: Option<String>,
        pull_path: Option<String>,
        dispatcher: Arc<dyn Dispatch>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        let trim = |path: String| path.trim_matches('/').to_string();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            push_path: push_path.map(trim).filter(|path| !path.is_empty()),
            pull_path: pull_path.map(trim).filter(|path| !path.is_empty()),
            dispatcher,
            tokens,
            uids: UidGenerator::new(),
        }
    }

    pub fn with_uid_generator(mut self, uids: UidGenerator) -> Self {
        self.uids = uids;
        self
    }

    pub fn push_enabled(&self) -> bool {
        self.push_path.is_some()
    }

    pub fn pull_enabled(&self) -> bool {
        self.pull_path.is_some()
    }

    /// `{base}/{region}/{push_path}/rtmp-converters[/{id}]`
    fn converters_url(&self, region: Region, converter_id: Option<&str>) -> Result<String> {
        let path = self.push_path.as_deref().ok_or_else(|| {
            ServiceError::InvalidConfiguration("media push is not configured".to_string())
        })?;
        resource_url(
            &self.base_url,
            region,
            path,
            "rtmp-converters",
            converter_id.map(|id| ("converterId", id)),
        )
    }

    /// `{base}/{region}/{pull_path}/players[/{id}]`
    fn players_url(&self, region: Region, player_id: Option<&str>) -> Result<String> {
        let path = self.pull_path.as_deref().ok_or_else(|| {
            ServiceError::InvalidConfiguration("media pull is not configured".to_string())
        })?;
        resource_url(
            &self.base_url,
            region,
            path,
            "players",
            player_id.map(|id| ("playerId", id)),
        )
    }
}

fn resource_url(
    base: &str,
    region: Region,
    path: &str,
    collection: &str,
    id: Option<(&str, &str)>,
) -> Result<String> {
    match id {
        Some((field, id)) => {
            let id = path_segment(id, field)?;
            Ok(format!("{base}/{region}/{path}/{collection}/{id}"))
        }
        None => Ok(format!("{base}/{region}/{path}/{collection}")),
    }
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::MalformedRequest(format!("{field} is required")));
    }
    Ok(())
}

/// Only dotted IPv4 hints are forwarded; anything else is dropped.
fn ipv4_hint(candidate: Option<&str>) -> Option<&str> {
    candidate.filter(|ip| ip.parse::<Ipv4Addr>().is_ok())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::token::{APP_CERTIFICATE, APP_ID, AccessTokenIssuer};
    use crate::vendor::testing::ScriptedVendor;

    pub(crate) const BASE: &str = "https://api.example.com";
    pub(crate) const PUSH_PATH: &str = "v1/projects/app";
    pub(crate) const PULL_PATH: &str = "v1/projects/app/cloud-player";

    pub(crate) fn service(vendor: Arc<ScriptedVendor>) -> RtmpService {
        let tokens = Arc::new(AccessTokenIssuer::new(APP_ID, APP_CERTIFICATE).unwrap());
        RtmpService::new(
            BASE,
            Some(format!("/{PUSH_PATH}/")),
            Some(PULL_PATH.to_string()),
            vendor,
            tokens,
        )
        .with_uid_generator(UidGenerator::with_seed(3))
    }

    #[test]
    fn test_region_closed_set() {
        for region in REGIONS {
            assert_eq!(region.parse::<Region>().unwrap().as_str(), region);
        }
        let err = "us".parse::<Region>().unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(
            err.to_string(),
            "invalid configuration: Invalid region specified."
        );
    }

    #[test]
    fn test_urls_trim_configured_slashes() {
        let svc = service(Arc::new(ScriptedVendor::new()));
        assert_eq!(
            svc.converters_url(Region::Europe, None).unwrap(),
            "https://api.example.com/eu/v1/projects/app/rtmp-converters"
        );
        assert_eq!(
            svc.players_url(Region::China, Some("p-1")).unwrap(),
            "https://api.example.com/cn/v1/projects/app/cloud-player/players/p-1"
        );
    }

    #[test]
    fn test_resource_ids_stay_in_their_segment() {
        let svc = service(Arc::new(ScriptedVendor::new()));
        assert_eq!(
            svc.converters_url(Region::NorthAmerica, Some("../../../v1/apps/other"))
                .unwrap(),
            "https://api.example.com/na/v1/projects/app/rtmp-converters/..%2F..%2F..%2Fv1%2Fapps%2Fother"
        );
        assert_eq!(
            svc.players_url(Region::China, Some("p?x=1#")).unwrap(),
            "https://api.example.com/cn/v1/projects/app/cloud-player/players/p%3Fx=1%23"
        );
        assert!(matches!(
            svc.players_url(Region::China, Some("..")),
            Err(ServiceError::MalformedRequest(_))
        ));
    }

    #[test]
    fn test_disabled_half_is_rejected() {
        let tokens = Arc::new(AccessTokenIssuer::new(APP_ID, APP_CERTIFICATE).unwrap());
        let svc = RtmpService::new(
            BASE,
            Some(PUSH_PATH.to_string()),
            Some(String::new()),
            Arc::new(ScriptedVendor::new()),
            tokens,
        );
        assert!(svc.push_enabled());
        assert!(!svc.pull_enabled());
        assert!(matches!(
            svc.players_url(Region::Europe, None),
            Err(ServiceError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_ipv4_hint_filter() {
        assert_eq!(ipv4_hint(Some("203.0.113.7")), Some("203.0.113.7"));
        assert_eq!(ipv4_hint(Some("2001:db8::1")), None);
        assert_eq!(ipv4_hint(Some("not-an-ip")), None);
        assert_eq!(ipv4_hint(None), None);
    }
}
