//! Version 007 access tokens.
//!
//! Layout before compression, all integers little-endian and strings
//! prefixed with a `u16` length:
//!
//! ```text
//! signature: string
//! app_id: string | issue_ts: u32 | expire: u32 | salt: u32
//! service_count: u16 | services...
//! ```
//!
//! Each service packs its type, a `u16`-counted map of `(u16 privilege, u32
//! expire)` pairs, then its own string fields. The whole buffer is zlib
//! compressed, base64 encoded and prefixed with the version.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use std::collections::BTreeMap;
use std::io::Write;

use super::TokenError;

pub(crate) const VERSION: &str = "007";

pub(crate) const SERVICE_RTC: u16 = 1;
pub(crate) const SERVICE_RTM: u16 = 2;
pub(crate) const SERVICE_CHAT: u16 = 5;

pub(crate) const PRIVILEGE_JOIN_CHANNEL: u16 = 1;
pub(crate) const PRIVILEGE_PUBLISH_AUDIO: u16 = 2;
pub(crate) const PRIVILEGE_PUBLISH_VIDEO: u16 = 3;
pub(crate) const PRIVILEGE_PUBLISH_DATA: u16 = 4;
pub(crate) const PRIVILEGE_RTM_LOGIN: u16 = 1;
pub(crate) const PRIVILEGE_CHAT_USER: u16 = 1;
pub(crate) const PRIVILEGE_CHAT_APP: u16 = 2;

const MAX_SALT: u32 = 99_999_999;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Service {
    kind: u16,
    privileges: BTreeMap<u16, u32>,
    fields: Vec<String>,
}

impl Service {
    pub(crate) fn rtc(channel: &str, account: &str, publisher: bool, expire: u32) -> Self {
        let mut privileges = BTreeMap::from([(PRIVILEGE_JOIN_CHANNEL, expire)]);
        if publisher {
            privileges.insert(PRIVILEGE_PUBLISH_AUDIO, expire);
            privileges.insert(PRIVILEGE_PUBLISH_VIDEO, expire);
            privileges.insert(PRIVILEGE_PUBLISH_DATA, expire);
        }
        Self {
            kind: SERVICE_RTC,
            privileges,
            fields: vec![channel.to_string(), account.to_string()],
        }
    }

    pub(crate) fn rtm(user_id: &str, expire: u32) -> Self {
        Self {
            kind: SERVICE_RTM,
            privileges: BTreeMap::from([(PRIVILEGE_RTM_LOGIN, expire)]),
            fields: vec![user_id.to_string()],
        }
    }

    pub(crate) fn chat_user(user_id: &str, expire: u32) -> Self {
        Self {
            kind: SERVICE_CHAT,
            privileges: BTreeMap::from([(PRIVILEGE_CHAT_USER, expire)]),
            fields: vec![user_id.to_string()],
        }
    }

    pub(crate) fn chat_app(expire: u32) -> Self {
        Self {
            kind: SERVICE_CHAT,
            privileges: BTreeMap::from([(PRIVILEGE_CHAT_APP, expire)]),
            fields: vec![String::new()],
        }
    }

    fn pack(&self, buf: &mut Vec<u8>) -> Result<(), TokenError> {
        pack_u16(buf, self.kind);
        pack_u16(buf, len_u16(self.privileges.len())?);
        for (privilege, expire) in &self.privileges {
            pack_u16(buf, *privilege);
            pack_u32(buf, *expire);
        }
        for field in &self.fields {
            pack_bytes(buf, field.as_bytes())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct AccessToken<'a> {
    app_id: &'a str,
    app_certificate: &'a str,
    issue_ts: u32,
    expire: u32,
    salt: u32,
    services: BTreeMap<u16, Service>,
}

impl<'a> AccessToken<'a> {
    pub(crate) fn new(app_id: &'a str, app_certificate: &'a str, expire: u32) -> Self {
        let issue_ts = u32::try_from(chrono::Utc::now().timestamp()).unwrap_or(u32::MAX);
        let salt = rand::thread_rng().gen_range(1..=MAX_SALT);
        Self::with_clock(app_id, app_certificate, expire, issue_ts, salt)
    }

    pub(crate) fn with_clock(
        app_id: &'a str,
        app_certificate: &'a str,
        expire: u32,
        issue_ts: u32,
        salt: u32,
    ) -> Self {
        Self {
            app_id,
            app_certificate,
            issue_ts,
            expire,
            salt,
            services: BTreeMap::new(),
        }
    }

    /// Services are packed in ascending type order; adding a type twice replaces it.
    pub(crate) fn add_service(&mut self, service: Service) {
        self.services.insert(service.kind, service);
    }

    pub(crate) fn build(&self) -> Result<String, TokenError> {
        if !is_app_credential(self.app_id) || !is_app_credential(self.app_certificate) {
            return Err(TokenError::InvalidAppCredentials);
        }

        let mut content = Vec::new();
        pack_bytes(&mut content, self.app_id.as_bytes())?;
        pack_u32(&mut content, self.issue_ts);
        pack_u32(&mut content, self.expire);
        pack_u32(&mut content, self.salt);
        pack_u16(&mut content, len_u16(self.services.len())?);
        for service in self.services.values() {
            service.pack(&mut content)?;
        }

        let signing_key = signing_key(self.app_certificate, self.issue_ts, self.salt)?;
        let signature = hmac_sha256(&signing_key, &content)?;

        let mut raw = Vec::with_capacity(content.len() + signature.len() + 2);
        pack_bytes(&mut raw, &signature)?;
        raw.extend_from_slice(&content);

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&raw)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(format!("{}{}", VERSION, STANDARD.encode(compressed)))
    }
}

/// HMAC(key = salt, HMAC(key = issue_ts, certificate))
pub(crate) fn signing_key(
    app_certificate: &str,
    issue_ts: u32,
    salt: u32,
) -> Result<Vec<u8>, TokenError> {
    let by_issue_ts = hmac_sha256(&issue_ts.to_le_bytes(), app_certificate.as_bytes())?;
    hmac_sha256(&salt.to_le_bytes(), &by_issue_ts)
}

pub(crate) fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<Vec<u8>, TokenError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| TokenError::Signing(e.to_string()))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

pub(crate) fn is_app_credential(value: &str) -> bool {
    value.len() == 32 && value.chars().all(|c| c.is_ascii_hexdigit())
}

fn len_u16(len: usize) -> Result<u16, TokenError> {
    u16::try_from(len).map_err(|_| TokenError::Signing(format!("field too long: {} bytes", len)))
}

fn pack_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn pack_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn pack_bytes(buf: &mut Vec<u8>, value: &[u8]) -> Result<(), TokenError> {
    pack_u16(buf, len_u16(value.len())?);
    buf.extend_from_slice(value);
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    pub(crate) const APP_ID: &str = "970ca35de60c44645bbae8a215061b33";
    pub(crate) const APP_CERTIFICATE: &str = "5cfd2fd1755d40ecb72977518be15d3b";

    /// Minimal reader for the packed layout.
    pub(crate) struct Unpacker<'b> {
        buf: &'b [u8],
    }

    impl<'b> Unpacker<'b> {
        pub(crate) fn new(buf: &'b [u8]) -> Self {
            Self { buf }
        }

        pub(crate) fn u16(&mut self) -> u16 {
            let (head, rest) = self.buf.split_at(2);
            self.buf = rest;
            u16::from_le_bytes([head[0], head[1]])
        }

        pub(crate) fn u32(&mut self) -> u32 {
            let (head, rest) = self.buf.split_at(4);
            self.buf = rest;
            u32::from_le_bytes([head[0], head[1], head[2], head[3]])
        }

        pub(crate) fn bytes(&mut self) -> Vec<u8> {
            let len = self.u16() as usize;
            let (head, rest) = self.buf.split_at(len);
            self.buf = rest;
            head.to_vec()
        }

        pub(crate) fn string(&mut self) -> String {
            String::from_utf8(self.bytes()).unwrap()
        }

        pub(crate) fn is_empty(&self) -> bool {
            self.buf.is_empty()
        }
    }

    pub(crate) fn inflate(token: &str) -> Vec<u8> {
        assert!(token.starts_with(VERSION));
        let compressed = STANDARD.decode(&token[VERSION.len()..]).unwrap();
        let mut raw = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut raw)
            .unwrap();
        raw
    }

    #[test]
    fn test_rtc_publisher_layout() {
        let mut token = AccessToken::with_clock(APP_ID, APP_CERTIFICATE, 600, 1_700_000_000, 42);
        token.add_service(Service::rtc("demo", "1234", true, 600));
        let raw = inflate(&token.build().unwrap());

        let mut reader = Unpacker::new(&raw);
        let signature = reader.bytes();
        let content = reader.buf.to_vec();

        assert_eq!(reader.string(), APP_ID);
        assert_eq!(reader.u32(), 1_700_000_000);
        assert_eq!(reader.u32(), 600);
        assert_eq!(reader.u32(), 42);
        assert_eq!(reader.u16(), 1);
        assert_eq!(reader.u16(), SERVICE_RTC);
        assert_eq!(reader.u16(), 4);
        for expected in [
            PRIVILEGE_JOIN_CHANNEL,
            PRIVILEGE_PUBLISH_AUDIO,
            PRIVILEGE_PUBLISH_VIDEO,
            PRIVILEGE_PUBLISH_DATA,
        ] {
            assert_eq!(reader.u16(), expected);
            assert_eq!(reader.u32(), 600);
        }
        assert_eq!(reader.string(), "demo");
        assert_eq!(reader.string(), "1234");
        assert!(reader.is_empty());

        let key = signing_key(APP_CERTIFICATE, 1_700_000_000, 42).unwrap();
        assert_eq!(signature, hmac_sha256(&key, &content).unwrap());
    }

    #[test]
    fn test_same_clock_same_token() {
        let build = || {
            let mut token = AccessToken::with_clock(APP_ID, APP_CERTIFICATE, 60, 1_000, 7);
            token.add_service(Service::rtm("alice", 60));
            token.build().unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_services_packed_in_type_order() {
        let mut token = AccessToken::with_clock(APP_ID, APP_CERTIFICATE, 60, 1_000, 7);
        token.add_service(Service::rtm("alice", 60));
        token.add_service(Service::rtc("room", "alice", false, 60));
        let raw = inflate(&token.build().unwrap());

        let mut reader = Unpacker::new(&raw);
        reader.bytes();
        reader.string();
        reader.u32();
        reader.u32();
        reader.u32();
        assert_eq!(reader.u16(), 2);
        assert_eq!(reader.u16(), SERVICE_RTC);
        assert_eq!(reader.u16(), 1);
        reader.u16();
        reader.u32();
        assert_eq!(reader.string(), "room");
        assert_eq!(reader.string(), "alice");
        assert_eq!(reader.u16(), SERVICE_RTM);
    }

    #[test]
    fn test_rejects_non_hex_credentials() {
        let token = AccessToken::with_clock("short", APP_CERTIFICATE, 60, 1, 1);
        assert!(matches!(token.build(), Err(TokenError::InvalidAppCredentials)));

        let token = AccessToken::with_clock(APP_ID, "zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz", 60, 1, 1);
        assert!(matches!(token.build(), Err(TokenError::InvalidAppCredentials)));
    }

    #[test]
    fn test_fresh_tokens_use_salt_in_range() {
        for _ in 0..100 {
            let token = AccessToken::new(APP_ID, APP_CERTIFICATE, 60);
            assert!((1..=MAX_SALT).contains(&token.salt));
        }
    }
}
