//! Access token issuance for RTC, RTM and chat.

mod access_token;

use bon::Builder;
use serde::Deserialize;
use thiserror::Error;

use access_token::{AccessToken, Service};
pub(crate) use access_token::is_app_credential;
#[cfg(test)]
pub(crate) use access_token::tests::{APP_CERTIFICATE, APP_ID};

pub const DEFAULT_EXPIRE_SECONDS: u32 = 3600;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid: missing channel name")]
    MissingChannel,

    #[error("invalid: missing user ID or account")]
    MissingUid,

    #[error("app id and app certificate must be 32 hexadecimal characters")]
    InvalidAppCredentials,

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, TokenError::MissingChannel | TokenError::MissingUid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Rtc,
    Rtm,
    Chat,
}

#[derive(Debug, Clone, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub token_type: TokenKind,
    #[serde(default)]
    #[builder(into)]
    pub channel: Option<String>,
    /// `publisher` grants publish privileges; anything else joins as subscriber.
    #[serde(default)]
    #[builder(into)]
    pub role: Option<String>,
    #[serde(default)]
    #[builder(into)]
    pub uid: Option<String>,
    #[serde(default, rename = "expire")]
    pub expire_seconds: Option<u32>,
}

impl TokenRequest {
    pub fn is_publisher(&self) -> bool {
        self.role.as_deref() == Some("publisher")
    }

    fn expire(&self) -> u32 {
        self.expire_seconds
            .filter(|seconds| *seconds > 0)
            .unwrap_or(DEFAULT_EXPIRE_SECONDS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcRole {
    Publisher,
    Subscriber,
}

impl RtcRole {
    pub fn as_str(self) -> &'static str {
        match self {
            RtcRole::Publisher => "publisher",
            RtcRole::Subscriber => "subscriber",
        }
    }
}

/// Signs tokens; shared by every facade and safe to call concurrently.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, request: &TokenRequest) -> Result<String, TokenError>;

    /// Token for a bot joining `channel` as `uid`, valid for the default hour.
    fn rtc_token(&self, channel: &str, uid: &str, role: RtcRole) -> Result<String, TokenError> {
        let request = TokenRequest::builder()
            .token_type(TokenKind::Rtc)
            .channel(channel)
            .uid(uid)
            .role(role.as_str())
            .build();
        self.issue(&request)
    }
}

/// Issues version 007 access tokens from the app id and certificate.
pub struct AccessTokenIssuer {
    app_id: String,
    app_certificate: String,
}

impl AccessTokenIssuer {
    pub fn new(
        app_id: impl Into<String>,
        app_certificate: impl Into<String>,
    ) -> Result<Self, TokenError> {
        let app_id = app_id.into();
        let app_certificate = app_certificate.into();
        if !is_app_credential(&app_id) || !is_app_credential(&app_certificate) {
            return Err(TokenError::InvalidAppCredentials);
        }
        Ok(Self {
            app_id,
            app_certificate,
        })
    }
}

impl std::fmt::Debug for AccessTokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenIssuer")
            .field("app_id", &self.app_id)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer for AccessTokenIssuer {
    fn issue(&self, request: &TokenRequest) -> Result<String, TokenError> {
        let expire = request.expire();
        let channel = request.channel.as_deref().unwrap_or_default();
        let uid = request.uid.as_deref().unwrap_or_default();

        let mut token = AccessToken::new(&self.app_id, &self.app_certificate, expire);
        match request.token_type {
            TokenKind::Rtc => {
                if channel.is_empty() {
                    return Err(TokenError::MissingChannel);
                }
                if uid.is_empty() {
                    return Err(TokenError::MissingUid);
                }
                token.add_service(Service::rtc(
                    channel,
                    &rtc_account(uid),
                    request.is_publisher(),
                    expire,
                ));
            }
            TokenKind::Rtm => {
                if uid.is_empty() {
                    return Err(TokenError::MissingUid);
                }
                token.add_service(Service::rtm(uid, expire));
                if !channel.is_empty() {
                    token.add_service(Service::rtc(channel, uid, true, expire));
                }
            }
            TokenKind::Chat => {
                if uid.is_empty() {
                    token.add_service(Service::chat_app(expire));
                } else {
                    token.add_service(Service::chat_user(uid, expire));
                }
            }
        }

        tracing::debug!(kind = ?request.token_type, channel, "Issued access token");
        token.build()
    }
}

/// Uid 0 packs as an empty account. Values outside the 32-bit uid range are
/// kept verbatim as user accounts rather than wrapped.
fn rtc_account(uid: &str) -> String {
    match uid.parse::<u32>() {
        Ok(0) => String::new(),
        Ok(numeric) => numeric.to_string(),
        Err(_) => uid.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::access_token::tests::{APP_CERTIFICATE, APP_ID, Unpacker, inflate};
    use super::access_token::{
        PRIVILEGE_CHAT_APP, PRIVILEGE_CHAT_USER, PRIVILEGE_JOIN_CHANNEL, SERVICE_CHAT,
        SERVICE_RTC, SERVICE_RTM,
    };
    use super::*;

    struct DecodedService {
        kind: u16,
        privileges: Vec<(u16, u32)>,
    }

    fn issuer() -> AccessTokenIssuer {
        AccessTokenIssuer::new(APP_ID, APP_CERTIFICATE).unwrap()
    }

    /// Returns expire plus the first service with its privileges and trailing strings.
    fn decode_first_service(token: &str, string_fields: usize) -> (u32, DecodedService, Vec<String>) {
        let raw = inflate(token);
        let mut reader = Unpacker::new(&raw);
        reader.bytes();
        assert_eq!(reader.string(), APP_ID);
        reader.u32();
        let expire = reader.u32();
        reader.u32();
        assert!(reader.u16() >= 1);
        let kind = reader.u16();
        let count = reader.u16();
        let privileges = (0..count).map(|_| (reader.u16(), reader.u32())).collect();
        let fields = (0..string_fields).map(|_| reader.string()).collect();
        (expire, DecodedService { kind, privileges }, fields)
    }

    #[test]
    fn test_rtc_subscriber_token() {
        let request: TokenRequest = serde_json::from_str(
            r#"{"tokenType":"rtc","channel":"lobby","role":"subscriber","uid":"42"}"#,
        )
        .unwrap();
        let token = issuer().issue(&request).unwrap();

        let (expire, service, fields) = decode_first_service(&token, 2);
        assert_eq!(expire, DEFAULT_EXPIRE_SECONDS);
        assert_eq!(service.kind, SERVICE_RTC);
        assert_eq!(service.privileges, vec![(PRIVILEGE_JOIN_CHANNEL, 3600)]);
        assert_eq!(fields, vec!["lobby".to_string(), "42".to_string()]);
    }

    #[test]
    fn test_rtc_role_controls_privileges() {
        let token = issuer().rtc_token("lobby", "7", RtcRole::Publisher).unwrap();
        let (_, service, _) = decode_first_service(&token, 2);
        assert_eq!(service.privileges.len(), 4);

        let token = issuer().rtc_token("lobby", "7", RtcRole::Subscriber).unwrap();
        let (_, service, _) = decode_first_service(&token, 2);
        assert_eq!(service.privileges.len(), 1);
    }

    #[test]
    fn test_rtc_account_forms() {
        assert_eq!(rtc_account("0"), "");
        assert_eq!(rtc_account("12345"), "12345");
        assert_eq!(rtc_account("4294967295"), "4294967295");
        assert_eq!(rtc_account("4294967296"), "4294967296");
        assert_eq!(rtc_account("4294967297"), "4294967297");
        assert_eq!(rtc_account("alice"), "alice");
    }

    #[test]
    fn test_rtc_requires_channel_and_uid() {
        let missing_channel = TokenRequest::builder()
            .token_type(TokenKind::Rtc)
            .uid("1")
            .build();
        assert!(matches!(
            issuer().issue(&missing_channel),
            Err(TokenError::MissingChannel)
        ));

        let missing_uid = TokenRequest::builder()
            .token_type(TokenKind::Rtc)
            .channel("lobby")
            .build();
        let err = issuer().issue(&missing_uid).unwrap_err();
        assert_eq!(err.to_string(), "invalid: missing user ID or account");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_rtm_token_honours_expire() {
        let request = TokenRequest::builder()
            .token_type(TokenKind::Rtm)
            .uid("alice")
            .expire_seconds(120)
            .build();
        let token = issuer().issue(&request).unwrap();
        let (expire, service, fields) = decode_first_service(&token, 1);
        assert_eq!(expire, 120);
        assert_eq!(service.kind, SERVICE_RTM);
        assert_eq!(fields, vec!["alice".to_string()]);
    }

    #[test]
    fn test_chat_app_and_user_tokens() {
        let app = TokenRequest::builder().token_type(TokenKind::Chat).build();
        let (_, service, fields) = decode_first_service(&issuer().issue(&app).unwrap(), 1);
        assert_eq!(service.kind, SERVICE_CHAT);
        assert_eq!(service.privileges, vec![(PRIVILEGE_CHAT_APP, 3600)]);
        assert_eq!(fields, vec![String::new()]);

        let user = TokenRequest::builder()
            .token_type(TokenKind::Chat)
            .uid("bob")
            .build();
        let (_, service, _) = decode_first_service(&issuer().issue(&user).unwrap(), 1);
        assert_eq!(service.privileges, vec![(PRIVILEGE_CHAT_USER, 3600)]);
    }

    #[test]
    fn test_unknown_token_type_is_rejected_by_serde() {
        let parsed = serde_json::from_str::<TokenRequest>(r#"{"tokenType":"voice"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_issuer_validates_credentials() {
        assert!(matches!(
            AccessTokenIssuer::new("app", APP_CERTIFICATE),
            Err(TokenError::InvalidAppCredentials)
        ));
    }
}
