//! Error taxonomy shared by the dispatcher, the normalizers and the facades.

use thiserror::Error;

use crate::token::TokenError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The outbound request cannot be sent as built (missing body, missing field).
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Client input violates a closed set or an exclusivity rule.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("API request failed with status {status}: {body}")]
    VendorRejected { status: u16, body: String },

    #[error("failed to parse response into {target}: {source}")]
    ResponseParse {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("incomplete server response: fileListMode or fileList missing")]
    IncompleteServerResponse,

    #[error("unknown file list mode: {0}")]
    UnknownFileListMode(String),

    #[error("failed to encode response: {0}")]
    Encode(String),

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    /// True when the caller supplied something we refuse to forward.
    pub fn is_client_error(&self) -> bool {
        match self {
            ServiceError::MalformedRequest(_) | ServiceError::InvalidConfiguration(_) => true,
            ServiceError::Token(err) => err.is_client_error(),
            _ => false,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::MalformedRequest(_) => "MALFORMED_REQUEST",
            ServiceError::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
            ServiceError::Transport(_) => "TRANSPORT_ERROR",
            ServiceError::VendorRejected { .. } => "VENDOR_REJECTED",
            ServiceError::ResponseParse { .. } => "RESPONSE_PARSE_ERROR",
            ServiceError::IncompleteServerResponse => "INCOMPLETE_SERVER_RESPONSE",
            ServiceError::UnknownFileListMode(_) => "UNKNOWN_FILE_LIST_MODE",
            ServiceError::Encode(_) => "ENCODE_ERROR",
            ServiceError::Token(_) => "TOKEN_ERROR",
        }
    }
}
