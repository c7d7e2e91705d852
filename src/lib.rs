//! mediagate: HTTP middleware in front of a real-time communication vendor's
//! REST APIs (cloud recording, real-time transcription, media push and pull)
//! plus access token issuance.

pub mod api;
pub mod config;
pub mod error;
pub mod ids;
pub mod observability;
pub mod recording;
pub mod rtmp;
pub mod storage;
pub mod token;
pub mod transcription;
pub mod vendor;
