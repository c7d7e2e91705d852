mod error;
mod middleware;
pub mod models;
mod recording;
mod rtmp;
mod server;
pub mod services;
pub mod state;
mod transcription;
pub(crate) mod utils;

pub use error::ApiError;
pub use middleware::CorsPolicy;
pub use server::{TIMESTAMP_HEADER, router, run};
pub use state::AppState;
