//! Axum HTTP server for the Storytime relay.
//!
//! This crate provides:
//! - `POST /story`: prompt to children's story via OpenAI
//! - `POST /audio`: story to streamed MP3 narration via ElevenLabs
//! - Static file serving, health probes and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
