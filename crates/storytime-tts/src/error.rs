//! TTS client error types.

use thiserror::Error;

pub type TtsResult<T> = Result<T, TtsError>;

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("ELEVENLABS_API_KEY not configured")]
    MissingApiKey,

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Connection timed out after {0} seconds")]
    Timeout(u64),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TtsError {
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}
