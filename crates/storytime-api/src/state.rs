//! Application state.

use std::sync::Arc;

use storytime_llm::{LlmError, OpenAiClient};
use storytime_tts::{ElevenLabsClient, TtsError};
use tracing::warn;

use crate::config::ApiConfig;

/// Shared application state.
///
/// A provider client is `None` when its API key is not configured; the
/// matching endpoint then answers 500.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub openai: Option<Arc<OpenAiClient>>,
    pub elevenlabs: Option<Arc<ElevenLabsClient>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let openai = match OpenAiClient::new(config.openai.clone()) {
            Ok(client) => Some(Arc::new(client)),
            Err(LlmError::MissingApiKey) => {
                warn!("OPENAI_API_KEY not set; /story will fail");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let elevenlabs = match ElevenLabsClient::new(config.elevenlabs.clone()) {
            Ok(client) => Some(Arc::new(client)),
            Err(TtsError::MissingApiKey) => {
                warn!("ELEVENLABS_API_KEY not set; /audio will fail");
                None
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            config,
            openai,
            elevenlabs,
        })
    }
}
