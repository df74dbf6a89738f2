//! ElevenLabs `stream-input` WebSocket client.

use std::time::Duration;

use futures_util::SinkExt;
use serde::{Deserialize, Serialize};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info};
use url::Url;

use crate::error::{TtsError, TtsResult};
use crate::frame::OutboundFrame;
use crate::stream::{audio_chunks, AudioStream};

const XI_API_KEY_HEADER: &str = "xi-api-key";

/// Voice parameters sent with the initialization frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub speed: f64,
    pub stability: f64,
    pub similarity_boost: f64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            speed: 1.0,
            stability: 0.5,
            similarity_boost: 0.5,
        }
    }
}

/// Configuration for the ElevenLabs client.
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    /// API key; connections are refused while unset
    pub api_key: Option<String>,
    /// WebSocket base URL (no trailing slash)
    pub base_url: String,
    pub voice_id: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
    /// Handshake timeout
    pub connect_timeout: Duration,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "wss://api.elevenlabs.io/v1".to_string(),
            voice_id: "qWdiyiWdNPlPyVCOLW0h".to_string(),
            model_id: "eleven_monolingual_v1".to_string(),
            voice_settings: VoiceSettings::default(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ElevenLabsConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("ELEVENLABS_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            base_url: std::env::var("ELEVENLABS_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            voice_id: std::env::var("ELEVENLABS_VOICE_ID").unwrap_or(defaults.voice_id),
            model_id: std::env::var("ELEVENLABS_MODEL_ID").unwrap_or(defaults.model_id),
            voice_settings: defaults.voice_settings,
            connect_timeout: std::env::var("ELEVENLABS_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
        }
    }

    /// Streaming endpoint for the configured voice.
    pub fn stream_url(&self) -> TtsResult<Url> {
        let raw = format!(
            "{}/text-to-speech/{}/stream-input",
            self.base_url, self.voice_id
        );
        let url = Url::parse(&raw).map_err(|e| TtsError::InvalidEndpoint(format!("{}: {}", raw, e)))?;
        match url.scheme() {
            "ws" | "wss" => Ok(url),
            other => Err(TtsError::InvalidEndpoint(format!(
                "unsupported scheme '{}' in {}",
                other, raw
            ))),
        }
    }
}

/// Client for streamed speech synthesis. One WebSocket per call.
pub struct ElevenLabsClient {
    api_key: String,
    config: ElevenLabsConfig,
}

impl ElevenLabsClient {
    /// Create a new client. Fails with [`TtsError::MissingApiKey`] when no key is configured.
    pub fn new(config: ElevenLabsConfig) -> TtsResult<Self> {
        let api_key = config.api_key.clone().ok_or(TtsError::MissingApiKey)?;
        config.stream_url()?;
        Ok(Self { api_key, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> TtsResult<Self> {
        Self::new(ElevenLabsConfig::from_env())
    }

    pub fn voice_id(&self) -> &str {
        &self.config.voice_id
    }

    /// Connect, submit `text` for narration and return the decoded audio stream.
    ///
    /// Errors here mean no audio can be produced. Errors yielded by the
    /// returned stream happen after the provider accepted the input.
    pub async fn stream_speech(&self, text: &str) -> TtsResult<AudioStream> {
        let url = self.config.stream_url()?;

        let mut request = url.as_str().into_client_request()?;
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| TtsError::InvalidEndpoint("API key is not a valid header value".into()))?;
        request.headers_mut().insert(XI_API_KEY_HEADER, key);

        debug!(voice_id = %self.config.voice_id, "Connecting to {}", url);

        let timeout_secs = self.config.connect_timeout.as_secs();
        let (mut socket, response) = tokio::time::timeout(self.config.connect_timeout, connect_async(request))
            .await
            .map_err(|_| TtsError::Timeout(timeout_secs))??;

        debug!(status = %response.status(), "WebSocket handshake complete");

        let frames = [
            OutboundFrame::initialize(
                self.config.voice_settings,
                &self.config.model_id,
                &self.api_key,
            ),
            OutboundFrame::text(text),
            OutboundFrame::end_of_input(),
        ];
        for frame in &frames {
            let payload = serde_json::to_string(frame)?;
            socket.send(Message::Text(payload)).await?;
        }

        info!(
            voice_id = %self.config.voice_id,
            model_id = %self.config.model_id,
            chars = text.len(),
            "Speech synthesis started"
        );

        Ok(Box::pin(audio_chunks(socket)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_url() {
        let config = ElevenLabsConfig::default();
        assert_eq!(
            config.stream_url().unwrap().as_str(),
            "wss://api.elevenlabs.io/v1/text-to-speech/qWdiyiWdNPlPyVCOLW0h/stream-input"
        );
    }

    #[test]
    fn test_stream_url_rejects_http() {
        let config = ElevenLabsConfig {
            base_url: "https://api.elevenlabs.io/v1".to_string(),
            ..ElevenLabsConfig::default()
        };
        assert!(matches!(config.stream_url(), Err(TtsError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_new_requires_api_key() {
        assert!(matches!(
            ElevenLabsClient::new(ElevenLabsConfig::default()),
            Err(TtsError::MissingApiKey)
        ));

        let client = ElevenLabsClient::new(ElevenLabsConfig {
            api_key: Some("xi-test".to_string()),
            ..ElevenLabsConfig::default()
        })
        .unwrap();
        assert_eq!(client.voice_id(), "qWdiyiWdNPlPyVCOLW0h");
    }
}
