//! OpenAI HTTP client.

use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, info};

use crate::error::{LlmError, LlmResult};
use crate::prompt::build_story_messages;
use crate::types::{ChatRequest, ChatResponse};

/// Configuration for the OpenAI client.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key; requests are refused while unset
    pub api_key: Option<String>,
    /// Base URL of the API (no trailing slash)
    pub base_url: String,
    /// Chat model
    pub model: String,
    /// Completion token cap
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 1000,
            temperature: 0.8,
            timeout: Duration::from_secs(60),
        }
    }
}

impl OpenAiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.model),
            max_tokens: std::env::var("OPENAI_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_tokens),
            temperature: std::env::var("OPENAI_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.temperature),
            timeout: std::env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

/// Client for story generation via chat completions.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a new client. Fails with [`LlmError::MissingApiKey`] when no key is configured.
    pub fn new(config: OpenAiConfig) -> LlmResult<Self> {
        let api_key = config.api_key.clone().ok_or(LlmError::MissingApiKey)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(LlmError::Network)?;

        Ok(Self {
            http,
            api_key,
            config,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> LlmResult<Self> {
        Self::new(OpenAiConfig::from_env())
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Generate a children's story for `prompt`. Returns the trimmed story text.
    pub async fn generate_story(&self, prompt: &str) -> LlmResult<String> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: build_story_messages(prompt),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(model = %request.model, "Sending chat completion request to {}", url);
        let start = Instant::now();

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::RequestFailed { status, body });
        }

        let body = response.bytes().await?;
        let chat: ChatResponse = serde_json::from_slice(&body)?;

        let story = chat
            .first_content()
            .map(str::trim)
            .ok_or_else(|| LlmError::invalid_response("No content in chat completion"))?
            .to_string();

        info!(
            model = %self.config.model,
            chars = story.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Story generated"
        );

        Ok(story)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::prompt::STORY_SYSTEM_PROMPT;

    fn test_config(base_url: String) -> OpenAiConfig {
        OpenAiConfig {
            api_key: Some("sk-test".to_string()),
            base_url,
            timeout: Duration::from_secs(5),
            ..OpenAiConfig::default()
        }
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    #[test]
    fn test_new_requires_api_key() {
        let result = OpenAiClient::new(OpenAiConfig::default());
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_generate_story_trims_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 1000,
                "messages": [
                    { "role": "system", "content": STORY_SYSTEM_PROMPT },
                    { "role": "user", "content": "a sleepy dragon" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                "\n\n  Once upon a time, a dragon yawned.  \n",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new(test_config(server.uri())).unwrap();
        let story = client.generate_story("a sleepy dragon").await.unwrap();

        assert_eq!(story, "Once upon a time, a dragon yawned.");
    }

    #[tokio::test]
    async fn test_generate_story_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "error": { "message": "Incorrect API key" } })),
            )
            .mount(&server)
            .await;

        let client = OpenAiClient::new(test_config(server.uri())).unwrap();
        let err = client.generate_story("a cat").await.unwrap_err();

        assert_eq!(err.http_status(), Some(401));
        assert!(err.to_string().contains("Incorrect API key"));
    }

    #[tokio::test]
    async fn test_generate_story_without_choices() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(test_config(server.uri())).unwrap();
        let err = client.generate_story("a cat").await.unwrap_err();

        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_generate_story_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(test_config(server.uri())).unwrap();
        let err = client.generate_story("a cat").await.unwrap_err();

        assert!(matches!(err, LlmError::Json(_)));
    }
}
