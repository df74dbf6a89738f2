//! LLM client error types.

use thiserror::Error;

pub type LlmResult<T> = Result<T, LlmError>;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("OPENAI_API_KEY not configured")]
    MissingApiKey,

    #[error("OpenAI returned {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// HTTP status reported by the provider, if the request reached it.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            LlmError::RequestFailed { status, .. } => Some(*status),
            LlmError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_getter() {
        let err = LlmError::RequestFailed {
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(err.http_status(), Some(429));
        assert_eq!(LlmError::MissingApiKey.http_status(), None);
        assert_eq!(LlmError::invalid_response("no choices").http_status(), None);
    }
}
