//! Story generation payloads.

use serde::{Deserialize, Serialize};

/// Body of `POST /story`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

impl StoryRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
        }
    }

    /// The prompt, if one was supplied and is not empty.
    pub fn prompt(&self) -> Option<&str> {
        crate::non_empty(self.prompt.as_ref())
    }
}

/// Successful response of `POST /story`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryResponse {
    pub story: String,
}
