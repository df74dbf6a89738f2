//! Client for the OpenAI chat completions API.
//!
//! Turns a child's prompt into a short story. One request per call; no
//! retries and no streaming.

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::{OpenAiClient, OpenAiConfig};
pub use error::{LlmError, LlmResult};
pub use prompt::STORY_SYSTEM_PROMPT;
