//! Shared data models for the Storytime relay.
//!
//! This crate provides Serde-serializable types for:
//! - Story generation requests and responses
//! - Audio synthesis requests
//! - The JSON error envelope returned by every endpoint

pub mod audio;
pub mod error;
pub mod story;

// Re-export common types
pub use audio::AudioRequest;
pub use error::ErrorBody;
pub use story::{StoryRequest, StoryResponse};

/// Treat a missing, null or empty string field as absent.
pub(crate) fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}
