//! Audio synthesis payloads.

use serde::{Deserialize, Serialize};

/// Body of `POST /audio`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AudioRequest {
    #[serde(default)]
    pub story: Option<String>,
}

impl AudioRequest {
    pub fn new(story: impl Into<String>) -> Self {
        Self {
            story: Some(story.into()),
        }
    }

    /// The story text, if one was supplied and is not empty.
    pub fn story(&self) -> Option<&str> {
        crate::non_empty(self.story.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_field() {
        let req: AudioRequest = serde_json::from_str(r#"{"story": "Once upon a time"}"#).unwrap();
        assert_eq!(req.story(), Some("Once upon a time"));

        let req: AudioRequest = serde_json::from_str(r#"{"story": ""}"#).unwrap();
        assert_eq!(req.story(), None);

        assert_eq!(AudioRequest::default().story(), None);
    }
}
