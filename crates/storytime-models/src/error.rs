//! Error envelope.

use serde::{Deserialize, Serialize};

/// JSON body of every error response: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let json = serde_json::to_value(ErrorBody::new("Prompt is required")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Prompt is required" }));
    }
}
