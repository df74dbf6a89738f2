//! `stream-input` frame types and decoding.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::VoiceSettings;
use crate::error::{TtsError, TtsResult};

/// Padding is optional on inbound audio.
const AUDIO_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Frames sent to the provider, in protocol order.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OutboundFrame {
    /// Opens the input stream. `text` must be a single space.
    Initialize {
        text: String,
        voice_settings: VoiceSettings,
        model_id: String,
        xi_api_key: String,
    },
    /// Text to narrate.
    Text {
        text: String,
        try_trigger_generation: bool,
    },
    /// Empty text closes the input stream; the provider flushes and sends `isFinal`.
    EndOfInput { text: String },
}

impl OutboundFrame {
    pub fn initialize(voice_settings: VoiceSettings, model_id: &str, api_key: &str) -> Self {
        Self::Initialize {
            text: " ".to_string(),
            voice_settings,
            model_id: model_id.to_string(),
            xi_api_key: api_key.to_string(),
        }
    }

    /// The provider buffers until it sees a trailing space.
    pub fn text(text: &str) -> Self {
        let text = if text.ends_with(' ') {
            text.to_string()
        } else {
            format!("{} ", text)
        };
        Self::Text {
            text,
            try_trigger_generation: true,
        }
    }

    pub fn end_of_input() -> Self {
        Self::EndOfInput {
            text: String::new(),
        }
    }
}

/// Frame received from the provider. Unknown fields (alignment data) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundFrame {
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default, rename = "isFinal")]
    pub is_final: Option<bool>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

/// Decoded content of one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub chunk: Option<Bytes>,
    pub is_final: bool,
}

/// Decode one text frame.
///
/// Returns `Ok(None)` for frames that are not JSON objects. Audio that fails
/// to decode is dropped with a warning; the frame's `isFinal` still counts.
pub fn decode_frame(text: &str) -> TtsResult<Option<DecodedFrame>> {
    let frame: InboundFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            debug!("Ignoring non-JSON frame: {}", e);
            return Ok(None);
        }
    };

    if let (Some(error), None) = (&frame.error, &frame.audio) {
        let detail = frame.message.as_ref().unwrap_or(error);
        return Err(TtsError::provider(value_text(detail)));
    }

    let chunk = match frame.audio.as_deref() {
        Some(encoded) if !encoded.is_empty() => match AUDIO_ENGINE.decode(encoded) {
            Ok(bytes) if !bytes.is_empty() => Some(Bytes::from(bytes)),
            Ok(_) => None,
            Err(e) => {
                warn!("Skipping undecodable audio chunk ({} chars): {}", encoded.len(), e);
                None
            }
        },
        _ => None,
    };

    Ok(Some(DecodedFrame {
        chunk,
        is_final: frame.is_final.unwrap_or(false),
    }))
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_audio_frame() {
        // "ID3" in base64
        let decoded = decode_frame(r#"{"audio": "SUQz", "isFinal": null, "normalizedAlignment": null}"#)
            .unwrap()
            .unwrap();
        assert_eq!(decoded.chunk, Some(Bytes::from_static(b"ID3")));
        assert!(!decoded.is_final);
    }

    #[test]
    fn test_decode_unpadded_audio() {
        // "hi" is "aGk=" padded
        let decoded = decode_frame(r#"{"audio": "aGk"}"#).unwrap().unwrap();
        assert_eq!(decoded.chunk, Some(Bytes::from_static(b"hi")));
    }

    #[test]
    fn test_decode_final_frame() {
        let decoded = decode_frame(r#"{"audio": null, "isFinal": true}"#).unwrap().unwrap();
        assert_eq!(decoded.chunk, None);
        assert!(decoded.is_final);
    }

    #[test]
    fn test_non_json_frame_is_ignored() {
        assert_eq!(decode_frame("not json").unwrap(), None);
        assert_eq!(decode_frame("").unwrap(), None);
    }

    #[test]
    fn test_invalid_base64_is_skipped() {
        let decoded = decode_frame(r#"{"audio": "!!!not-base64!!!", "isFinal": true}"#)
            .unwrap()
            .unwrap();
        assert_eq!(decoded.chunk, None);
        assert!(decoded.is_final);
    }

    #[test]
    fn test_provider_error_frame() {
        let err = decode_frame(
            r#"{"message": "Invalid API key", "error": "auth_error", "code": 1008}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TtsError::Provider(ref m) if m == "Invalid API key"));
    }

    #[test]
    fn test_outbound_frames_serialize() {
        let init = OutboundFrame::initialize(VoiceSettings::default(), "eleven_monolingual_v1", "xi-key");
        let json = serde_json::to_value(&init).unwrap();
        assert_eq!(json["text"], " ");
        assert_eq!(json["model_id"], "eleven_monolingual_v1");
        assert_eq!(json["xi_api_key"], "xi-key");
        assert_eq!(json["voice_settings"]["stability"], 0.5);
        assert_eq!(json["voice_settings"]["similarity_boost"], 0.5);
        assert_eq!(json["voice_settings"]["speed"], 1.0);

        let text = serde_json::to_value(OutboundFrame::text("The end.")).unwrap();
        assert_eq!(
            text,
            serde_json::json!({ "text": "The end. ", "try_trigger_generation": true })
        );

        let eos = serde_json::to_value(OutboundFrame::end_of_input()).unwrap();
        assert_eq!(eos, serde_json::json!({ "text": "" }));
    }
}
