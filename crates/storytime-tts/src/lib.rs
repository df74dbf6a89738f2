//! ElevenLabs streaming text-to-speech client.
//!
//! This crate provides:
//! - The `stream-input` WebSocket handshake and outbound frames
//! - Decoding of base64 audio frames
//! - An adapter that turns the frame sequence into one ordered byte stream

pub mod client;
pub mod error;
pub mod frame;
pub mod stream;

pub use client::{ElevenLabsClient, ElevenLabsConfig, VoiceSettings};
pub use error::{TtsError, TtsResult};
pub use frame::{decode_frame, DecodedFrame, InboundFrame, OutboundFrame};
pub use stream::{audio_chunks, AudioStream};
