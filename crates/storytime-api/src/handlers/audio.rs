//! Audio narration handler.
//!
//! The provider answers over a WebSocket with base64 audio frames. The
//! response is held back until the first chunk arrives so that a failure
//! before any audio can still be reported as a JSON error; after that the
//! chunks are relayed as one chunked `audio/mpeg` body.

use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::{future, stream, StreamExt};
use storytime_models::AudioRequest;
use storytime_tts::TtsError;
use tracing::{error, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::handlers::JsonBody;
use crate::metrics;
use crate::state::AppState;

const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";
const WEBSOCKET_ERROR: &str = "Failed to generate audio (WebSocket error)";

/// `POST /audio`: narrate a story and stream the MP3 back.
pub async fn synthesize_audio(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<JsonBody<AudioRequest>, ApiError>,
) -> ApiResult<Response> {
    let client = state
        .elevenlabs
        .as_ref()
        .ok_or(ApiError::MissingApiKey("ElevenLabs"))?;

    let JsonBody(request) = payload?;
    let story = request
        .story()
        .ok_or_else(|| ApiError::bad_request("Story is required"))?;

    // Only full-file requests are served
    if headers.contains_key(header::RANGE) {
        return Err(ApiError::not_implemented("Range requests not supported yet"));
    }

    let start = Instant::now();
    let mut audio = client.stream_speech(story).await.map_err(|e| {
        metrics::record_audio_stream("failed");
        error!(error = %e, "ElevenLabs WebSocket error");
        ApiError::upstream(WEBSOCKET_ERROR)
    })?;

    let first = match audio.next().await {
        Some(Ok(chunk)) => chunk,
        Some(Err(e)) => {
            metrics::record_audio_stream("failed");
            error!(error = %e, "ElevenLabs WebSocket error");
            return Err(ApiError::upstream(WEBSOCKET_ERROR));
        }
        None => {
            metrics::record_audio_stream("empty");
            warn!("ElevenLabs ended the stream without audio");
            return Ok(StatusCode::OK.into_response());
        }
    };

    metrics::record_upstream_duration("elevenlabs", start.elapsed().as_secs_f64());
    metrics::record_audio_stream("started");
    info!(
        voice_id = %client.voice_id(),
        story_chars = story.len(),
        first_chunk_bytes = first.len(),
        "Audio stream started"
    );

    let body = stream::once(future::ready(Ok::<_, TtsError>(first)))
        .chain(audio)
        .take_while(|item| {
            if let Err(e) = item {
                metrics::record_audio_stream("truncated");
                error!(error = %e, "ElevenLabs stream failed after audio started");
            }
            future::ready(item.is_ok())
        })
        .inspect(|item| {
            if let Ok(chunk) = item {
                metrics::record_audio_bytes(chunk.len());
            }
        });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, AUDIO_CONTENT_TYPE)
        .body(Body::from_stream(body))
        .map_err(|e| ApiError::internal(format!("Failed to build response: {}", e)))
}
