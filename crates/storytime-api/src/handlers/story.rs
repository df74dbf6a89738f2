//! Story generation handler.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use storytime_models::{StoryRequest, StoryResponse};
use tracing::{error, info};

use crate::error::{ApiError, ApiResult};
use crate::handlers::JsonBody;
use crate::metrics;
use crate::state::AppState;

/// `POST /story`: ask the LLM for a children's story.
pub async fn generate_story(
    State(state): State<AppState>,
    payload: Result<JsonBody<StoryRequest>, ApiError>,
) -> ApiResult<Json<StoryResponse>> {
    let client = state
        .openai
        .as_ref()
        .ok_or(ApiError::MissingApiKey("OpenAI"))?;

    let JsonBody(request) = payload?;
    let prompt = request
        .prompt()
        .ok_or_else(|| ApiError::bad_request("Prompt is required"))?;

    let start = Instant::now();
    let result = client.generate_story(prompt).await;
    metrics::record_upstream_duration("openai", start.elapsed().as_secs_f64());

    match result {
        Ok(story) => {
            metrics::record_story("success");
            info!(
                model = %client.model(),
                prompt_chars = prompt.len(),
                story_chars = story.len(),
                "Story ready"
            );
            Ok(Json(StoryResponse { story }))
        }
        Err(e) => {
            metrics::record_story("failed");
            error!(error = %e, status = ?e.http_status(), "OpenAI error");
            Err(ApiError::upstream("Failed to generate story"))
        }
    }
}
