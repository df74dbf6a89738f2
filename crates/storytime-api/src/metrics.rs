//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "storytime_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "storytime_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "storytime_http_requests_in_flight";

    // Relay metrics
    pub const STORIES_TOTAL: &str = "storytime_stories_total";
    pub const AUDIO_STREAMS_TOTAL: &str = "storytime_audio_streams_total";
    pub const AUDIO_BYTES_TOTAL: &str = "storytime_audio_bytes_total";
    pub const UPSTREAM_DURATION_SECONDS: &str = "storytime_upstream_duration_seconds";
}

/// Routes with a fixed label; everything else is a static file lookup.
const KNOWN_PATHS: &[&str] = &[
    "/story", "/audio", "/health", "/healthz", "/ready", "/metrics",
];

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a story generation outcome (`success` or `failed`).
pub fn record_story(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::STORIES_TOTAL, &labels).increment(1);
}

/// Record an audio stream outcome (`started`, `empty`, `failed`, `truncated`).
pub fn record_audio_stream(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::AUDIO_STREAMS_TOTAL, &labels).increment(1);
}

/// Record audio bytes relayed to a client.
pub fn record_audio_bytes(bytes: usize) {
    counter!(names::AUDIO_BYTES_TOTAL).increment(bytes as u64);
}

/// Record provider latency. For streamed audio this is time to first chunk.
pub fn record_upstream_duration(provider: &str, duration_secs: f64) {
    let labels = [("provider", provider.to_string())];
    histogram!(names::UPSTREAM_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Collapse static file paths into one label to bound cardinality.
fn sanitize_path(path: &str) -> String {
    if KNOWN_PATHS.contains(&path) {
        path.to_string()
    } else {
        "/static".to_string()
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    // For /audio this covers time to first chunk, not the whole stream.
    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/story"), "/story");
        assert_eq!(sanitize_path("/audio"), "/audio");
        assert_eq!(sanitize_path("/"), "/static");
        assert_eq!(sanitize_path("/js/app.8f3a1c.js"), "/static");
    }
}
