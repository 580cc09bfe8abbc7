use std::time::{Duration, Instant};

use gaze_protocol::Settings;
use tracing::{debug, warn};

use crate::{
    backend::{VisionBackend, VisionRequest},
    outcome::VisionOutcome,
};

/// Call `backend` once, retrying transient failures up to
/// `settings.api_max_retries` times with exponential backoff
/// (`api_backoff_base_seconds * 2^attempt`), and bounding every attempt by
/// `settings.api_timeout_vision_seconds` (spec.md §4.4).
pub async fn call_with_retry(
    backend: &dyn VisionBackend,
    request: VisionRequest<'_>,
    settings: &Settings,
) -> VisionOutcome {
    let started = Instant::now();
    let mut last_error = String::new();

    for attempt in 0..=settings.api_max_retries {
        if attempt > 0 {
            let backoff =
                Duration::from_secs_f64(settings.api_backoff_base_seconds * 2f64.powi(attempt as i32 - 1));
            debug!(attempt, backoff_secs = backoff.as_secs_f64(), "vision_retry_backoff");
            tokio::time::sleep(backoff).await;
        }

        let attempt_fut = backend.analyze(VisionRequest {
            image: request.image,
            screen_width: request.screen_width,
            screen_height: request.screen_height,
            context_hint: request.context_hint,
        });
        let timeout = Duration::from_secs(settings.api_timeout_vision_seconds);

        match tokio::time::timeout(timeout, attempt_fut).await {
            Ok(Ok(response)) => {
                return VisionOutcome {
                    zones: response.zones,
                    raw_response: response.raw_response,
                    latency_ms: started.elapsed().as_millis() as u64,
                    token_count: response.token_count,
                    success: true,
                    error: None,
                };
            }
            Ok(Err(err)) => {
                warn!(attempt, error = %err, "vision_call_failed");
                last_error = err.to_string();
            }
            Err(_) => {
                warn!(attempt, "vision_call_timed_out");
                last_error = "vision call timed out".to_string();
            }
        }
    }

    VisionOutcome {
        zones: Vec::new(),
        raw_response: String::new(),
        latency_ms: started.elapsed().as_millis() as u64,
        token_count: 0,
        success: false,
        error: Some(last_error),
    }
}
