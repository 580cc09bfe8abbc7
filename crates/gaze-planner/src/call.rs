use std::time::{Duration, Instant};

use gaze_protocol::{Settings, TaskPlan};
use tracing::warn;

use crate::{
    backend::{PlanRequest, TaskPlanner},
    validate::validate,
};

fn failed(task_description: &str, error: impl Into<String>, latency_ms: u64) -> TaskPlan {
    TaskPlan {
        task_description: task_description.to_string(),
        steps: Vec::new(),
        raw_response: String::new(),
        success: false,
        error: Some(error.into()),
        api_calls_used: 1,
        latency_ms,
    }
}

/// Call `backend` exactly once, bounding the attempt by
/// `settings.api_timeout_text_seconds` (spec.md §4.12). No retry: the
/// planner consumes its one API call slot whether or not the call
/// succeeds. An empty step list or a plan violating the mechanically
/// checkable contract rules (see [`crate::validate`]) is also reported as
/// failure.
pub async fn call_plan(backend: &dyn TaskPlanner, request: PlanRequest<'_>, settings: &Settings) -> TaskPlan {
    let started = Instant::now();
    let task_description = request.task_description.to_string();
    let timeout = Duration::from_secs(settings.api_timeout_text_seconds);

    let outcome = tokio::time::timeout(timeout, backend.plan(request)).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(Ok(response)) => {
            if response.steps.is_empty() {
                warn!(task = %task_description, "task_planner_empty_plan");
                return failed(&task_description, "planner returned an empty plan", latency_ms);
            }
            if let Some(reason) = validate(&response.steps) {
                warn!(task = %task_description, reason = %reason, "task_planner_plan_invalid");
                return failed(&task_description, reason, latency_ms);
            }
            TaskPlan {
                task_description,
                steps: response.steps,
                raw_response: response.raw_response,
                success: true,
                error: None,
                api_calls_used: 1,
                latency_ms,
            }
        }
        Ok(Err(err)) => {
            warn!(task = %task_description, error = %err, "task_planner_call_failed");
            failed(&task_description, err.to_string(), latency_ms)
        }
        Err(_) => {
            warn!(task = %task_description, "task_planner_call_timed_out");
            failed(&task_description, "task planner call timed out", latency_ms)
        }
    }
}
