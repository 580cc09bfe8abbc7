use async_trait::async_trait;
use gaze_protocol::Zone;

use crate::error::PlannerError;

/// Request body for a single plan call (spec.md §6/§4.12 wire contract).
#[derive(Clone, Debug)]
pub struct PlanRequest<'a> {
    /// Free-text task the plan should accomplish.
    pub task_description: &'a str,
    /// Name of the platform the plan will execute on (`macos`, …).
    pub platform_name: &'a str,
    /// Current zone inventory the planner may target.
    pub zones: &'a [Zone],
    /// Append-only history of prior completed step descriptions, supplied
    /// verbatim on every call including replans (the completed-step
    /// context invariant).
    pub completed_steps: &'a [String],
}

/// Successful response body: an ordered step list plus diagnostics.
#[derive(Clone, Debug, Default)]
pub struct PlanResponse {
    /// Steps the planner produced, in execution order.
    pub steps: Vec<gaze_protocol::TaskStep>,
    /// Raw response text, kept for diagnostics.
    pub raw_response: String,
}

/// External task planner (spec.md §1, §4.12, §6). The wire format and
/// credentials are pinned interface, not implemented here; this crate owns
/// only the single-call wrapper and plan validation layered on top.
///
/// Unlike the Vision Analyzer's equivalent, no retry/backoff policy wraps
/// this trait: spec.md §4.12 consumes exactly one API call slot per
/// invocation "regardless of success", which rules out internal retries.
#[async_trait]
pub trait TaskPlanner: Send + Sync {
    /// Perform one planning call.
    async fn plan(&self, request: PlanRequest<'_>) -> Result<PlanResponse, PlannerError>;
}
