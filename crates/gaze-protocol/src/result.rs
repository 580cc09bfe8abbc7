use serde::{Deserialize, Serialize};

use crate::{error::ErrorKind, event::SpatialEvent, step::TaskStep};

/// Outcome of dispatching a single [`TaskStep`] through the Step Executor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// The step that was executed.
    pub step: TaskStep,
    /// Whether it succeeded.
    pub success: bool,
    /// Spatial events observed by the tracker while this step ran.
    pub events: Vec<SpatialEvent>,
    /// Human-readable error message, present iff `!success`.
    pub error: Option<String>,
    /// Structured error kind, present iff `!success`.
    pub error_kind: Option<ErrorKind>,
    /// Monotonic timestamp (milliseconds) the result was produced at.
    pub timestamp_ms: u64,
}

impl StepResult {
    /// Construct a successful result.
    #[must_use]
    pub fn success(step: TaskStep, events: Vec<SpatialEvent>, timestamp_ms: u64) -> Self {
        Self {
            step,
            success: true,
            events,
            error: None,
            error_kind: None,
            timestamp_ms,
        }
    }

    /// Construct a failed result.
    #[must_use]
    pub fn failure(
        step: TaskStep,
        error_kind: ErrorKind,
        error: impl Into<String>,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            step,
            success: false,
            events: Vec::new(),
            error: Some(error.into()),
            error_kind: Some(error_kind),
            timestamp_ms,
        }
    }
}

/// Final outcome of one `run_task` attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Whether the task reached completion.
    pub success: bool,
    /// Number of steps that executed successfully.
    pub completed_steps: u32,
    /// Number of plans produced (initial plan plus any replans).
    pub plans_used: u32,
    /// Total API calls consumed across planner and vision invocations.
    pub api_calls_used: u32,
    /// Terminal error, present iff `!success`.
    pub final_error: Option<(ErrorKind, String)>,
}
