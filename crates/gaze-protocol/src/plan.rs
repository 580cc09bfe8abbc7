use serde::{Deserialize, Serialize};

use crate::step::TaskStep;

/// An ordered plan produced by a single task planner invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskPlan {
    /// Task description the plan was produced for.
    pub task_description: String,
    /// Ordered steps; empty iff `success` is `false`.
    pub steps: Vec<TaskStep>,
    /// Raw planner response text, kept for diagnostics.
    pub raw_response: String,
    /// Whether the planner produced a usable plan.
    pub success: bool,
    /// Failure description when `success` is `false`.
    pub error: Option<String>,
    /// API call slots this invocation consumed (always 1 in the current
    /// contract; kept as a field for forward compatibility with batched
    /// planners).
    pub api_calls_used: u32,
    /// Wall-clock latency of the planner call, in milliseconds.
    pub latency_ms: u64,
}

impl TaskPlan {
    /// Construct a failed plan with no steps.
    #[must_use]
    pub fn failed(task_description: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            task_description: task_description.into(),
            steps: Vec::new(),
            raw_response: String::new(),
            success: false,
            error: Some(error.into()),
            api_calls_used: 1,
            latency_ms: 0,
        }
    }
}
