use thiserror::Error;

/// Failure modes a [`crate::TaskPlanner`] call can report.
///
/// Distinct from "empty plan" and "plan_invalid", which are detected by
/// [`crate::call_plan`] after a structurally successful call rather than
/// raised by the backend itself.
#[derive(Debug, Error, Clone)]
pub enum PlannerError {
    /// The request could not reach the remote endpoint.
    #[error("network error calling task planner: {0}")]
    Network(String),

    /// The response body could not be parsed into an ordered step list.
    #[error("failed to parse task planner response: {0}")]
    ParseFailure(String),
}
