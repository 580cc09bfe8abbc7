use serde::{Deserialize, Serialize};

/// Closed taxonomy of error kinds surfaced to the Error Classifier and to
/// the final [`crate::TaskResult`].
///
/// This is distinct from the per-crate `thiserror` error types used for
/// internal propagation: those are mapped into one of these variants at
/// each component boundary (see spec.md §7, "propagation policy").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The step's target zone id is not present in the registry.
    ZoneNotFound,
    /// The platform adapter reported the action itself did not succeed.
    ActionFailed,
    /// The cursor arrived, but the target zone was not the tracker's
    /// current zone at the moment of dispatch.
    BrushLost,
    /// A network call exceeded its deadline.
    Timeout,
    /// A response could not be parsed into the expected structure.
    ParseError,
    /// A `__global__` step requested an action kind the command path does
    /// not support.
    UnsupportedGlobalAction,
    /// The task planner violated one of its contractual rules.
    PlanInvalid,
    /// One of the Director's budget counters reached its ceiling.
    BudgetExhausted,
    /// The platform adapter returned an error outside the named taxonomy.
    PlatformError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ZoneNotFound => "zone_not_found",
            Self::ActionFailed => "action_failed",
            Self::BrushLost => "brush_lost",
            Self::Timeout => "timeout",
            Self::ParseError => "parse_error",
            Self::UnsupportedGlobalAction => "unsupported_global_action",
            Self::PlanInvalid => "plan_invalid",
            Self::BudgetExhausted => "budget_exhausted",
            Self::PlatformError => "platform_error",
        };
        f.write_str(s)
    }
}
