//! Error Classifier: a pure, table-driven function mapping a failure kind
//! and retry count onto a recovery decision (spec.md §4.13).
//!
//! Grounded on `hotki-engine`'s small pure-logic modules (`key_state`,
//! `regex_cache`): no I/O, a single exhaustive match, fully covered by
//! unit tests rather than property tests (the table has eight rows, not
//! an algebraic law).
#![warn(missing_docs)]

use gaze_protocol::ErrorKind;

/// How urgent a failure is, independent of which recovery action is taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Transient, expected occasionally.
    Low,
    /// Worth noting; still automatically recoverable.
    Medium,
    /// Indicates a planner or contract violation.
    High,
    /// Task-ending; no further recovery applies.
    Critical,
}

/// What the Director should do next in response to a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Re-execute the same step.
    Retry,
    /// Trigger a new plan, supplying completed-step context.
    Replan,
    /// Force a recapture, then retry the same step.
    Reanalyze,
    /// Advance past the failed step without retrying.
    Skip,
    /// Finish the task as failed.
    Abort,
}

/// Full recovery decision for one failure (spec.md §4.13).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recovery {
    /// The error kind this decision was computed for.
    pub kind: ErrorKind,
    /// Urgency of the failure.
    pub severity: Severity,
    /// What the Director should do.
    pub action: RecoveryAction,
    /// Whether a recapture should additionally be forced before acting,
    /// independent of `action` (the table's "reanalyze" column; e.g. a
    /// REPLAN following `zone_not_found` still wants a fresh canvas read,
    /// whereas a REPLAN following `action_failed` does not).
    pub reanalyze_canvas: bool,
}

/// Classify `kind`, given how many retries this step has already used and
/// the configured ceiling. `retry_count >= max_step_retries` selects the
/// table's "exhausted" column; otherwise the "retries remain" column.
///
/// Spec.md §4.13 phrases this as `classify(step_result, retry_count)`; the
/// step result only ever contributes its `error_kind` to the decision, so
/// this function takes that directly — it is also the entry point the
/// Director uses for `plan_invalid` (from plan validation) and
/// `budget_exhausted` (from the Director's own counters), neither of which
/// arises from a `StepResult` at all.
#[must_use]
pub fn classify(kind: ErrorKind, retry_count: u32, max_step_retries: u32) -> Recovery {
    let exhausted = retry_count >= max_step_retries;
    let (severity, action, reanalyze_canvas) = match kind {
        ErrorKind::ZoneNotFound => (
            Severity::Medium,
            if exhausted { RecoveryAction::Abort } else { RecoveryAction::Replan },
            true,
        ),
        ErrorKind::ActionFailed => (
            Severity::Low,
            if exhausted { RecoveryAction::Replan } else { RecoveryAction::Retry },
            false,
        ),
        ErrorKind::BrushLost => (
            Severity::Medium,
            if exhausted { RecoveryAction::Replan } else { RecoveryAction::Reanalyze },
            true,
        ),
        ErrorKind::Timeout => (
            Severity::Low,
            if exhausted { RecoveryAction::Replan } else { RecoveryAction::Retry },
            false,
        ),
        ErrorKind::ParseError => (Severity::Low, RecoveryAction::Skip, false),
        ErrorKind::UnsupportedGlobalAction => (Severity::High, RecoveryAction::Abort, false),
        ErrorKind::PlanInvalid => (
            Severity::High,
            if exhausted { RecoveryAction::Abort } else { RecoveryAction::Replan },
            true,
        ),
        ErrorKind::BudgetExhausted => (Severity::Critical, RecoveryAction::Abort, false),
        ErrorKind::PlatformError => (
            Severity::Medium,
            if exhausted { RecoveryAction::Abort } else { RecoveryAction::Retry },
            false,
        ),
    };

    Recovery { kind, severity, action, reanalyze_canvas }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_not_found_replans_then_aborts() {
        assert_eq!(classify(ErrorKind::ZoneNotFound, 0, 3).action, RecoveryAction::Replan);
        assert_eq!(classify(ErrorKind::ZoneNotFound, 3, 3).action, RecoveryAction::Abort);
        assert!(classify(ErrorKind::ZoneNotFound, 0, 3).reanalyze_canvas);
    }

    #[test]
    fn action_failed_retries_then_replans() {
        assert_eq!(classify(ErrorKind::ActionFailed, 0, 3).action, RecoveryAction::Retry);
        assert_eq!(classify(ErrorKind::ActionFailed, 3, 3).action, RecoveryAction::Replan);
        assert!(!classify(ErrorKind::ActionFailed, 0, 3).reanalyze_canvas);
    }

    #[test]
    fn brush_lost_reanalyzes_then_replans() {
        assert_eq!(classify(ErrorKind::BrushLost, 0, 3).action, RecoveryAction::Reanalyze);
        assert_eq!(classify(ErrorKind::BrushLost, 3, 3).action, RecoveryAction::Replan);
        assert!(classify(ErrorKind::BrushLost, 0, 3).reanalyze_canvas);
    }

    #[test]
    fn timeout_retries_then_replans() {
        assert_eq!(classify(ErrorKind::Timeout, 0, 3).action, RecoveryAction::Retry);
        assert_eq!(classify(ErrorKind::Timeout, 3, 3).action, RecoveryAction::Replan);
    }

    #[test]
    fn parse_error_always_skips() {
        assert_eq!(classify(ErrorKind::ParseError, 0, 3).action, RecoveryAction::Skip);
        assert_eq!(classify(ErrorKind::ParseError, 3, 3).action, RecoveryAction::Skip);
    }

    #[test]
    fn unsupported_global_action_always_aborts() {
        assert_eq!(classify(ErrorKind::UnsupportedGlobalAction, 0, 3).action, RecoveryAction::Abort);
        assert_eq!(classify(ErrorKind::UnsupportedGlobalAction, 0, 3).severity, Severity::High);
    }

    #[test]
    fn plan_invalid_replans_then_aborts() {
        assert_eq!(classify(ErrorKind::PlanInvalid, 0, 3).action, RecoveryAction::Replan);
        assert_eq!(classify(ErrorKind::PlanInvalid, 3, 3).action, RecoveryAction::Abort);
    }

    #[test]
    fn budget_exhausted_always_aborts_critically() {
        let r = classify(ErrorKind::BudgetExhausted, 0, 3);
        assert_eq!(r.action, RecoveryAction::Abort);
        assert_eq!(r.severity, Severity::Critical);
    }

    #[test]
    fn platform_error_retries_then_aborts() {
        assert_eq!(classify(ErrorKind::PlatformError, 0, 3).action, RecoveryAction::Retry);
        assert_eq!(classify(ErrorKind::PlatformError, 3, 3).action, RecoveryAction::Abort);
    }
}
