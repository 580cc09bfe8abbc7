//! Step Executor: the single entry point that dispatches one [`TaskStep`]
//! by sentinel, by `__global__` command, or by delegating to the Brush
//! Controller (spec.md §4.11).
#![warn(missing_docs)]

use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use gaze_brush::{BrushController, NavigationOutcome};
use gaze_motion::TrajectoryKind;
use gaze_platform::PlatformAdapter;
use gaze_protocol::{Action, ActionParams, ErrorKind, StepResult, TaskStep};
use gaze_tracker::ZoneTracker;
use tracing::{info, warn};

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// A step's trajectory style: `Safe` for drags (to clear "avoid" zones),
/// `Direct` for everything else. Not named explicitly in spec.md §4.10; an
/// original decision recorded in DESIGN.md.
fn trajectory_kind_for(params: &ActionParams) -> TrajectoryKind {
    match params {
        ActionParams::Drag { .. } => TrajectoryKind::Safe,
        _ => TrajectoryKind::Direct,
    }
}

/// Single entry point for step dispatch.
pub struct StepExecutor {
    adapter: Arc<dyn PlatformAdapter>,
    brush: BrushController,
}

impl StepExecutor {
    /// Build a step executor driving `adapter` directly for `__global__`
    /// steps and delegating visual steps to `brush`.
    #[must_use]
    pub fn new(adapter: Arc<dyn PlatformAdapter>, brush: BrushController) -> Self {
        Self { adapter, brush }
    }

    /// Execute one step, sampling `tracker` for any spatial events produced.
    pub fn execute(&self, step: &TaskStep, tracker: &mut ZoneTracker) -> StepResult {
        if step.is_replan() {
            info!(step = step.step_number, "step_executor_replan_noop");
            return StepResult::success(step.clone(), Vec::new(), now_ms());
        }

        if step.is_global() {
            return self.execute_global(step);
        }

        self.execute_visual(step, tracker)
    }

    fn execute_global(&self, step: &TaskStep) -> StepResult {
        let outcome = match &step.action {
            ActionParams::KeyPress { key } => self.adapter.key_press(key),
            ActionParams::TypeText { text } => self.adapter.type_text(text),
            ActionParams::Click { x, y, button } => match (x, y) {
                (Some(x), Some(y)) => self.adapter.click(*x, *y, *button),
                _ => {
                    return StepResult::failure(
                        step.clone(),
                        ErrorKind::UnsupportedGlobalAction,
                        "__global__ click requires explicit x/y",
                        now_ms(),
                    );
                }
            },
            other => {
                warn!(kind = other.kind_name(), "step_executor_unsupported_global_action");
                return StepResult::failure(
                    step.clone(),
                    ErrorKind::UnsupportedGlobalAction,
                    format!("__global__ steps do not support '{}'", other.kind_name()),
                    now_ms(),
                );
            }
        };

        match outcome {
            Ok(()) => StepResult::success(step.clone(), Vec::new(), now_ms()),
            Err(err) => {
                StepResult::failure(step.clone(), ErrorKind::ActionFailed, err.to_string(), now_ms())
            }
        }
    }

    fn execute_visual(&self, step: &TaskStep, tracker: &mut ZoneTracker) -> StepResult {
        let action = Action::new(step.action.clone(), Some(step.zone_id.clone()));
        let result = self.brush.execute(
            &step.zone_id,
            trajectory_kind_for(&step.action),
            tracker,
            &action,
        );

        match result.navigation {
            NavigationOutcome::ZoneNotFound => StepResult::failure(
                step.clone(),
                ErrorKind::ZoneNotFound,
                format!("zone '{}' is not present in the registry", step.zone_id),
                now_ms(),
            ),
            NavigationOutcome::BrushLost => StepResult::failure(
                step.clone(),
                ErrorKind::BrushLost,
                format!("cursor did not settle on zone '{}'", step.zone_id),
                now_ms(),
            ),
            NavigationOutcome::Arrived => {
                let action_result = result.action.expect("Arrived always carries an action result");
                if action_result.success {
                    StepResult::success(step.clone(), result.events, now_ms())
                } else {
                    StepResult::failure(
                        step.clone(),
                        action_result.error_kind.unwrap_or(ErrorKind::ActionFailed),
                        action_result.error.unwrap_or_else(|| "action failed".to_string()),
                        now_ms(),
                    )
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gaze_platform::ScriptedPlatform;
    use gaze_protocol::{MouseButton, Rect, Settings, Zone, ZoneKind, ZoneState};
    use gaze_registry::ZoneRegistry;

    use super::*;

    fn step(zone_id: &str, action: ActionParams) -> TaskStep {
        TaskStep {
            step_number: 1,
            zone_id: zone_id.into(),
            zone_label: "label".into(),
            action,
            expected_change: String::new(),
            description: "test step".into(),
        }
    }

    fn executor(registry: Arc<ZoneRegistry>) -> (StepExecutor, Arc<ScriptedPlatform>) {
        let adapter = Arc::new(ScriptedPlatform::new((800, 600)));
        let brush = BrushController::new(adapter.clone(), registry, Settings::default());
        (StepExecutor::new(adapter.clone(), brush), adapter)
    }

    #[test]
    fn replan_sentinel_is_a_noop_success() {
        let (executor, _adapter) = executor(Arc::new(ZoneRegistry::new()));
        let mut tracker = ZoneTracker::new(&Settings::default());
        let s = step("__replan__", ActionParams::KeyPress { key: "x".into() });
        let result = executor.execute(&s, &mut tracker);
        assert!(result.success);
    }

    #[test]
    fn global_key_press_dispatches_directly() {
        let (executor, adapter) = executor(Arc::new(ZoneRegistry::new()));
        let mut tracker = ZoneTracker::new(&Settings::default());
        let s = step("__global__", ActionParams::KeyPress { key: "cmd+s".into() });
        let result = executor.execute(&s, &mut tracker);
        assert!(result.success);
        assert_eq!(
            adapter.recorded_calls(),
            vec![gaze_platform::RecordedCall::KeyPress("cmd+s".into())]
        );
    }

    #[test]
    fn global_scroll_is_unsupported() {
        let (executor, _adapter) = executor(Arc::new(ZoneRegistry::new()));
        let mut tracker = ZoneTracker::new(&Settings::default());
        let s = step(
            "__global__",
            ActionParams::Scroll { x: Some(1.0), y: Some(1.0), amount: 1 },
        );
        let result = executor.execute(&s, &mut tracker);
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::UnsupportedGlobalAction));
    }

    #[test]
    fn visual_step_against_missing_zone_fails_zone_not_found() {
        let (executor, _adapter) = executor(Arc::new(ZoneRegistry::new()));
        let mut tracker = ZoneTracker::new(&Settings::default());
        let s = step(
            "z1",
            ActionParams::Click { x: None, y: None, button: MouseButton::Left },
        );
        let result = executor.execute(&s, &mut tracker);
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::ZoneNotFound));
    }

    #[test]
    fn visual_step_against_present_zone_succeeds() {
        let registry = Arc::new(ZoneRegistry::new());
        registry.register(Zone {
            id: "z1".into(),
            label: "button".into(),
            kind: ZoneKind::Button,
            state: ZoneState::Enabled,
            bounds: Rect::new(50.0, 50.0, 10.0, 10.0),
            confidence: 0.9,
            parent_id: None,
            last_seen: 0,
        });
        let (executor, _adapter) = executor(registry);
        let mut tracker = ZoneTracker::new(&Settings::default());
        let s = step(
            "z1",
            ActionParams::Click { x: None, y: None, button: MouseButton::Left },
        );
        let result = executor.execute(&s, &mut tracker);
        assert!(result.success);
    }
}
