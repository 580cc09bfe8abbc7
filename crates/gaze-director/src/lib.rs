//! Director: the top-level `run_task` state machine — plan, execute,
//! recapture, replan, retry, under budget (spec.md §4.14).
//!
//! Grounded on `hotki-engine`'s `lib.rs` / `hotki-server`'s long-lived
//! async service-loop-with-counters shape: one method owns the whole
//! lifecycle and threads explicit counters through it rather than hiding
//! them in shared mutable state.
#![warn(missing_docs)]

use std::{sync::Arc, time::Duration};

use gaze_mapper::CanvasMapper;
use gaze_planner::{PlanRequest, TaskPlanner, call_plan};
use gaze_protocol::{ErrorKind, Settings, TaskPlan, TaskResult, TaskStep};
use gaze_recovery::{RecoveryAction, classify};
use gaze_registry::ZoneRegistry;
use gaze_step::StepExecutor;
use gaze_tracker::ZoneTracker;
use tracing::{info, warn};

/// Owns one task attempt's budget counters and the collaborators needed to
/// plan, execute, and recover a task end to end.
pub struct Director {
    mapper: Arc<CanvasMapper>,
    registry: Arc<ZoneRegistry>,
    planner: Arc<dyn TaskPlanner>,
    step_executor: StepExecutor,
    settings: Settings,
    platform_name: String,
}

/// Running budget state for one `run_task` call.
struct Budget {
    api_calls_used: u32,
    replans_used: u32,
    plans_produced: u32,
}

impl Budget {
    fn new() -> Self {
        Self { api_calls_used: 0, replans_used: 0, plans_produced: 0 }
    }

    fn calls_remain(&self, settings: &Settings) -> bool {
        self.api_calls_used < settings.max_api_calls
    }

    fn replans_remain(&self, settings: &Settings) -> bool {
        self.replans_used < settings.max_replans
    }
}

impl Director {
    /// Build a director over an already-wired `mapper`/`registry`/
    /// `planner`/`step_executor`, tuned by `settings`.
    #[must_use]
    pub fn new(
        mapper: Arc<CanvasMapper>,
        registry: Arc<ZoneRegistry>,
        planner: Arc<dyn TaskPlanner>,
        step_executor: StepExecutor,
        settings: Settings,
        platform_name: impl Into<String>,
    ) -> Self {
        Self {
            mapper,
            registry,
            planner,
            step_executor,
            settings,
            platform_name: platform_name.into(),
        }
    }

    fn budget_exhausted(&self, completed_steps: u32, budget: &Budget, message: impl Into<String>) -> TaskResult {
        warn!(
            api_calls_used = budget.api_calls_used,
            replans_used = budget.replans_used,
            "director_budget_exhausted"
        );
        TaskResult {
            success: false,
            completed_steps,
            plans_used: budget.plans_produced,
            api_calls_used: budget.api_calls_used,
            final_error: Some((ErrorKind::BudgetExhausted, message.into())),
        }
    }

    async fn recapture(&self, budget: &mut Budget) {
        let count = self.mapper.recapture().await;
        budget.api_calls_used += 1;
        info!(zone_count = count, api_calls_used = budget.api_calls_used, "director_recapture");
    }

    async fn produce_plan(
        &self,
        task_description: &str,
        completed_step_descriptions: &[String],
        budget: &mut Budget,
    ) -> TaskPlan {
        let zones = self.registry.all();
        let plan = call_plan(
            self.planner.as_ref(),
            PlanRequest {
                task_description,
                platform_name: &self.platform_name,
                zones: &zones,
                completed_steps: completed_step_descriptions,
            },
            &self.settings,
        )
        .await;
        budget.api_calls_used += plan.api_calls_used;
        budget.plans_produced += 1;
        info!(success = plan.success, steps = plan.steps.len(), "director_plan_produced");
        plan
    }

    /// Run one task attempt to completion, budget exhaustion, or abort
    /// (spec.md §4.14's full lifecycle).
    pub async fn run_task(&self, task_description: &str) -> TaskResult {
        let mut budget = Budget::new();
        let mut completed_steps = 0u32;
        let mut completed_step_descriptions: Vec<String> = Vec::new();
        let mut tracker = ZoneTracker::new(&self.settings);

        if self.settings.step_delay_seconds > 0.0 {
            // Rendering a visible "control" signal is a platform/UI concern
            // the core does not implement, the same treatment as
            // `Settings::recording_enabled`.
            info!("director_signal_control_to_user");
        }

        if !budget.calls_remain(&self.settings) {
            return self.budget_exhausted(completed_steps, &budget, "no API call budget for the initial plan");
        }
        let mut plan = self.produce_plan(task_description, &completed_step_descriptions, &mut budget).await;
        if !plan.success || plan.steps.is_empty() {
            return TaskResult {
                success: false,
                completed_steps,
                plans_used: budget.plans_produced,
                api_calls_used: budget.api_calls_used,
                final_error: Some((
                    ErrorKind::PlanInvalid,
                    plan.error.unwrap_or_else(|| "planner produced no usable plan".to_string()),
                )),
            };
        }

        let mut step_index = 0usize;
        let mut step_retries_used = 0u32;

        loop {
            let Some(step) = plan.steps.get(step_index).cloned() else {
                return TaskResult {
                    success: true,
                    completed_steps,
                    plans_used: budget.plans_produced,
                    api_calls_used: budget.api_calls_used,
                    final_error: None,
                };
            };

            if step.is_replan() {
                if !budget.replans_remain(&self.settings) {
                    return self.budget_exhausted(completed_steps, &budget, "replan budget exhausted");
                }
                if !budget.calls_remain(&self.settings) {
                    return self.budget_exhausted(completed_steps, &budget, "no API call budget for a replan");
                }
                self.recapture(&mut budget).await;
                if !budget.calls_remain(&self.settings) {
                    return self.budget_exhausted(completed_steps, &budget, "no API call budget for a replan");
                }
                let new_plan = self
                    .produce_plan(task_description, &completed_step_descriptions, &mut budget)
                    .await;
                if !new_plan.success || new_plan.steps.is_empty() {
                    return TaskResult {
                        success: false,
                        completed_steps,
                        plans_used: budget.plans_produced,
                        api_calls_used: budget.api_calls_used,
                        final_error: Some((
                            ErrorKind::PlanInvalid,
                            new_plan.error.unwrap_or_else(|| "replan produced no usable plan".to_string()),
                        )),
                    };
                }
                plan = new_plan;
                step_index = 0;
                step_retries_used = 0;
                budget.replans_used += 1;
                continue;
            }

            if self.settings.step_delay_seconds > 0.0 {
                tokio::time::sleep(Duration::from_secs_f64(self.settings.step_delay_seconds)).await;
            }

            let result = self.step_executor.execute(&step, &mut tracker);

            if result.success {
                completed_steps += 1;
                completed_step_descriptions.push(step.description.clone());
                if self.settings.matches_recapture_keyword(&step.expected_change) {
                    if !budget.calls_remain(&self.settings) {
                        return self.budget_exhausted(completed_steps, &budget, "no API call budget for a between-step recapture");
                    }
                    self.recapture(&mut budget).await;
                }
                step_index += 1;
                step_retries_used = 0;
                continue;
            }

            let kind = result.error_kind.unwrap_or(ErrorKind::ActionFailed);
            let recovery = classify(kind, step_retries_used, self.settings.max_step_retries);
            info!(
                step = step.step_number,
                error_kind = %kind,
                action = ?recovery.action,
                "director_step_failed"
            );

            match recovery.action {
                RecoveryAction::Retry => {
                    step_retries_used += 1;
                }
                RecoveryAction::Reanalyze => {
                    if !budget.calls_remain(&self.settings) {
                        return self.budget_exhausted(completed_steps, &budget, "no API call budget for a reanalyze recapture");
                    }
                    self.recapture(&mut budget).await;
                    step_retries_used += 1;
                }
                RecoveryAction::Replan => {
                    if !budget.replans_remain(&self.settings) {
                        return self.budget_exhausted(completed_steps, &budget, "replan budget exhausted");
                    }
                    if recovery.reanalyze_canvas {
                        if !budget.calls_remain(&self.settings) {
                            return self.budget_exhausted(completed_steps, &budget, "no API call budget for a replan recapture");
                        }
                        self.recapture(&mut budget).await;
                    }
                    if !budget.calls_remain(&self.settings) {
                        return self.budget_exhausted(completed_steps, &budget, "no API call budget for a replan");
                    }
                    let new_plan = self
                        .produce_plan(task_description, &completed_step_descriptions, &mut budget)
                        .await;
                    if !new_plan.success || new_plan.steps.is_empty() {
                        return TaskResult {
                            success: false,
                            completed_steps,
                            plans_used: budget.plans_produced,
                            api_calls_used: budget.api_calls_used,
                            final_error: Some((
                                ErrorKind::PlanInvalid,
                                new_plan.error.unwrap_or_else(|| "replan produced no usable plan".to_string()),
                            )),
                        };
                    }
                    plan = new_plan;
                    step_index = 0;
                    step_retries_used = 0;
                    budget.replans_used += 1;
                }
                RecoveryAction::Skip => {
                    step_index += 1;
                    step_retries_used = 0;
                }
                RecoveryAction::Abort => {
                    return TaskResult {
                        success: false,
                        completed_steps,
                        plans_used: budget.plans_produced,
                        api_calls_used: budget.api_calls_used,
                        final_error: Some((kind, result.error.unwrap_or_else(|| "step aborted".to_string()))),
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use gaze_brush::BrushController;
    use gaze_planner::{PlanResponse, PlannerError};
    use gaze_platform::ScriptedPlatform;
    use gaze_protocol::{ActionParams, Frame, MouseButton, Rect, Settings, Zone, ZoneKind, ZoneState};
    use gaze_region::{LocalVision, RegionError};
    use gaze_vision::{VisionBackend, VisionError, VisionRequest, VisionResponse};
    use parking_lot::Mutex;

    use super::*;

    struct NoopRegion;
    impl LocalVision for NoopRegion {
        fn detect(&self, _frame: &Frame, _bbox: &Rect) -> Result<Vec<Zone>, RegionError> {
            Ok(Vec::new())
        }
    }

    struct NoopVision;
    #[async_trait]
    impl VisionBackend for NoopVision {
        async fn analyze(&self, _request: VisionRequest<'_>) -> Result<VisionResponse, VisionError> {
            Ok(VisionResponse::default())
        }
    }

    struct NoFrames;
    impl gaze_mapper::FrameSource for NoFrames {
        fn capture_now(&self) -> Option<Frame> {
            None
        }
    }

    struct ScriptedPlanner {
        responses: Mutex<Vec<Result<PlanResponse, PlannerError>>>,
        recorded_completed_steps: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl TaskPlanner for ScriptedPlanner {
        async fn plan(&self, request: PlanRequest<'_>) -> Result<PlanResponse, PlannerError> {
            self.recorded_completed_steps.lock().push(request.completed_steps.to_vec());
            self.responses.lock().remove(0)
        }
    }

    fn zone(id: &str) -> Zone {
        Zone {
            id: id.into(),
            label: "button".into(),
            kind: ZoneKind::Button,
            state: ZoneState::Enabled,
            bounds: Rect::new(50.0, 50.0, 10.0, 10.0),
            confidence: 0.9,
            parent_id: None,
            last_seen: 0,
        }
    }

    fn click_step(n: u32, zone_id: &str, description: &str) -> TaskStep {
        TaskStep {
            step_number: n,
            zone_id: zone_id.into(),
            zone_label: "button".into(),
            action: ActionParams::Click { x: None, y: None, button: MouseButton::Left },
            expected_change: String::new(),
            description: description.into(),
        }
    }

    fn replan_step(n: u32) -> TaskStep {
        TaskStep {
            step_number: n,
            zone_id: gaze_protocol::REPLAN_ZONE_ID.to_string(),
            zone_label: String::new(),
            action: ActionParams::KeyPress { key: "noop".into() },
            expected_change: String::new(),
            description: String::new(),
        }
    }

    fn director(planner: Arc<ScriptedPlanner>, registry: Arc<ZoneRegistry>, settings: Settings) -> Director {
        let adapter = Arc::new(ScriptedPlatform::new((800, 600)));
        let brush = BrushController::new(adapter.clone(), registry.clone(), settings.clone());
        let step_executor = StepExecutor::new(adapter, brush);
        let mapper = Arc::new(CanvasMapper::new(
            Box::new(NoopRegion),
            Arc::new(NoopVision),
            registry.clone(),
            Arc::new(NoFrames),
            settings.clone(),
        ));
        Director::new(mapper, registry, planner, step_executor, settings, "macos")
    }

    #[tokio::test]
    async fn a_two_step_plan_completes_successfully() {
        let registry = Arc::new(ZoneRegistry::new());
        registry.register(zone("a"));
        registry.register(zone("b"));
        let planner = Arc::new(ScriptedPlanner {
            responses: Mutex::new(vec![Ok(PlanResponse {
                steps: vec![click_step(1, "a", "click a"), click_step(2, "b", "click b")],
                raw_response: "[...]".into(),
            })]),
            recorded_completed_steps: Mutex::new(Vec::new()),
        });
        let mut settings = Settings::default();
        settings.step_delay_seconds = 0.0;
        let d = director(planner, registry, settings);
        let result = d.run_task("click a then b").await;
        assert!(result.success);
        assert_eq!(result.completed_steps, 2);
        assert_eq!(result.plans_used, 1);
        assert!(result.final_error.is_none());
    }

    #[tokio::test]
    async fn zero_remaining_budget_aborts_before_the_initial_plan() {
        let registry = Arc::new(ZoneRegistry::new());
        let planner = Arc::new(ScriptedPlanner {
            responses: Mutex::new(Vec::new()),
            recorded_completed_steps: Mutex::new(Vec::new()),
        });
        let mut settings = Settings::default();
        settings.max_api_calls = 0;
        let d = director(planner, registry, settings);
        let result = d.run_task("anything").await;
        assert!(!result.success);
        assert_eq!(result.final_error.unwrap().0, ErrorKind::BudgetExhausted);
    }

    #[tokio::test]
    async fn a_missing_zone_target_reports_plan_invalid_via_zone_not_found_abort() {
        let registry = Arc::new(ZoneRegistry::new());
        let planner = Arc::new(ScriptedPlanner {
            responses: Mutex::new(vec![Ok(PlanResponse {
                steps: vec![click_step(1, "missing", "click missing")],
                raw_response: "[...]".into(),
            })]),
            recorded_completed_steps: Mutex::new(Vec::new()),
        });
        let mut settings = Settings::default();
        settings.step_delay_seconds = 0.0;
        settings.max_step_retries = 0;
        settings.max_replans = 0;
        let d = director(planner, registry, settings);
        let result = d.run_task("click a missing zone").await;
        assert!(!result.success);
        assert_eq!(result.final_error.unwrap().0, ErrorKind::ZoneNotFound);
    }

    #[tokio::test]
    async fn a_replan_sentinel_recaptures_and_supplies_completed_step_history() {
        let registry = Arc::new(ZoneRegistry::new());
        registry.register(zone("a"));
        registry.register(zone("b"));
        let planner = Arc::new(ScriptedPlanner {
            responses: Mutex::new(vec![
                Ok(PlanResponse {
                    steps: vec![click_step(1, "a", "click a"), replan_step(2)],
                    raw_response: "[...]".into(),
                }),
                Ok(PlanResponse {
                    steps: vec![click_step(1, "b", "click b")],
                    raw_response: "[...]".into(),
                }),
            ]),
            recorded_completed_steps: Mutex::new(Vec::new()),
        });
        let mut settings = Settings::default();
        settings.step_delay_seconds = 0.0;
        let d = director(planner.clone(), registry, settings);
        let result = d.run_task("do two things").await;
        assert!(result.success);
        assert_eq!(result.completed_steps, 2);
        assert_eq!(result.plans_used, 2);

        let recorded = planner.recorded_completed_steps.lock().clone();
        assert_eq!(recorded[0], Vec::<String>::new());
        assert_eq!(recorded[1], vec!["click a".to_string()]);
    }
}
