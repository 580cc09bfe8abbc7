use async_trait::async_trait;
use gaze_planner::{PlanRequest, PlanResponse, PlannerError, TaskPlanner};
use parking_lot::Mutex;

/// A scripted [`TaskPlanner`] shared across this workspace's integration
/// tests, recording every request's `completed_steps` so a test can assert
/// the completed-step context invariant (spec.md §4.14, scenario 6).
pub struct ScriptedPlanner {
    responses: Mutex<Vec<Result<PlanResponse, PlannerError>>>,
    recorded_completed_steps: Mutex<Vec<Vec<String>>>,
}

impl ScriptedPlanner {
    /// Build a planner double that replies with `responses` in order.
    #[must_use]
    pub fn new(responses: Vec<Result<PlanResponse, PlannerError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            recorded_completed_steps: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the `completed_steps` list supplied on every call so
    /// far, in order.
    #[must_use]
    pub fn recorded_completed_steps(&self) -> Vec<Vec<String>> {
        self.recorded_completed_steps.lock().clone()
    }
}

#[async_trait]
impl TaskPlanner for ScriptedPlanner {
    async fn plan(&self, request: PlanRequest<'_>) -> Result<PlanResponse, PlannerError> {
        self.recorded_completed_steps.lock().push(request.completed_steps.to_vec());
        let mut guard = self.responses.lock();
        if guard.is_empty() {
            Err(PlannerError::Network("scripted planner scenario exhausted".to_string()))
        } else {
            guard.remove(0)
        }
    }
}
