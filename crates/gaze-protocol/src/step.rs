use serde::{Deserialize, Serialize};

use crate::{
    action::ActionParams,
    sentinels::{GLOBAL_ZONE_ID, REPLAN_ZONE_ID},
};

/// One step of a [`crate::TaskPlan`], as produced by the external task
/// planner.
///
/// `zone_id` is either a real [`crate::Zone`] id, or one of the two
/// sentinel values [`GLOBAL_ZONE_ID`] / [`REPLAN_ZONE_ID`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskStep {
    /// 1-based position within the plan.
    pub step_number: u32,
    /// Real zone id, or a reserved sentinel.
    pub zone_id: String,
    /// Human-readable label the planner believed the zone carried.
    pub zone_label: String,
    /// Action kind and parameters.
    pub action: ActionParams,
    /// Free text describing the UI transition this step is expected to
    /// cause; matched against the recapture keyword list.
    pub expected_change: String,
    /// Free text description, used verbatim in completed-step context.
    pub description: String,
}

impl TaskStep {
    /// True for a `__global__` (command-mode) step.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.zone_id == GLOBAL_ZONE_ID
    }

    /// True for a `__replan__` sentinel step.
    #[must_use]
    pub fn is_replan(&self) -> bool {
        self.zone_id == REPLAN_ZONE_ID
    }

    /// True for a step that targets a real zone and must be navigated to.
    #[must_use]
    pub fn is_visual(&self) -> bool {
        !self.is_global() && !self.is_replan()
    }
}
