//! Task Planner (external contract): a single call to a remote text LLM
//! that turns `(task_description, zones, completed_steps, platform_name)`
//! into an ordered [`gaze_protocol::TaskPlan`] (spec.md §4.12, §6).
//!
//! [`TaskPlanner`] pins the wire contract; [`call_plan`] is the logic this
//! crate owns on top of it: single-attempt timeout handling, empty-plan
//! detection, and the mechanically checkable half of the planner's
//! contractual rules.
#![warn(missing_docs)]

mod backend;
mod call;
mod error;
mod validate;

pub use backend::{PlanRequest, PlanResponse, TaskPlanner};
pub use call::call_plan;
pub use error::PlannerError;
pub use validate::validate;
