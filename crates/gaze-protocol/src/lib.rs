//! Shared data model for the gaze agent workspace.
//!
//! Every crate in the workspace exchanges the plain data carriers defined
//! here rather than reaching into one another's internals: [`Frame`],
//! [`Zone`], [`SpatialEvent`], [`Action`], [`TaskStep`]/[`TaskPlan`],
//! [`StepResult`]/[`TaskResult`], the shared [`ErrorKind`] taxonomy, and the
//! immutable [`Settings`] value.
#![warn(missing_docs)]

mod action;
mod error;
mod event;
mod frame;
mod plan;
mod rect;
mod result;
mod sentinels;
mod settings;
mod step;
mod zone;

pub use action::{Action, ActionParams, ActionStatus, MouseButton};
pub use error::ErrorKind;
pub use event::{SpatialEvent, SpatialEventKind};
pub use frame::Frame;
pub use plan::TaskPlan;
pub use rect::Rect;
pub use result::{StepResult, TaskResult};
pub use sentinels::{GLOBAL_ZONE_ID, REPLAN_ZONE_ID};
pub use settings::Settings;
pub use step::TaskStep;
pub use zone::{Zone, ZoneKind, ZoneState};
