//! Shared scripted test doubles and a scenario builder used across this
//! workspace's integration-style tests, mirroring `hotki_world::mimic`
//! (in-crate scripted doubles) plus `hotki-tester` (a standalone harness
//! crate composing them) as one crate, since this workspace's doubles are
//! small enough not to need the split.
#![warn(missing_docs)]

mod planner;
mod scenario;
mod vision;

pub use gaze_platform::{RecordedCall, ScriptedPlatform};
pub use planner::ScriptedPlanner;
pub use scenario::{NoFrames, NoopRegion, Scenario, ScenarioBuilder};
pub use vision::ScriptedVision;
