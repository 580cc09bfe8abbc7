//! Reserved zone ids that tag a [`crate::TaskStep`] as command-mode or as a
//! forced replan, rather than naming a real [`crate::Zone`].

/// Step targets the platform adapter directly; no navigation or zone
/// verification occurs.
pub const GLOBAL_ZONE_ID: &str = "__global__";

/// Step is a forced replan point; the Director intercepts it before
/// dispatch reaches the Step Executor.
pub const REPLAN_ZONE_ID: &str = "__replan__";
