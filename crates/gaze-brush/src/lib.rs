//! Brush Controller: composes the Motion Planner, platform adapter, Zone
//! Tracker, and Action Executor for one zone-targeted step (spec.md §4.10).
#![warn(missing_docs)]

use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use gaze_action::ActionResult;
use gaze_motion::TrajectoryKind;
use gaze_platform::PlatformAdapter;
use gaze_protocol::{Action, Settings, SpatialEvent};
use gaze_registry::ZoneRegistry;
use gaze_tracker::ZoneTracker;
use tracing::warn;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// How navigation to the target zone concluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The cursor arrived and the tracker confirms the target zone is
    /// current.
    Arrived,
    /// The target zone was not present in the registry (spec.md §4.10,
    /// step 1).
    ZoneNotFound,
    /// The cursor arrived at the planned aim point, but the tracker's
    /// current zone is not the target (spec.md §4.10, step 4).
    BrushLost,
}

/// Combined navigation and dispatch outcome for one brush-controlled step.
#[derive(Clone, Debug, PartialEq)]
pub struct BrushActionResult {
    /// How navigation concluded.
    pub navigation: NavigationOutcome,
    /// Spatial events the tracker emitted while driving the trajectory.
    pub events: Vec<SpatialEvent>,
    /// Action Executor outcome; absent when navigation failed before
    /// dispatch was attempted.
    pub action: Option<ActionResult>,
}

/// Composes the collaborators needed to bring a cursor to a zone and act on
/// it, one step at a time. Constructed once per agent and shared across
/// steps (constructor injection, no hidden global state).
pub struct BrushController {
    adapter: Arc<dyn PlatformAdapter>,
    registry: Arc<ZoneRegistry>,
    settings: Settings,
}

impl BrushController {
    /// Build a controller over `adapter` and `registry`, tuned by `settings`.
    #[must_use]
    pub fn new(adapter: Arc<dyn PlatformAdapter>, registry: Arc<ZoneRegistry>, settings: Settings) -> Self {
        Self {
            adapter,
            registry,
            settings,
        }
    }

    /// Navigate to `zone_id` and then dispatch `action`, sampling `tracker`
    /// along the way. `action.target_zone_id` is expected to equal
    /// `zone_id`; callers construct `action` accordingly.
    pub fn execute(
        &self,
        zone_id: &str,
        trajectory_kind: TrajectoryKind,
        tracker: &mut ZoneTracker,
        action: &Action,
    ) -> BrushActionResult {
        let Some(zone) = self.registry.get(zone_id) else {
            warn!(zone_id, "brush_controller_zone_not_found");
            return BrushActionResult {
                navigation: NavigationOutcome::ZoneNotFound,
                events: Vec::new(),
                action: None,
            };
        };

        let from = self
            .adapter
            .get_cursor_pos()
            .unwrap_or((0.0, 0.0));
        let trajectory = gaze_motion::plan(
            from,
            zone.aim_point(),
            trajectory_kind,
            &[],
            self.settings.motion_speed_pixels_per_sec,
        );

        let mut events = Vec::new();
        let mut cursor = from;
        for point in &trajectory {
            if self.adapter.move_cursor(point.0, point.1).is_err() {
                continue;
            }
            cursor = *point;
            events.extend(tracker.sample(point.0, point.1, now_ms(), &self.registry));
        }

        if tracker.current_zone_id() != Some(zone_id) {
            warn!(zone_id, "brush_controller_brush_lost");
            return BrushActionResult {
                navigation: NavigationOutcome::BrushLost,
                events,
                action: None,
            };
        }

        let action_result = gaze_action::execute(self.adapter.as_ref(), action, cursor, &self.registry);
        BrushActionResult {
            navigation: NavigationOutcome::Arrived,
            events,
            action: Some(action_result),
        }
    }
}
