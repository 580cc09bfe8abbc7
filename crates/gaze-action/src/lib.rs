//! Action Executor: dispatches one [`Action`] atomically through the
//! platform adapter, re-verifying zone-bearing actions against the current
//! cursor position before acting (spec.md §4.9).
#![warn(missing_docs)]

use gaze_platform::PlatformAdapter;
use gaze_protocol::{Action, ActionParams, ErrorKind, SpatialEvent};
use gaze_registry::ZoneRegistry;
use tracing::warn;

/// Outcome of [`execute`].
#[derive(Clone, Debug, PartialEq)]
pub struct ActionResult {
    /// Whether the action was dispatched and the platform adapter reported
    /// success.
    pub success: bool,
    /// Human-readable error, present iff `!success`.
    pub error: Option<String>,
    /// Structured error kind, present iff `!success`.
    pub error_kind: Option<ErrorKind>,
    /// Spatial events observed while dispatching, always empty here; the
    /// Brush Controller fills this in from the Zone Tracker.
    pub observed_events: Vec<SpatialEvent>,
}

impl ActionResult {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            error_kind: None,
            observed_events: Vec::new(),
        }
    }

    fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            error_kind: Some(kind),
            observed_events: Vec::new(),
        }
    }
}

/// Action kinds that target a zone and therefore require the arrival
/// re-verification step (spec.md §4.9).
fn is_zone_bearing(action: &Action) -> bool {
    action.target_zone_id.is_some()
        && matches!(
            action.params,
            ActionParams::Click { .. }
                | ActionParams::DoubleClick { .. }
                | ActionParams::TypeText { .. }
                | ActionParams::Scroll { .. }
                | ActionParams::Move { .. }
                | ActionParams::Drag { .. }
        )
}

/// Execute `action` against `adapter`. `cursor_pos` is the cursor position
/// observed immediately before dispatch (typically the Brush Controller's
/// post-navigation reading). For zone-bearing actions, the target zone is
/// re-read from `registry` and `cursor_pos` must lie within its bounds, or
/// the action fails with [`ErrorKind::BrushLost`] without touching the
/// platform adapter.
pub fn execute(
    adapter: &dyn PlatformAdapter,
    action: &Action,
    cursor_pos: (f64, f64),
    registry: &ZoneRegistry,
) -> ActionResult {
    if is_zone_bearing(action) {
        let zone_id = action.target_zone_id.as_deref().unwrap_or_default();
        let still_there = registry
            .get(zone_id)
            .is_some_and(|zone| zone.bounds.contains(cursor_pos.0, cursor_pos.1));
        if !still_there {
            warn!(zone_id, "action_executor_brush_lost");
            return ActionResult::failure(
                ErrorKind::BrushLost,
                format!("cursor is not within zone '{zone_id}' at dispatch time"),
            );
        }
    }

    let outcome = match &action.params {
        ActionParams::Click { x, y, button } => {
            let (px, py) = (x.unwrap_or(cursor_pos.0), y.unwrap_or(cursor_pos.1));
            adapter.click(px, py, *button)
        }
        ActionParams::DoubleClick { x, y } => {
            let (px, py) = (x.unwrap_or(cursor_pos.0), y.unwrap_or(cursor_pos.1));
            adapter.double_click(px, py)
        }
        ActionParams::TypeText { text } => adapter.type_text(text),
        ActionParams::KeyPress { key } => adapter.key_press(key),
        ActionParams::Scroll { x, y, amount } => {
            let (px, py) = (x.unwrap_or(cursor_pos.0), y.unwrap_or(cursor_pos.1));
            adapter.scroll(px, py, *amount)
        }
        ActionParams::Move { x, y } => adapter.move_cursor(*x, *y),
        ActionParams::Drag { from, to } => adapter
            .move_cursor(from.0, from.1)
            .and_then(|()| adapter.click(to.0, to.1, gaze_protocol::MouseButton::Left)),
    };

    match outcome {
        Ok(()) => ActionResult::ok(),
        Err(err) => {
            warn!(error = %err, kind = action.params.kind_name(), "action_executor_dispatch_failed");
            ActionResult::failure(ErrorKind::ActionFailed, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use gaze_platform::ScriptedPlatform;
    use gaze_protocol::{Rect, Zone, ZoneKind, ZoneState};

    use super::*;

    fn zone(id: &str, bounds: Rect) -> Zone {
        Zone {
            id: id.into(),
            label: "button".into(),
            kind: ZoneKind::Button,
            state: ZoneState::Enabled,
            bounds,
            confidence: 0.9,
            parent_id: None,
            last_seen: 0,
        }
    }

    #[test]
    fn click_outside_its_zone_fails_brush_lost() {
        let adapter = ScriptedPlatform::new((800, 600));
        let registry = ZoneRegistry::new();
        registry.register(zone("a", Rect::new(0.0, 0.0, 10.0, 10.0)));
        let action = Action::new(
            ActionParams::Click {
                x: None,
                y: None,
                button: gaze_protocol::MouseButton::Left,
            },
            Some("a".into()),
        );
        let result = execute(&adapter, &action, (500.0, 500.0), &registry);
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::BrushLost));
        assert!(adapter.recorded_calls().is_empty());
    }

    #[test]
    fn click_inside_its_zone_dispatches_and_succeeds() {
        let adapter = ScriptedPlatform::new((800, 600));
        let registry = ZoneRegistry::new();
        registry.register(zone("a", Rect::new(0.0, 0.0, 10.0, 10.0)));
        let action = Action::new(
            ActionParams::Click {
                x: None,
                y: None,
                button: gaze_protocol::MouseButton::Left,
            },
            Some("a".into()),
        );
        let result = execute(&adapter, &action, (5.0, 5.0), &registry);
        assert!(result.success);
        assert_eq!(adapter.recorded_calls().len(), 1);
    }

    #[test]
    fn global_key_press_skips_zone_verification() {
        let adapter = ScriptedPlatform::new((800, 600));
        let registry = ZoneRegistry::new();
        let action = Action::new(
            ActionParams::KeyPress { key: "enter".into() },
            None,
        );
        let result = execute(&adapter, &action, (0.0, 0.0), &registry);
        assert!(result.success);
    }

    #[test]
    fn zone_removed_before_dispatch_fails_brush_lost() {
        let adapter = ScriptedPlatform::new((800, 600));
        let registry = ZoneRegistry::new();
        registry.register(zone("a", Rect::new(0.0, 0.0, 10.0, 10.0)));
        registry.remove("a");
        let action = Action::new(
            ActionParams::Move { x: 5.0, y: 5.0 },
            Some("a".into()),
        );
        let result = execute(&adapter, &action, (5.0, 5.0), &registry);
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::BrushLost));
    }
}
