//! Zone Tracker: turns raw cursor samples into ENTER/EXIT/HOVER
//! [`SpatialEvent`]s against the [`ZoneRegistry`] (spec.md §4.7).
//!
//! Grounded on `mac-focus-watcher`'s current-item-plus-notification shape:
//! the tracker holds exactly one "current" item and emits a transition only
//! when that item changes, never acting on its own output.
#![warn(missing_docs)]

use gaze_protocol::{Settings, SpatialEvent, SpatialEventKind};
use gaze_registry::ZoneRegistry;
use tracing::trace;

struct Current {
    zone_id: String,
    entered_at_ms: u64,
    hover_emitted: bool,
}

/// Stateful dwell tracker. One instance follows one cursor stream.
pub struct ZoneTracker {
    settings: Settings,
    current: Option<Current>,
}

impl ZoneTracker {
    /// Build a tracker with no current zone.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            settings: settings.clone(),
            current: None,
        }
    }

    /// Feed one cursor sample `(x, y, t)`, returning the events it produced
    /// in the order they occurred: at most one EXIT (either because the
    /// cursor left the current zone or because the current zone vanished
    /// from the registry mid-dwell), then at most one ENTER, then at most
    /// one HOVER.
    pub fn sample(&mut self, x: f64, y: f64, t: u64, registry: &ZoneRegistry) -> Vec<SpatialEvent> {
        let mut events = Vec::new();

        if let Some(cur) = &self.current {
            let still_inside = registry
                .get(&cur.zone_id)
                .is_some_and(|z| z.bounds.contains(x, y));
            if !still_inside {
                trace!(zone_id = %cur.zone_id, "zone_tracker_exit");
                events.push(SpatialEvent {
                    kind: SpatialEventKind::Exit,
                    zone_id: cur.zone_id.clone(),
                    position: (x, y),
                    timestamp_ms: t,
                    dwell_ms: None,
                });
                self.current = None;
            }
        }

        if self.current.is_none()
            && let Some(zone) = registry.find_at_point(x, y)
        {
            trace!(zone_id = %zone.id, "zone_tracker_enter");
            events.push(SpatialEvent {
                kind: SpatialEventKind::Enter,
                zone_id: zone.id.clone(),
                position: (x, y),
                timestamp_ms: t,
                dwell_ms: None,
            });
            self.current = Some(Current {
                zone_id: zone.id,
                entered_at_ms: t,
                hover_emitted: false,
            });
        }

        if let Some(cur) = &mut self.current {
            let dwell = t.saturating_sub(cur.entered_at_ms);
            if dwell >= self.settings.hover_threshold_ms && !cur.hover_emitted {
                cur.hover_emitted = true;
                events.push(SpatialEvent {
                    kind: SpatialEventKind::Hover,
                    zone_id: cur.zone_id.clone(),
                    position: (x, y),
                    timestamp_ms: t,
                    dwell_ms: Some(dwell),
                });
            }
        }

        events
    }

    /// The zone id the cursor is currently considered inside, if any.
    #[must_use]
    pub fn current_zone_id(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.zone_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use gaze_protocol::{Rect, Zone, ZoneKind, ZoneState};

    use super::*;

    fn zone(id: &str, bounds: Rect, confidence: f64) -> Zone {
        Zone {
            id: id.into(),
            label: format!("label-{id}"),
            kind: ZoneKind::Button,
            state: ZoneState::Enabled,
            bounds,
            confidence,
            parent_id: None,
            last_seen: 0,
        }
    }

    #[test]
    fn enter_then_exit_on_leaving_the_zone() {
        let registry = ZoneRegistry::new();
        registry.register(zone("a", Rect::new(0.0, 0.0, 10.0, 10.0), 0.9));
        let settings = Settings::default();
        let mut tracker = ZoneTracker::new(&settings);

        let enter = tracker.sample(5.0, 5.0, 0, &registry);
        assert_eq!(enter.len(), 1);
        assert_eq!(enter[0].kind, SpatialEventKind::Enter);
        assert_eq!(enter[0].zone_id, "a");

        let exit = tracker.sample(50.0, 50.0, 10, &registry);
        assert_eq!(exit.len(), 1);
        assert_eq!(exit[0].kind, SpatialEventKind::Exit);
        assert!(tracker.current_zone_id().is_none());
    }

    #[test]
    fn hover_fires_once_after_dwell_threshold() {
        let registry = ZoneRegistry::new();
        registry.register(zone("a", Rect::new(0.0, 0.0, 10.0, 10.0), 0.9));
        let mut settings = Settings::default();
        settings.hover_threshold_ms = 100;
        let mut tracker = ZoneTracker::new(&settings);

        tracker.sample(5.0, 5.0, 0, &registry);
        let still_waiting = tracker.sample(5.0, 5.0, 50, &registry);
        assert!(still_waiting.is_empty());

        let hover = tracker.sample(5.0, 5.0, 150, &registry);
        assert_eq!(hover.len(), 1);
        assert_eq!(hover[0].kind, SpatialEventKind::Hover);
        assert_eq!(hover[0].dwell_ms, Some(150));

        let no_repeat = tracker.sample(5.0, 5.0, 200, &registry);
        assert!(no_repeat.is_empty());
    }

    #[test]
    fn zone_disappearing_mid_dwell_emits_immediate_exit() {
        let registry = ZoneRegistry::new();
        registry.register(zone("a", Rect::new(0.0, 0.0, 10.0, 10.0), 0.9));
        let settings = Settings::default();
        let mut tracker = ZoneTracker::new(&settings);

        tracker.sample(5.0, 5.0, 0, &registry);
        registry.remove("a");
        let events = tracker.sample(5.0, 5.0, 10, &registry);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, SpatialEventKind::Exit);
    }

    #[test]
    fn tie_break_prefers_smallest_then_confidence() {
        let registry = ZoneRegistry::new();
        registry.register(zone("big", Rect::new(0.0, 0.0, 100.0, 100.0), 0.9));
        registry.register(zone("small", Rect::new(0.0, 0.0, 10.0, 10.0), 0.1));
        let settings = Settings::default();
        let mut tracker = ZoneTracker::new(&settings);

        let events = tracker.sample(5.0, 5.0, 0, &registry);
        assert_eq!(events[0].zone_id, "small");
    }
}
