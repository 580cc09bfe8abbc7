use serde::{Deserialize, Serialize};

/// Kind of transition the Zone Tracker observed between cursor samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialEventKind {
    /// The cursor entered a zone it was not previously inside.
    Enter,
    /// The cursor left the zone it was previously inside.
    Exit,
    /// The cursor has dwelt inside a zone for at least the hover threshold.
    Hover,
}

/// A single cursor-to-zone transition, published by the Zone Tracker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatialEvent {
    /// Kind of transition.
    pub kind: SpatialEventKind,
    /// Zone the event pertains to.
    pub zone_id: String,
    /// Cursor position at the moment of the event.
    pub position: (f64, f64),
    /// Monotonic timestamp (milliseconds).
    pub timestamp_ms: u64,
    /// Dwell duration in milliseconds; only meaningful for `Hover`.
    pub dwell_ms: Option<u64>,
}
