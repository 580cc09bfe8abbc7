/// Result of one [`crate::CanvasMapper::process_frame`] or
/// [`crate::CanvasMapper::recapture`] call, reported up to the Director for
/// logging and budget bookkeeping (spec.md §4.6, §4.14).
#[derive(Clone, Debug, PartialEq)]
pub enum MapperOutcome {
    /// IDLE or CURSOR_ONLY: no registry write occurred.
    NoChange,
    /// TRANSITIONING: the frame is mid-animation; the caller should wait for
    /// the next frame rather than act on this one.
    Waiting,
    /// MINOR_UPDATE: the Region Analyzer ran over the changed bbox and
    /// registered `zones_added` zones (a count of zones passed to the
    /// registry, not necessarily all newly-created ids).
    RegionUpdated {
        /// Number of zones the Region Analyzer produced and registered.
        zones_added: usize,
    },
    /// CONTENT_CHANGE, or an explicit recapture: the Vision Analyzer
    /// succeeded with at least one zone and the registry was replaced
    /// wholesale.
    Replaced {
        /// Total zone count after the replace.
        zone_count: usize,
    },
    /// The Vision Analyzer call failed or returned an empty zone list; the
    /// registry was left untouched per the zone preservation invariant.
    Degraded {
        /// Human-readable reason, surfaced in logs and to the Director.
        reason: String,
    },
}

impl MapperOutcome {
    /// True for variants that indicate the registry was left unchanged.
    #[must_use]
    pub fn preserved_registry(&self) -> bool {
        matches!(self, Self::NoChange | Self::Waiting | Self::Degraded { .. })
    }
}
