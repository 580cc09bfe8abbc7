use gaze_protocol::Zone;

/// Outcome of a (possibly retried) vision analyzer call.
#[derive(Clone, Debug, Default)]
pub struct VisionOutcome {
    /// Zones returned; empty both on transport failure and on a
    /// parse-success-empty response — use [`VisionOutcome::success`] plus
    /// emptiness to tell the two apart.
    pub zones: Vec<Zone>,
    /// Raw response text from the last attempt, kept for diagnostics.
    pub raw_response: String,
    /// Wall-clock latency across all attempts, in milliseconds.
    pub latency_ms: u64,
    /// Tokens consumed by the last successful attempt.
    pub token_count: u32,
    /// Whether the call transport-succeeded and parsed.
    pub success: bool,
    /// Failure description, present iff `!success`.
    pub error: Option<String>,
}

impl VisionOutcome {
    /// True for the "parse-success, empty zones" case the Canvas Mapper's
    /// preservation rule must distinguish from a transport failure.
    #[must_use]
    pub fn is_parse_success_empty(&self) -> bool {
        self.success && self.zones.is_empty()
    }

    /// True when the call should cause the registry to be replaced
    /// wholesale: a successful call with at least one zone.
    #[must_use]
    pub fn should_replace_registry(&self) -> bool {
        self.success && !self.zones.is_empty()
    }
}
