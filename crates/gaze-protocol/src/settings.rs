use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while round-tripping [`Settings`] through a dict-like
/// representation.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The supplied JSON value failed to deserialize into `Settings`.
    #[error("invalid settings value: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Agent-wide configuration. Constructed once at build time and shared by
/// read-only reference thereafter; never mutated in place.
///
/// Unknown keys encountered during [`Settings::from_dict`] are silently
/// ignored for forward compatibility (spec.md §6); this is implemented via
/// per-field defaults rather than a top-level `deny_unknown_fields`, the
/// inverse of the wire-strictness style elsewhere in this workspace (see
/// DESIGN.md).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Target capture rate in frames per second.
    pub target_fps: u32,
    /// Ceiling capture rate when demand spikes.
    pub max_fps: u32,
    /// Ring-buffer depth in seconds; buffer capacity is `target_fps *
    /// buffer_seconds`.
    pub buffer_seconds: u32,
    /// Changed-pixel fraction (percent) below which a frame pair is IDLE.
    pub diff_threshold_percent: f64,
    /// Changed-pixel fraction (percent) at/above which a frame pair is a
    /// CONTENT_CHANGE.
    pub tier2_threshold_percent: f64,
    /// Changed-bbox area ceiling, in square logical pixels, under which a
    /// cursor-centered change classifies as CURSOR_ONLY rather than
    /// MINOR_UPDATE (spec.md §4.2; not individually tuned in the
    /// documented settings table, so exposed here with a conservative
    /// default rather than hard-coded).
    pub cursor_diff_area_ceiling: f64,
    /// Debounce window for the TRANSITIONING classification, milliseconds.
    pub stability_wait_ms: u64,
    /// Minimum confidence the Region Analyzer must report to keep a zone.
    pub min_zone_confidence: f64,
    /// Age, in seconds, after which an unrefreshed zone is considered
    /// stale and evicted.
    pub zone_expiry_seconds: u64,
    /// Dwell duration, in milliseconds, required to emit a HOVER event.
    pub hover_threshold_ms: u64,
    /// Cursor trajectory pacing ceiling, in pixels per second.
    pub motion_speed_pixels_per_sec: f64,
    /// Pause between plan steps, in seconds; `0` disables both the pause
    /// and the startup signal circle.
    pub step_delay_seconds: f64,
    /// Per-call deadline for the Vision Analyzer, in seconds.
    pub api_timeout_vision_seconds: u64,
    /// Per-call deadline for the Task Planner, in seconds.
    pub api_timeout_text_seconds: u64,
    /// Maximum retry attempts for a transient API failure.
    pub api_max_retries: u32,
    /// Base seconds for exponential retry backoff.
    pub api_backoff_base_seconds: f64,
    /// Whether session recording is enabled (external concern; the core
    /// does not implement recording itself).
    pub recording_enabled: bool,
    /// Directory recordings would be written to, when enabled.
    pub session_dir: String,
    /// Maximum combined planner + vision API calls per task attempt.
    pub max_api_calls: u32,
    /// Maximum replans per task attempt.
    pub max_replans: u32,
    /// Maximum retries for a single step before escalating recovery.
    pub max_step_retries: u32,
    /// Case-insensitive substrings of `expected_change` that trigger a
    /// between-step recapture (spec.md §9 open question (b): configurable
    /// rather than hard-coded).
    pub recapture_keywords: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_fps: 15,
            max_fps: 30,
            buffer_seconds: 5,
            diff_threshold_percent: 0.5,
            tier2_threshold_percent: 30.0,
            cursor_diff_area_ceiling: 2_500.0,
            stability_wait_ms: 250,
            min_zone_confidence: 0.4,
            zone_expiry_seconds: 60,
            hover_threshold_ms: 500,
            motion_speed_pixels_per_sec: 1500.0,
            step_delay_seconds: 2.0,
            api_timeout_vision_seconds: 60,
            api_timeout_text_seconds: 30,
            api_max_retries: 3,
            api_backoff_base_seconds: 2.0,
            recording_enabled: false,
            session_dir: String::new(),
            max_api_calls: 30,
            max_replans: 5,
            max_step_retries: 3,
            recapture_keywords: default_recapture_keywords(),
        }
    }
}

/// Default recapture keyword set (spec.md §6).
fn default_recapture_keywords() -> Vec<String> {
    [
        "window",
        "dialog",
        "open",
        "launch",
        "appear",
        "application",
        "menu",
        "save as",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

impl Settings {
    /// Ring-buffer capacity implied by `target_fps` and `buffer_seconds`.
    #[must_use]
    pub fn ring_capacity(&self) -> usize {
        (self.target_fps as usize) * (self.buffer_seconds as usize)
    }

    /// True when `expected_change` matches a recapture keyword
    /// (case-insensitive substring).
    #[must_use]
    pub fn matches_recapture_keyword(&self, expected_change: &str) -> bool {
        let lower = expected_change.to_lowercase();
        self.recapture_keywords
            .iter()
            .any(|kw| lower.contains(&kw.to_lowercase()))
    }

    /// Serialize to a JSON-object dict representation.
    #[must_use]
    pub fn to_dict(&self) -> Value {
        serde_json::to_value(self).expect("Settings always serializes")
    }

    /// Deserialize from a dict representation, ignoring unknown keys and
    /// filling missing ones with defaults.
    pub fn from_dict(value: Value) -> Result<Self, SettingsError> {
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_dict() {
        let s = Settings::default();
        let round_tripped = Settings::from_dict(s.to_dict()).unwrap();
        assert_eq!(s, round_tripped);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut dict = Settings::default().to_dict();
        dict.as_object_mut()
            .unwrap()
            .insert("totally_unknown_key".into(), Value::Bool(true));
        let parsed = Settings::from_dict(dict).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn missing_keys_fill_in_defaults() {
        let parsed = Settings::from_dict(serde_json::json!({ "target_fps": 24 })).unwrap();
        assert_eq!(parsed.target_fps, 24);
        assert_eq!(parsed.max_fps, Settings::default().max_fps);
    }

    #[test]
    fn recapture_keyword_match_is_case_insensitive_substring() {
        let s = Settings::default();
        assert!(s.matches_recapture_keyword("A New Window Appeared"));
        assert!(!s.matches_recapture_keyword("text was typed"));
    }
}
