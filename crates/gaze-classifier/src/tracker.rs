use gaze_protocol::{Frame, Settings};

use crate::pair::{Classification, PairOutcome, classify_pair};

/// Stateful wrapper around [`classify_pair`] that adds the TRANSITIONING
/// debounce of spec.md §4.2: a run of consecutive MINOR/CONTENT diffs
/// younger than `stability_wait_ms` is reported as TRANSITIONING so the
/// Canvas Mapper waits for the screen to settle before acting.
pub struct ChangeClassifier {
    settings: Settings,
    transition_started_ms: Option<u64>,
}

impl ChangeClassifier {
    /// Build a classifier bound to `settings` (cloned in; `Settings` is
    /// cheap and immutable).
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            settings: settings.clone(),
            transition_started_ms: None,
        }
    }

    /// Classify the pair `(prev, curr)`, folding in debounce state from
    /// prior calls on this instance.
    pub fn classify(&mut self, prev: &Frame, curr: &Frame) -> PairOutcome {
        let raw = classify_pair(prev, curr, &self.settings);
        match raw.classification {
            Classification::Idle | Classification::CursorOnly => {
                self.transition_started_ms = None;
                raw
            }
            Classification::MinorUpdate | Classification::ContentChange => {
                let started = *self
                    .transition_started_ms
                    .get_or_insert(curr.timestamp_ms);
                let elapsed = curr.timestamp_ms.saturating_sub(started);
                if elapsed < self.settings.stability_wait_ms {
                    PairOutcome {
                        classification: Classification::Transitioning,
                        ..raw
                    }
                } else {
                    self.transition_started_ms = None;
                    raw
                }
            }
            Classification::Transitioning => raw,
        }
    }
}
