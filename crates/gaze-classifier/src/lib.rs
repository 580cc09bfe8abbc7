//! Change Classifier: a deterministic frame-diff tiering decision.
//!
//! [`classify_pair`] is the pure, stateless core (the round-trip law of
//! spec.md §8: `classify(A, B) == classify(A, B)`). [`ChangeClassifier`]
//! layers the stateful TRANSITIONING debounce (spec.md §4.2) on top, since
//! that classification depends on what has been observed across more than
//! one frame pair.
#![warn(missing_docs)]

mod pair;
mod tracker;

pub use pair::{Classification, PairOutcome, classify_pair};
pub use tracker::ChangeClassifier;
