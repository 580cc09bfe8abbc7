//! Region Analyzer (mid tier): local image primitives over a changed
//! sub-rectangle.
//!
//! The actual OCR/contour/template primitives are an external collaborator
//! (spec.md §1, "deliberately out of scope"); [`LocalVision`] pins the
//! interface a real implementation would fulfill, and [`StubLocalVision`]
//! is a deterministic stand-in used by tests and by any caller that has not
//! wired in a production primitive set.
#![warn(missing_docs)]

mod error;
mod stub;

pub use error::RegionError;
pub use stub::StubLocalVision;

use gaze_protocol::{Frame, Rect, Settings, Zone};
use tracing::warn;

/// Local, single-frame detection primitives (edge/contour/template/basic
/// text detection). Never touches a remote service.
pub trait LocalVision: Send + Sync {
    /// Detect candidate zones within `bbox` of `frame`. Implementations may
    /// return raw candidates without enforcing the confidence floor or the
    /// `bounds ⊆ bbox` contract; [`analyze`] enforces both.
    fn detect(&self, frame: &Frame, bbox: &Rect) -> Result<Vec<Zone>, RegionError>;
}

/// Run `primitives` over `bbox` of `frame`, enforcing the Region Analyzer
/// contract of spec.md §4.3: returned zones are clipped to `bounds ⊆
/// bbox`, zones below `min_zone_confidence` are discarded, and any
/// primitive failure yields an empty list rather than propagating.
pub fn analyze(
    primitives: &dyn LocalVision,
    frame: &Frame,
    bbox: &Rect,
    settings: &Settings,
) -> Vec<Zone> {
    let candidates = match primitives.detect(frame, bbox) {
        Ok(candidates) => candidates,
        Err(err) => {
            warn!(error = %err, "region_analyzer_primitive_failed");
            return Vec::new();
        }
    };

    candidates
        .into_iter()
        .filter(|zone| bbox.contains_rect(&zone.bounds))
        .filter(|zone| zone.confidence >= settings.min_zone_confidence)
        .collect()
}
