//! Canvas Mapper: routes each captured frame through the Change Classifier,
//! Region Analyzer, and Vision Analyzer tiers into the Zone Registry,
//! per spec.md §4.6.
#![warn(missing_docs)]

mod outcome;

pub use outcome::MapperOutcome;

use std::sync::Arc;

use gaze_classifier::{ChangeClassifier, Classification};
use gaze_protocol::{Frame, Rect, Settings};
use gaze_region::LocalVision;
use gaze_registry::ZoneRegistry;
use gaze_vision::{VisionBackend, VisionRequest, call_with_retry, encode_frame};
use parking_lot::Mutex;
use tracing::{info, warn};

/// Supplies the frame [`CanvasMapper::recapture`] needs on demand, since
/// spec.md §4.6 defines `recapture()` as a zero-argument call. The facade
/// crate implements this over the platform adapter / capture loop; tests
/// implement it over a scripted frame.
pub trait FrameSource: Send + Sync {
    /// Capture (or otherwise obtain) the current frame, if possible.
    fn capture_now(&self) -> Option<Frame>;
}

/// Orchestrates the tiered perception pipeline against one [`ZoneRegistry`].
pub struct CanvasMapper {
    classifier: Mutex<ChangeClassifier>,
    region: Box<dyn LocalVision>,
    vision: Arc<dyn VisionBackend>,
    registry: Arc<ZoneRegistry>,
    frame_source: Arc<dyn FrameSource>,
    settings: Settings,
}

impl CanvasMapper {
    /// Build a mapper bound to `registry`, using `region` and `vision` as
    /// the mid- and top-tier analyzers, and `frame_source` to obtain a
    /// fresh frame for [`CanvasMapper::recapture`].
    #[must_use]
    pub fn new(
        region: Box<dyn LocalVision>,
        vision: Arc<dyn VisionBackend>,
        registry: Arc<ZoneRegistry>,
        frame_source: Arc<dyn FrameSource>,
        settings: Settings,
    ) -> Self {
        Self {
            classifier: Mutex::new(ChangeClassifier::new(&settings)),
            region,
            vision,
            registry,
            frame_source,
            settings,
        }
    }

    /// Process one captured frame against the (optional) previous one.
    ///
    /// Implements spec.md §4.6's algorithm exactly: no `previous_frame`
    /// forces a CONTENT_CHANGE classification; IDLE/CURSOR_ONLY make no
    /// registry writes; TRANSITIONING defers to the next frame;
    /// MINOR_UPDATE runs the Region Analyzer and registers its zones;
    /// CONTENT_CHANGE escalates to the Vision Analyzer and either replaces
    /// the registry or preserves it, per the zone preservation invariant.
    pub async fn process_frame(&self, frame: &Frame, previous_frame: Option<&Frame>) -> MapperOutcome {
        let Some(previous) = previous_frame else {
            return self.escalate_to_vision(frame, "initial frame, no baseline").await;
        };

        let pair = self.classifier.lock().classify(previous, frame);
        match pair.classification {
            Classification::Idle | Classification::CursorOnly => MapperOutcome::NoChange,
            Classification::Transitioning => MapperOutcome::Waiting,
            Classification::MinorUpdate => {
                let bbox = pair.changed_bbox.unwrap_or_else(|| {
                    Rect::new(0.0, 0.0, f64::from(frame.width), f64::from(frame.height))
                });
                let zones = gaze_region::analyze(self.region.as_ref(), frame, &bbox, &self.settings);
                let added = zones.len();
                self.registry.register_many(zones);
                info!(added, "canvas_mapper_region_update");
                MapperOutcome::RegionUpdated { zones_added: added }
            }
            Classification::ContentChange => {
                self.escalate_to_vision(frame, "content change detected").await
            }
        }
    }

    /// Unconditionally invoke the Vision Analyzer, applying the same
    /// preservation rule as `process_frame`'s CONTENT_CHANGE path. This is
    /// the synchronous path the Director drives at planned transition
    /// points (spec.md §4.6, §4.14). Returns the post-call zone count so
    /// the Director can log it, whether or not the call replaced the
    /// registry.
    pub async fn recapture(&self) -> usize {
        let Some(frame) = self.frame_source.capture_now() else {
            warn!("canvas_mapper_recapture_frame_unavailable_preserving_prior");
            return self.registry.count();
        };
        self.escalate_to_vision(&frame, "director-requested recapture").await;
        self.registry.count()
    }

    async fn escalate_to_vision(&self, frame: &Frame, hint: &str) -> MapperOutcome {
        let (width, height) = (frame.width, frame.height);
        let encoded = encode_frame(frame);
        let outcome = call_with_retry(
            self.vision.as_ref(),
            VisionRequest {
                image: &encoded,
                screen_width: width,
                screen_height: height,
                context_hint: hint,
            },
            &self.settings,
        )
        .await;

        if outcome.should_replace_registry() {
            let zone_count = outcome.zones.len();
            self.registry.replace_all(outcome.zones);
            info!(zone_count, "canvas_mapper_vision_replace");
            MapperOutcome::Replaced { zone_count }
        } else if outcome.is_parse_success_empty() {
            let prior = self.registry.count();
            warn!(prior_zone_count = prior, "canvas_mapper_vision_parse_empty_preserving_prior");
            MapperOutcome::Degraded {
                reason: "vision call succeeded with an empty zone list".to_string(),
            }
        } else {
            let prior = self.registry.count();
            warn!(
                prior_zone_count = prior,
                error = ?outcome.error,
                "canvas_mapper_vision_failed_preserving_prior"
            );
            MapperOutcome::Degraded {
                reason: outcome.error.unwrap_or_else(|| "vision call failed".to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use gaze_protocol::{Rect, Zone, ZoneKind, ZoneState};
    use gaze_region::RegionError;
    use gaze_vision::{VisionError, VisionRequest, VisionResponse};
    use parking_lot::Mutex as PlMutex;

    use super::*;

    fn frame(shade: u8, t: u64) -> Frame {
        Frame::new(Arc::from(vec![shade; 64 * 64 * 4]), 64, 64, t, (0.0, 0.0))
    }

    struct NoopRegion;
    impl LocalVision for NoopRegion {
        fn detect(&self, _frame: &Frame, _bbox: &Rect) -> Result<Vec<Zone>, RegionError> {
            Ok(Vec::new())
        }
    }

    fn zone(id: &str) -> Zone {
        Zone {
            id: id.into(),
            label: "button".into(),
            kind: ZoneKind::Button,
            state: ZoneState::Enabled,
            bounds: Rect::new(0.0, 0.0, 10.0, 10.0),
            confidence: 0.9,
            parent_id: None,
            last_seen: 0,
        }
    }

    struct ScriptedVision {
        responses: PlMutex<Vec<Result<VisionResponse, VisionError>>>,
    }

    impl ScriptedVision {
        fn new(responses: Vec<Result<VisionResponse, VisionError>>) -> Self {
            Self {
                responses: PlMutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl VisionBackend for ScriptedVision {
        async fn analyze(&self, _request: VisionRequest<'_>) -> Result<VisionResponse, VisionError> {
            let mut guard = self.responses.lock();
            if guard.is_empty() {
                Err(VisionError::ServerError(500))
            } else {
                guard.remove(0)
            }
        }
    }

    struct FixedFrameSource(Option<Frame>);
    impl FrameSource for FixedFrameSource {
        fn capture_now(&self) -> Option<Frame> {
            self.0.clone()
        }
    }

    fn mapper(vision: ScriptedVision, frame_source: Option<Frame>) -> CanvasMapper {
        CanvasMapper::new(
            Box::new(NoopRegion),
            Arc::new(vision),
            Arc::new(ZoneRegistry::new()),
            Arc::new(FixedFrameSource(frame_source)),
            Settings::default(),
        )
    }

    #[tokio::test]
    async fn no_previous_frame_escalates_to_vision() {
        let m = mapper(
            ScriptedVision::new(vec![Ok(VisionResponse {
                zones: vec![zone("a")],
                ..Default::default()
            })]),
            None,
        );
        let outcome = m.process_frame(&frame(10, 0), None).await;
        assert_eq!(outcome, MapperOutcome::Replaced { zone_count: 1 });
        assert_eq!(m.registry.count(), 1);
    }

    #[tokio::test]
    async fn identical_frames_yield_no_change() {
        let m = mapper(ScriptedVision::new(vec![]), None);
        let prev = frame(10, 0);
        let curr = frame(10, 10);
        let outcome = m.process_frame(&curr, Some(&prev)).await;
        assert_eq!(outcome, MapperOutcome::NoChange);
    }

    #[tokio::test]
    async fn fully_changed_frames_escalate_and_preserve_on_empty_response() {
        let m = mapper(
            ScriptedVision::new(vec![Ok(VisionResponse::default())]),
            None,
        );
        m.registry.register(zone("stale"));
        let prev = frame(10, 0);
        let curr = frame(250, 10);
        let outcome = m.process_frame(&curr, Some(&prev)).await;
        assert_eq!(
            outcome,
            MapperOutcome::Degraded {
                reason: "vision call succeeded with an empty zone list".to_string(),
            }
        );
        // Zone preservation invariant: an empty vision response never empties the registry.
        assert_eq!(m.registry.count(), 1);
    }

    #[tokio::test]
    async fn recapture_preserves_registry_when_no_frame_is_available() {
        let m = mapper(ScriptedVision::new(vec![]), None);
        m.registry.register(zone("kept"));
        let count = m.recapture().await;
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn recapture_replaces_registry_from_a_fresh_frame() {
        let m = mapper(
            ScriptedVision::new(vec![Ok(VisionResponse {
                zones: vec![zone("fresh")],
                ..Default::default()
            })]),
            Some(frame(99, 0)),
        );
        m.registry.register(zone("old"));
        let count = m.recapture().await;
        assert_eq!(count, 1);
        assert!(m.registry.get("fresh").is_some());
        assert!(m.registry.get("old").is_none());
    }
}
