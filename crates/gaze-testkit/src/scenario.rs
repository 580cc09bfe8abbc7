use std::sync::Arc;

use gaze_brush::BrushController;
use gaze_director::Director;
use gaze_mapper::{CanvasMapper, FrameSource};
use gaze_planner::{PlanResponse, PlannerError};
use gaze_platform::ScriptedPlatform;
use gaze_protocol::{Frame, Rect, Settings, Zone};
use gaze_region::{LocalVision, RegionError};
use gaze_registry::ZoneRegistry;
use gaze_step::StepExecutor;
use gaze_vision::{VisionError, VisionResponse};

use crate::{planner::ScriptedPlanner, vision::ScriptedVision};

/// A [`LocalVision`] that never finds anything, for scenarios that don't
/// exercise the mid tier.
pub struct NoopRegion;
impl LocalVision for NoopRegion {
    fn detect(&self, _frame: &Frame, _bbox: &Rect) -> Result<Vec<Zone>, RegionError> {
        Ok(Vec::new())
    }
}

/// A [`FrameSource`] with no frame available, for scenarios where
/// `recapture()` degrading gracefully is the point.
pub struct NoFrames;
impl FrameSource for NoFrames {
    fn capture_now(&self) -> Option<Frame> {
        None
    }
}

/// Every handle a test needs to drive a fully-wired [`Director`] and
/// inspect what its collaborators observed, grounded on `hotki-world`'s
/// `mimic` scenario module (one struct bundling a scripted world plus the
/// handles tests assert against).
pub struct Scenario {
    /// The director under test.
    pub director: Director,
    /// The registry it shares with its collaborators.
    pub registry: Arc<ZoneRegistry>,
    /// The scripted platform adapter.
    pub platform: Arc<ScriptedPlatform>,
    /// The scripted task planner.
    pub planner: Arc<ScriptedPlanner>,
}

/// Builds a [`Scenario`] from scripted zones, plan responses, and vision
/// responses.
#[derive(Default)]
pub struct ScenarioBuilder {
    settings: Option<Settings>,
    zones: Vec<Zone>,
    plan_responses: Vec<Result<PlanResponse, PlannerError>>,
    vision_responses: Vec<Result<VisionResponse, VisionError>>,
    screen_size: Option<(u32, u32)>,
    platform_name: Option<String>,
}

impl ScenarioBuilder {
    /// Start an empty scenario.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the default [`Settings`].
    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Pre-register a zone in the registry before the director runs.
    #[must_use]
    pub fn zone(mut self, zone: Zone) -> Self {
        self.zones.push(zone);
        self
    }

    /// Append one scripted task planner response.
    #[must_use]
    pub fn plan_response(mut self, response: Result<PlanResponse, PlannerError>) -> Self {
        self.plan_responses.push(response);
        self
    }

    /// Append one scripted vision analyzer response.
    #[must_use]
    pub fn vision_response(mut self, response: Result<VisionResponse, VisionError>) -> Self {
        self.vision_responses.push(response);
        self
    }

    /// Assemble the full collaborator graph: registry, scripted platform,
    /// scripted planner, a no-op mid-tier region analyzer, a scripted
    /// vision analyzer, a frame-less `recapture()` source, and a director
    /// wired over all of it.
    #[must_use]
    pub fn build(self) -> Scenario {
        let settings = self.settings.unwrap_or_default();
        let registry = Arc::new(ZoneRegistry::new());
        for zone in self.zones {
            registry.register(zone);
        }

        let platform = Arc::new(ScriptedPlatform::new(self.screen_size.unwrap_or((1920, 1080))));
        let brush = BrushController::new(platform.clone(), registry.clone(), settings.clone());
        let step_executor = StepExecutor::new(platform.clone(), brush);

        let vision = Arc::new(ScriptedVision::new(self.vision_responses));
        let mapper = Arc::new(CanvasMapper::new(
            Box::new(NoopRegion),
            vision,
            registry.clone(),
            Arc::new(NoFrames),
            settings.clone(),
        ));

        let planner = Arc::new(ScriptedPlanner::new(self.plan_responses));
        let director = Director::new(
            mapper,
            registry.clone(),
            planner.clone(),
            step_executor,
            settings,
            self.platform_name.unwrap_or_else(|| "macos".to_string()),
        );

        Scenario { director, registry, platform, planner }
    }
}
