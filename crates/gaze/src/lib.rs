//! `gaze`: the library facade wiring the capture loop, the tiered
//! perception pipeline, and the Director's task-orchestration loop into
//! one `Agent`, grounded on `hotki-server::Server` (a top-level facade
//! that owns the whole component graph behind `build`/`run`/lifecycle
//! methods).
#![warn(missing_docs)]

mod frame_source;
mod perception;

pub use gaze_logging::init_tracing;
pub use gaze_platform::PlatformAdapter;
pub use gaze_planner::TaskPlanner;
pub use gaze_protocol::{Settings, TaskResult};
pub use gaze_region::LocalVision;
pub use gaze_vision::VisionBackend;

use std::sync::Arc;

use gaze_brush::BrushController;
use gaze_capture::CaptureLoop;
use gaze_director::Director;
use gaze_mapper::CanvasMapper;
use gaze_registry::ZoneRegistry;
use gaze_step::StepExecutor;
use parking_lot::Mutex;
use tracing::info;

use frame_source::CaptureFrameSource;
use perception::PerceptionHandle;

struct RunningHandles {
    capture: gaze_capture::CaptureHandle,
    perception: PerceptionHandle,
}

/// Assembles an [`Agent`] from its external collaborators: the platform
/// adapter, the vision analyzer, the mid-tier region analyzer, and the
/// task planner are all pinned trait-boundary interfaces (spec.md §1); a
/// production binary supplies real implementations, tests supply the
/// `gaze-testkit` scripted doubles.
pub struct AgentBuilder {
    platform: Arc<dyn PlatformAdapter>,
    vision: Arc<dyn VisionBackend>,
    region: Box<dyn LocalVision>,
    planner: Arc<dyn TaskPlanner>,
    settings: Settings,
    platform_name: String,
}

impl AgentBuilder {
    /// Start a builder over the four required collaborators, with default
    /// [`Settings`] and `platform_name` of `"unknown"`.
    #[must_use]
    pub fn new(
        platform: Arc<dyn PlatformAdapter>,
        vision: Arc<dyn VisionBackend>,
        region: Box<dyn LocalVision>,
        planner: Arc<dyn TaskPlanner>,
    ) -> Self {
        Self {
            platform,
            vision,
            region,
            planner,
            settings: Settings::default(),
            platform_name: "unknown".to_string(),
        }
    }

    /// Override the default [`Settings`].
    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Name reported to the Task Planner as the target platform (e.g.
    /// `"macos"`, `"windows"`).
    #[must_use]
    pub fn platform_name(mut self, name: impl Into<String>) -> Self {
        self.platform_name = name.into();
        self
    }

    /// Wire every component together. Neither the capture loop nor the
    /// perception tick is running yet; call [`Agent::startup`] before the
    /// first [`Agent::run_task`].
    #[must_use]
    pub fn build(self) -> Agent {
        let capture = CaptureLoop::new(self.platform.clone(), self.settings.clone());
        let registry = Arc::new(ZoneRegistry::new());
        let frame_source = Arc::new(CaptureFrameSource::new(capture.clone()));
        let mapper = Arc::new(CanvasMapper::new(
            self.region,
            self.vision,
            registry.clone(),
            frame_source,
            self.settings.clone(),
        ));
        let brush = BrushController::new(self.platform.clone(), registry.clone(), self.settings.clone());
        let step_executor = StepExecutor::new(self.platform.clone(), brush);
        let director = Director::new(
            mapper.clone(),
            registry.clone(),
            self.planner,
            step_executor,
            self.settings.clone(),
            self.platform_name,
        );

        Agent {
            capture,
            mapper,
            registry,
            director,
            settings: self.settings,
            handles: Mutex::new(None),
        }
    }
}

/// The fully-wired agent. One instance owns one capture loop, one
/// perception tick, and one Director; `run_task` may be called repeatedly
/// across its lifetime.
pub struct Agent {
    capture: Arc<CaptureLoop>,
    mapper: Arc<CanvasMapper>,
    registry: Arc<ZoneRegistry>,
    director: Director,
    settings: Settings,
    handles: Mutex<Option<RunningHandles>>,
}

impl Agent {
    /// Start the capture loop and the perception tick, then perform one
    /// initial vision call to populate the registry (spec.md §6: "`startup()`
    /// performs one initial vision call and populates the registry; it must
    /// complete before any `run_task()`"). Calling `startup` again after a
    /// prior `shutdown` restarts both background tasks.
    pub async fn startup(&self) {
        info!("agent_startup");
        let capture_handle = self.capture.clone().spawn();
        let perception_handle = perception::spawn(self.capture.clone(), self.mapper.clone(), self.settings.clone());
        *self.handles.lock() = Some(RunningHandles { capture: capture_handle, perception: perception_handle });

        let zone_count = self.mapper.recapture().await;
        info!(zone_count, "agent_startup_initial_vision_call_complete");
    }

    /// Run one task to completion, abort, or budget exhaustion.
    pub async fn run_task(&self, task_description: &str) -> TaskResult {
        self.director.run_task(task_description).await
    }

    /// Current zone inventory, for callers that want to inspect agent state
    /// between tasks.
    #[must_use]
    pub fn zones(&self) -> Vec<gaze_protocol::Zone> {
        self.registry.all()
    }

    /// Idempotent: stops the capture loop and the perception tick, leaving
    /// no background work. Safe to call any number of times, including
    /// before `startup` or after a prior `shutdown`.
    pub async fn shutdown(&self) {
        let handles = self.handles.lock().take();
        if let Some(handles) = handles {
            handles.perception.shutdown().await;
            handles.capture.shutdown().await;
            info!("agent_shutdown_complete");
        }
    }
}
