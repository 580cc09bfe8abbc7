use std::{sync::Arc, time::Duration};

use gaze_capture::CaptureLoop;
use gaze_mapper::CanvasMapper;
use gaze_protocol::{Frame, Settings};
use tokio::sync::oneshot;
use tracing::trace;

/// Handle to the background perception tick; dropping it does not stop the
/// task, use [`PerceptionHandle::shutdown`].
pub struct PerceptionHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: tokio::task::JoinHandle<()>,
}

impl PerceptionHandle {
    /// Signal the tick task to stop and wait for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = self.join.await;
    }
}

/// Start the idle-monitoring tick: at `settings.target_fps`, pull the most
/// recent captured frame and run it through [`CanvasMapper::process_frame`]
/// against the previous tick's frame, per spec.md §5's "Mapper context"
/// (driven synchronously during `recapture`, and optionally by a periodic
/// tick during idle monitoring).
pub fn spawn(capture: Arc<CaptureLoop>, mapper: Arc<CanvasMapper>, settings: Settings) -> PerceptionHandle {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        let fps = settings.target_fps.max(1);
        let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(fps)));
        let mut previous: Option<Frame> = None;
        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    trace!("perception_tick_shutdown");
                    return;
                }
                _ = ticker.tick() => {
                    if let Some(frame) = capture.latest() {
                        if previous.as_ref().is_none_or(|p| p.timestamp_ms != frame.timestamp_ms) {
                            mapper.process_frame(&frame, previous.as_ref()).await;
                            previous = Some(frame);
                        }
                    }
                }
            }
        }
    });
    PerceptionHandle { shutdown_tx: Some(shutdown_tx), join }
}
