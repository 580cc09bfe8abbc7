//! Capture Loop: a dedicated producer that samples the platform adapter at
//! `target_fps` into a bounded ring of frames (spec.md §4.1).
#![warn(missing_docs)]

mod ring;

pub use ring::CaptureRing;

use std::{
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use gaze_platform::{PlatformAdapter, PlatformError};
use gaze_protocol::{Frame, Settings};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{info, warn};

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Consecutive adapter failures after which the loop pauses for
/// `backoff_base_seconds` before retrying (spec.md §4.1).
const FAILURE_BACKOFF_THRESHOLD: u32 = 3;

/// Owns the frame ring and drives the background capture task.
///
/// `capture_once`, `latest`, and `range` are the public operations spec.md
/// §4.1 names; [`CaptureLoop::spawn`] additionally starts the periodic
/// producer task, grounded on `hotki-world`'s background-actor-plus-shared-state
/// shape (simplified here to a shared ring since no command/response
/// protocol is needed for a pure producer).
pub struct CaptureLoop {
    adapter: Arc<dyn PlatformAdapter>,
    settings: Settings,
    ring: Mutex<CaptureRing>,
    consecutive_failures: AtomicU32,
}

/// Handle to a running background capture task; dropping it does not stop
/// the task, use [`CaptureHandle::shutdown`].
pub struct CaptureHandle {
    loop_: Arc<CaptureLoop>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: tokio::task::JoinHandle<()>,
}

impl CaptureHandle {
    /// The underlying loop, for `capture_once`/`latest`/`range` calls.
    #[must_use]
    pub fn loop_(&self) -> &Arc<CaptureLoop> {
        &self.loop_
    }

    /// Signal the background task to stop and wait for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let _ = self.join.await;
    }
}

impl CaptureLoop {
    /// Build a capture loop over `adapter`, sized per `settings.ring_capacity()`.
    #[must_use]
    pub fn new(adapter: Arc<dyn PlatformAdapter>, settings: Settings) -> Arc<Self> {
        let capacity = settings.ring_capacity();
        Arc::new(Self {
            adapter,
            settings,
            ring: Mutex::new(CaptureRing::new(capacity)),
            consecutive_failures: AtomicU32::new(0),
        })
    }

    /// Obtain one frame and cursor sample from the platform adapter right
    /// now, stamp it, and push it into the ring.
    pub fn capture_once(&self) -> Result<Frame, PlatformError> {
        let raw = self.adapter.capture_frame()?;
        let cursor = self.adapter.get_cursor_pos()?;
        let frame = Frame::new(raw.pixels, raw.width, raw.height, now_ms(), cursor);
        self.ring.lock().push(frame.clone());
        self.consecutive_failures.store(0, Ordering::Relaxed);
        Ok(frame)
    }

    /// The most recently captured frame, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Frame> {
        self.ring.lock().latest()
    }

    /// Frames captured within `[from_ts, to_ts]`, oldest first.
    #[must_use]
    pub fn range(&self, from_ts: u64, to_ts: u64) -> Vec<Frame> {
        self.ring.lock().range(from_ts, to_ts)
    }

    /// Total frames evicted by ring overflow since construction.
    #[must_use]
    pub fn lost_count(&self) -> u64 {
        self.ring.lock().lost_count()
    }

    /// Start the periodic producer task at `settings.target_fps`, returning
    /// a handle to query the loop and later shut it down.
    pub fn spawn(self: Arc<Self>) -> CaptureHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let loop_ = Arc::clone(&self);
        let join = tokio::spawn(async move {
            let fps = loop_.settings.target_fps.max(1);
            let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(fps)));
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        info!("capture_loop_shutdown");
                        return;
                    }
                    _ = ticker.tick() => {
                        loop_.tick().await;
                    }
                }
            }
        });
        CaptureHandle {
            loop_: self,
            shutdown_tx: Some(shutdown_tx),
            join,
        }
    }

    /// Run one producer iteration: attempt a capture, and after a third
    /// consecutive failure pause for `api_backoff_base_seconds` before the
    /// loop resumes ticking (spec.md §4.1, §6).
    async fn tick(&self) {
        match self.capture_once() {
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "capture_loop_adapter_failure");
                let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
                if failures >= FAILURE_BACKOFF_THRESHOLD {
                    warn!(failures, "capture_loop_backoff");
                    tokio::time::sleep(Duration::from_secs_f64(
                        self.settings.api_backoff_base_seconds,
                    ))
                    .await;
                    self.consecutive_failures.store(0, Ordering::Relaxed);
                }
            }
        }
    }
}
