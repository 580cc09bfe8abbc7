use std::sync::Arc;

use gaze_capture::CaptureLoop;
use gaze_mapper::FrameSource;
use gaze_protocol::Frame;

/// Obtains a fresh frame for [`gaze_mapper::CanvasMapper::recapture`] by
/// driving a real capture through the [`CaptureLoop`], rather than reusing
/// whatever frame the periodic tick last saw.
pub struct CaptureFrameSource {
    capture: Arc<CaptureLoop>,
}

impl CaptureFrameSource {
    /// Wrap a capture loop as a frame source.
    #[must_use]
    pub fn new(capture: Arc<CaptureLoop>) -> Self {
        Self { capture }
    }
}

impl FrameSource for CaptureFrameSource {
    fn capture_now(&self) -> Option<Frame> {
        self.capture.capture_once().ok()
    }
}
