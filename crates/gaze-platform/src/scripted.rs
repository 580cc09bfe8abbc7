use parking_lot::Mutex;
use tracing::trace;

use gaze_protocol::MouseButton;

use crate::{PlatformAdapter, PlatformError, RawFrame};

/// One call observed by [`ScriptedPlatform`], recorded in dispatch order.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedCall {
    /// `move_cursor(x, y)`.
    MoveCursor(f64, f64),
    /// `click(x, y, button)`.
    Click(f64, f64, MouseButton),
    /// `double_click(x, y)`.
    DoubleClick(f64, f64),
    /// `scroll(x, y, amount)`.
    Scroll(f64, f64, i32),
    /// `type_text(text)`.
    TypeText(String),
    /// `key_press(chord)`.
    KeyPress(String),
}

struct Inner {
    frames: Vec<RawFrame>,
    frame_index: usize,
    cursor: (f64, f64),
    screen_size: (u32, u32),
    calls: Vec<RecordedCall>,
    fail_captures_remaining: u32,
}

/// A scripted [`PlatformAdapter`] double used by the test suites of every
/// crate in this workspace.
///
/// Replays a fixed sequence of frames on each `capture_frame` call (holding
/// on the last frame once the scenario runs out), tracks a mutable cursor
/// position that `move_cursor`/`click`/… update, and records every
/// dispatched call for assertions. Grounded on `hotki-world`'s `mimic`
/// scripted scenario double.
pub struct ScriptedPlatform {
    inner: Mutex<Inner>,
}

impl ScriptedPlatform {
    /// Build a scripted adapter starting at `(0, 0)` with the given screen
    /// size and an empty frame scenario.
    #[must_use]
    pub fn new(screen_size: (u32, u32)) -> Self {
        Self {
            inner: Mutex::new(Inner {
                frames: Vec::new(),
                frame_index: 0,
                cursor: (0.0, 0.0),
                screen_size,
                calls: Vec::new(),
                fail_captures_remaining: 0,
            }),
        }
    }

    /// Append a frame to the capture scenario.
    pub fn push_frame(&self, frame: RawFrame) {
        self.inner.lock().frames.push(frame);
    }

    /// Directly set the cursor position, as if the OS moved it out of band.
    pub fn set_cursor(&self, x: f64, y: f64) {
        self.inner.lock().cursor = (x, y);
    }

    /// Arrange for the next `n` `capture_frame` calls to fail, to exercise
    /// the Capture Loop's adapter-failure backoff path.
    pub fn fail_next_captures(&self, n: u32) {
        self.inner.lock().fail_captures_remaining = n;
    }

    /// Snapshot of every call recorded so far, in order.
    #[must_use]
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().calls.clone()
    }
}

impl PlatformAdapter for ScriptedPlatform {
    fn capture_frame(&self) -> Result<RawFrame, PlatformError> {
        let mut inner = self.inner.lock();
        if inner.fail_captures_remaining > 0 {
            inner.fail_captures_remaining -= 1;
            trace!("scripted_platform_capture_failure_injected");
            return Err(PlatformError::Failed("scripted capture failure".into()));
        }
        if inner.frames.is_empty() {
            return Err(PlatformError::ScenarioExhausted);
        }
        let idx = inner.frame_index.min(inner.frames.len() - 1);
        let frame = inner.frames[idx].clone();
        if inner.frame_index + 1 < inner.frames.len() {
            inner.frame_index += 1;
        }
        Ok(frame)
    }

    fn get_cursor_pos(&self) -> Result<(f64, f64), PlatformError> {
        Ok(self.inner.lock().cursor)
    }

    fn move_cursor(&self, x: f64, y: f64) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock();
        inner.cursor = (x, y);
        inner.calls.push(RecordedCall::MoveCursor(x, y));
        Ok(())
    }

    fn click(&self, x: f64, y: f64, button: MouseButton) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock();
        inner.cursor = (x, y);
        inner.calls.push(RecordedCall::Click(x, y, button));
        Ok(())
    }

    fn double_click(&self, x: f64, y: f64) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock();
        inner.cursor = (x, y);
        inner.calls.push(RecordedCall::DoubleClick(x, y));
        Ok(())
    }

    fn scroll(&self, x: f64, y: f64, amount: i32) -> Result<(), PlatformError> {
        self.inner.lock().calls.push(RecordedCall::Scroll(x, y, amount));
        Ok(())
    }

    fn type_text(&self, text: &str) -> Result<(), PlatformError> {
        self.inner
            .lock()
            .calls
            .push(RecordedCall::TypeText(text.to_owned()));
        Ok(())
    }

    fn key_press(&self, chord: &str) -> Result<(), PlatformError> {
        self.inner
            .lock()
            .calls
            .push(RecordedCall::KeyPress(chord.to_owned()));
        Ok(())
    }

    fn get_screen_size(&self) -> Result<(u32, u32), PlatformError> {
        Ok(self.inner.lock().screen_size)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn frame(w: u32, h: u32) -> RawFrame {
        RawFrame {
            pixels: Arc::from(vec![0u8; (w * h * 4) as usize]),
            width: w,
            height: h,
        }
    }

    #[test]
    fn holds_on_last_frame_once_scenario_is_exhausted() {
        let p = ScriptedPlatform::new((1920, 1080));
        p.push_frame(frame(10, 10));
        p.push_frame(frame(20, 20));
        assert_eq!(p.capture_frame().unwrap().width, 10);
        assert_eq!(p.capture_frame().unwrap().width, 20);
        assert_eq!(p.capture_frame().unwrap().width, 20);
    }

    #[test]
    fn injected_failures_are_consumed_then_stop() {
        let p = ScriptedPlatform::new((100, 100));
        p.push_frame(frame(1, 1));
        p.fail_next_captures(2);
        assert!(p.capture_frame().is_err());
        assert!(p.capture_frame().is_err());
        assert!(p.capture_frame().is_ok());
    }

    #[test]
    fn click_moves_cursor_and_is_recorded() {
        let p = ScriptedPlatform::new((100, 100));
        p.click(5.0, 6.0, MouseButton::Left).unwrap();
        assert_eq!(p.get_cursor_pos().unwrap(), (5.0, 6.0));
        assert_eq!(
            p.recorded_calls(),
            vec![RecordedCall::Click(5.0, 6.0, MouseButton::Left)]
        );
    }
}
