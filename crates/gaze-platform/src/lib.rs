//! Platform adapter trait boundary.
//!
//! The core workspace never names a concrete operating system. Everything
//! that touches real pixels, a real cursor, or real synthetic input goes
//! through [`PlatformAdapter`]; production builds would supply a per-OS
//! implementation, and this crate additionally ships [`scripted::ScriptedPlatform`]
//! for tests (grounded on `hotki-world`'s `mimic` scripted replay double).
#![warn(missing_docs)]

mod error;
mod scripted;

pub use error::PlatformError;
pub use scripted::{RecordedCall, ScriptedPlatform};

use gaze_protocol::MouseButton;

/// Raw pixel data as returned by [`PlatformAdapter::capture_frame`], before
/// the Capture Loop stamps it with a timestamp and cursor sample.
#[derive(Clone, Debug)]
pub struct RawFrame {
    /// Packed RGBA8 pixel data, `width * height * 4` bytes.
    pub pixels: std::sync::Arc<[u8]>,
    /// Frame width in logical pixels.
    pub width: u32,
    /// Frame height in logical pixels.
    pub height: u32,
}

/// Capability set a platform-specific implementation must fulfill.
///
/// Every operation reports failure through [`PlatformError`] rather than
/// panicking; callers (the Capture Loop, the Action Executor) decide how to
/// react.
pub trait PlatformAdapter: Send + Sync {
    /// Grab the current screen contents.
    fn capture_frame(&self) -> Result<RawFrame, PlatformError>;

    /// Read the OS cursor position, in logical coordinates.
    fn get_cursor_pos(&self) -> Result<(f64, f64), PlatformError>;

    /// Move the cursor to an absolute logical position.
    fn move_cursor(&self, x: f64, y: f64) -> Result<(), PlatformError>;

    /// Click at an absolute logical position.
    fn click(&self, x: f64, y: f64, button: MouseButton) -> Result<(), PlatformError>;

    /// Double-click at an absolute logical position.
    fn double_click(&self, x: f64, y: f64) -> Result<(), PlatformError>;

    /// Scroll at an absolute logical position by a platform-normalized
    /// tick amount.
    fn scroll(&self, x: f64, y: f64, amount: i32) -> Result<(), PlatformError>;

    /// Type UTF-8 text into whatever currently holds keyboard focus.
    fn type_text(&self, text: &str) -> Result<(), PlatformError>;

    /// Send a key chord (`ctrl+shift+s`, `enter`, `f5`, …).
    fn key_press(&self, chord: &str) -> Result<(), PlatformError>;

    /// Logical screen dimensions.
    fn get_screen_size(&self) -> Result<(u32, u32), PlatformError>;
}
