use std::sync::Arc;

/// An owned pixel buffer plus the metadata captured alongside it.
///
/// Immutable after production; cheaply cloneable since `pixels` is an `Arc`.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Packed RGBA8 pixel data, `width * height * 4` bytes.
    pub pixels: Arc<[u8]>,
    /// Frame width in logical pixels.
    pub width: u32,
    /// Frame height in logical pixels.
    pub height: u32,
    /// Monotonic capture timestamp, milliseconds since an arbitrary epoch.
    pub timestamp_ms: u64,
    /// Cursor position sampled within the same capture window.
    pub cursor: (f64, f64),
}

impl Frame {
    /// Construct a frame, panicking only on a pixel/dimension mismatch
    /// (a programmer error at the capture boundary, not a runtime outcome).
    #[must_use]
    pub fn new(
        pixels: Arc<[u8]>,
        width: u32,
        height: u32,
        timestamp_ms: u64,
        cursor: (f64, f64),
    ) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 4,
            "pixel buffer length does not match width*height*4"
        );
        Self {
            pixels,
            width,
            height,
            timestamp_ms,
            cursor,
        }
    }

    /// True when `self` and `other` share dimensions.
    #[must_use]
    pub fn same_size(&self, other: &Frame) -> bool {
        self.width == other.width && self.height == other.height
    }
}
