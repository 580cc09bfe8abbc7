use gaze_protocol::Frame;

/// Encode a frame's RGBA8 buffer into a compact lossless byte sequence
/// (run-length encoding over the raw bytes), as required by the Vision
/// Analyzer call (spec.md §4.4). The remote endpoint's own image format is
/// external; this only needs to be lossless and compact enough to keep
/// requests small for mostly-flat UI screenshots.
#[must_use]
pub fn encode_frame(frame: &Frame) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&frame.width.to_le_bytes());
    out.extend_from_slice(&frame.height.to_le_bytes());

    let bytes = &frame.pixels[..];
    let mut i = 0usize;
    while i < bytes.len() {
        let value = bytes[i];
        let mut run = 1usize;
        while i + run < bytes.len() && bytes[i + run] == value && run < u16::MAX as usize {
            run += 1;
        }
        out.extend_from_slice(&(run as u16).to_le_bytes());
        out.push(value);
        i += run;
    }
    out
}

/// Inverse of [`encode_frame`], returning `(width, height, pixels)`.
#[must_use]
pub fn decode_frame(encoded: &[u8]) -> (u32, u32, Vec<u8>) {
    let width = u32::from_le_bytes(encoded[0..4].try_into().unwrap());
    let height = u32::from_le_bytes(encoded[4..8].try_into().unwrap());
    let mut pixels = Vec::new();
    let mut i = 8usize;
    while i + 2 < encoded.len() {
        let run = u16::from_le_bytes(encoded[i..i + 2].try_into().unwrap()) as usize;
        let value = encoded[i + 2];
        pixels.extend(std::iter::repeat(value).take(run));
        i += 3;
    }
    (width, height, pixels)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn round_trips_a_flat_frame() {
        let frame = Frame::new(Arc::from(vec![7u8; 16 * 16 * 4]), 16, 16, 0, (0.0, 0.0));
        let encoded = encode_frame(&frame);
        let (w, h, pixels) = decode_frame(&encoded);
        assert_eq!((w, h), (16, 16));
        assert_eq!(pixels, frame.pixels.to_vec());
    }

    #[test]
    fn encoding_a_flat_frame_is_small() {
        let frame = Frame::new(Arc::from(vec![7u8; 256 * 256 * 4]), 256, 256, 0, (0.0, 0.0));
        let encoded = encode_frame(&frame);
        assert!(encoded.len() < frame.pixels.len() / 10);
    }
}
