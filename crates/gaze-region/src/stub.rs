use gaze_protocol::{Frame, Rect, Zone, ZoneKind, ZoneState};

use crate::{LocalVision, RegionError};

/// Side length, in pixels, of the local-contrast sampling cell.
const CELL_SIZE: u32 = 32;

/// Deterministic stand-in for a real edge/contour/text-detection primitive
/// set (spec.md §1 pins the real primitives as an external collaborator).
///
/// Scans `bbox` in fixed-size cells and proposes a candidate zone for any
/// cell whose mean luminance deviates noticeably from the bbox average,
/// with confidence proportional to the deviation. This is not a
/// contour/OCR detector; it exists so the tiering pipeline and its tests
/// have a reproducible mid-tier source without a real computer-vision
/// dependency.
#[derive(Default)]
pub struct StubLocalVision;

fn luminance(pixels: &[u8], width: u32, x: u32, y: u32) -> f64 {
    let idx = ((y * width + x) * 4) as usize;
    if idx + 2 >= pixels.len() {
        return 0.0;
    }
    0.299 * f64::from(pixels[idx]) + 0.587 * f64::from(pixels[idx + 1]) + 0.114 * f64::from(pixels[idx + 2])
}

fn cell_mean_luminance(frame: &Frame, x0: u32, y0: u32, x1: u32, y1: u32) -> f64 {
    let mut total = 0.0;
    let mut count = 0u32;
    for y in y0..y1.min(frame.height) {
        for x in x0..x1.min(frame.width) {
            total += luminance(&frame.pixels, frame.width, x, y);
            count += 1;
        }
    }
    if count == 0 { 0.0 } else { total / f64::from(count) }
}

impl LocalVision for StubLocalVision {
    fn detect(&self, frame: &Frame, bbox: &Rect) -> Result<Vec<Zone>, RegionError> {
        let x0 = bbox.x.max(0.0) as u32;
        let y0 = bbox.y.max(0.0) as u32;
        let x1 = ((bbox.x + bbox.w).min(f64::from(frame.width))) as u32;
        let y1 = ((bbox.y + bbox.h).min(f64::from(frame.height))) as u32;
        if x1 <= x0 || y1 <= y0 {
            return Ok(Vec::new());
        }

        let bbox_mean = cell_mean_luminance(frame, x0, y0, x1, y1);
        let mut zones = Vec::new();
        let mut idx = 0u32;

        let mut cy = y0;
        while cy < y1 {
            let mut cx = x0;
            while cx < x1 {
                let cell_x1 = (cx + CELL_SIZE).min(x1);
                let cell_y1 = (cy + CELL_SIZE).min(y1);
                let cell_mean = cell_mean_luminance(frame, cx, cy, cell_x1, cell_y1);
                let deviation = (cell_mean - bbox_mean).abs() / 255.0;
                let confidence = (deviation * 2.0).min(1.0);
                if confidence > 0.05 {
                    zones.push(Zone {
                        id: format!("region-{idx}"),
                        label: format!("detected_region_{idx}"),
                        kind: ZoneKind::Other,
                        state: ZoneState::Enabled,
                        bounds: Rect::new(
                            f64::from(cx),
                            f64::from(cy),
                            f64::from(cell_x1 - cx),
                            f64::from(cell_y1 - cy),
                        ),
                        confidence,
                        parent_id: None,
                        last_seen: frame.timestamp_ms,
                    });
                    idx += 1;
                }
                cx += CELL_SIZE;
            }
            cy += CELL_SIZE;
        }

        Ok(zones)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use super::*;

    pub(crate) fn blank_frame(w: u32, h: u32) -> Frame {
        Frame::new(Arc::from(vec![128u8; (w * h * 4) as usize]), w, h, 0, (0.0, 0.0))
    }

    fn frame_with_bright_quadrant(w: u32, h: u32) -> Frame {
        let mut pixels = vec![10u8; (w * h * 4) as usize];
        for y in 0..h / 2 {
            for x in 0..w / 2 {
                let idx = ((y * w + x) * 4) as usize;
                pixels[idx] = 250;
                pixels[idx + 1] = 250;
                pixels[idx + 2] = 250;
                pixels[idx + 3] = 255;
            }
        }
        Frame::new(Arc::from(pixels), w, h, 0, (0.0, 0.0))
    }

    #[test]
    fn flat_frame_yields_no_candidates() {
        let frame = blank_frame(64, 64);
        let bbox = Rect::new(0.0, 0.0, 64.0, 64.0);
        let out = StubLocalVision.detect(&frame, &bbox).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn contrast_region_yields_bounded_candidates() {
        let frame = frame_with_bright_quadrant(64, 64);
        let bbox = Rect::new(0.0, 0.0, 64.0, 64.0);
        let out = StubLocalVision.detect(&frame, &bbox).unwrap();
        assert!(!out.is_empty());
        for zone in &out {
            assert!(bbox.contains_rect(&zone.bounds));
            assert!(zone.confidence > 0.0 && zone.confidence <= 1.0);
        }
    }
}
