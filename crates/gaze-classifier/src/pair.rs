use gaze_protocol::{Frame, Rect, Settings};

/// Side length, in pixels, of the square blocks the diff is sampled over.
const BLOCK_SIZE: u32 = 16;

/// Mean per-block luminance delta (0..=255 scale) above which a block is
/// considered changed.
const BLOCK_CHANGE_THRESHOLD: f64 = 15.0;

/// Fraction of the screen area a changed bbox may occupy and still count
/// as MINOR_UPDATE rather than CONTENT_CHANGE (spec.md §4.2).
const MINOR_UPDATE_AREA_CEILING: f64 = 0.40;

/// One of the five tiering decisions the classifier can emit.
///
/// [`classify_pair`] never emits [`Classification::Transitioning`] itself
/// (it has no concept of a debounce window); that variant is reserved for
/// [`crate::ChangeClassifier`]'s stateful wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Essentially no change.
    Idle,
    /// Change consistent with cursor movement alone.
    CursorOnly,
    /// A small-to-moderate, localized change.
    MinorUpdate,
    /// A large or window-identity-changing update.
    ContentChange,
    /// The screen has not yet settled; wait before acting.
    Transitioning,
}

/// Result of comparing two frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairOutcome {
    /// The tiering decision.
    pub classification: Classification,
    /// Fraction (0.0..=1.0) of blocks that changed.
    pub diff_fraction: f64,
    /// Bounding box of changed blocks, in logical pixels; `None` when no
    /// block changed.
    pub changed_bbox: Option<Rect>,
}

fn luminance(r: u8, g: u8, b: u8) -> f64 {
    0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)
}

/// Mean absolute luminance delta between the two frames within one block,
/// and whether the block lies within bounds of both frames.
fn block_diff(a: &Frame, b: &Frame, bx: u32, by: u32) -> f64 {
    let x0 = bx * BLOCK_SIZE;
    let y0 = by * BLOCK_SIZE;
    let x1 = (x0 + BLOCK_SIZE).min(a.width);
    let y1 = (y0 + BLOCK_SIZE).min(a.height);
    let mut total = 0.0_f64;
    let mut count = 0u32;
    for y in y0..y1 {
        for x in x0..x1 {
            let ia = ((y * a.width + x) * 4) as usize;
            let ib = ((y * b.width + x) * 4) as usize;
            if ia + 2 >= a.pixels.len() || ib + 2 >= b.pixels.len() {
                continue;
            }
            let la = luminance(a.pixels[ia], a.pixels[ia + 1], a.pixels[ia + 2]);
            let lb = luminance(b.pixels[ib], b.pixels[ib + 1], b.pixels[ib + 2]);
            total += (la - lb).abs();
            count += 1;
        }
    }
    if count == 0 { 0.0 } else { total / f64::from(count) }
}

/// Compare two equal-sized frames and produce a diff outcome.
///
/// Pure and deterministic: identical inputs always produce an identical
/// [`PairOutcome`]. Ties between classifications are broken in the fixed
/// order IDLE → CURSOR_ONLY → MINOR_UPDATE → CONTENT_CHANGE, matching
/// spec.md §4.2.
///
/// # Panics
/// Panics if `a` and `b` differ in dimensions; callers (the Canvas Mapper)
/// only ever compare frames captured from the same screen.
#[must_use]
pub fn classify_pair(a: &Frame, b: &Frame, settings: &Settings) -> PairOutcome {
    assert!(a.same_size(b), "classify_pair requires equal-sized frames");

    let cols = a.width.div_ceil(BLOCK_SIZE);
    let rows = a.height.div_ceil(BLOCK_SIZE);
    let total_blocks = (cols * rows).max(1);

    let mut changed_blocks = 0u32;
    let mut bbox: Option<Rect> = None;

    for by in 0..rows {
        for bx in 0..cols {
            if block_diff(a, b, bx, by) > BLOCK_CHANGE_THRESHOLD {
                changed_blocks += 1;
                let rect = Rect::new(
                    f64::from(bx * BLOCK_SIZE),
                    f64::from(by * BLOCK_SIZE),
                    f64::from(BLOCK_SIZE),
                    f64::from(BLOCK_SIZE),
                );
                bbox = Some(match bbox {
                    Some(existing) => existing.union(&rect),
                    None => rect,
                });
            }
        }
    }

    let diff_fraction = f64::from(changed_blocks) / f64::from(total_blocks);
    let diff_percent = diff_fraction * 100.0;
    let screen_area = f64::from(a.width) * f64::from(a.height);

    let (cursor_x, cursor_y) = a.cursor;
    let is_cursor_centered = bbox.is_some_and(|b| {
        b.area() < settings.cursor_diff_area_ceiling
            && b.distance_to_point(cursor_x, cursor_y) < f64::from(BLOCK_SIZE)
    });

    let classification = if diff_percent < settings.diff_threshold_percent {
        Classification::Idle
    } else if is_cursor_centered {
        Classification::CursorOnly
    } else if diff_percent < settings.tier2_threshold_percent
        && bbox.is_some_and(|b| b.area() / screen_area.max(1.0) <= MINOR_UPDATE_AREA_CEILING)
    {
        Classification::MinorUpdate
    } else {
        Classification::ContentChange
    };

    PairOutcome {
        classification,
        diff_fraction,
        changed_bbox: bbox,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gaze_protocol::Settings;

    use super::*;

    fn solid_frame(w: u32, h: u32, shade: u8, cursor: (f64, f64)) -> Frame {
        Frame::new(Arc::from(vec![shade; (w * h * 4) as usize]), w, h, 0, cursor)
    }

    #[test]
    fn identical_frames_are_idle() {
        let settings = Settings::default();
        let a = solid_frame(64, 64, 10, (0.0, 0.0));
        let b = a.clone();
        let outcome = classify_pair(&a, &b, &settings);
        assert_eq!(outcome.classification, Classification::Idle);
        assert_eq!(outcome.diff_fraction, 0.0);
    }

    #[test]
    fn fully_different_frames_are_content_change() {
        let settings = Settings::default();
        let a = solid_frame(64, 64, 10, (0.0, 0.0));
        let b = solid_frame(64, 64, 250, (0.0, 0.0));
        let outcome = classify_pair(&a, &b, &settings);
        assert_eq!(outcome.classification, Classification::ContentChange);
    }

    #[test]
    fn is_deterministic_given_same_pair() {
        let settings = Settings::default();
        let a = solid_frame(32, 32, 10, (1.0, 1.0));
        let b = solid_frame(32, 32, 200, (1.0, 1.0));
        assert_eq!(classify_pair(&a, &b, &settings), classify_pair(&a, &b, &settings));
    }

    #[test]
    #[should_panic(expected = "equal-sized")]
    fn mismatched_sizes_panic() {
        let settings = Settings::default();
        let a = solid_frame(32, 32, 10, (0.0, 0.0));
        let b = solid_frame(16, 16, 10, (0.0, 0.0));
        classify_pair(&a, &b, &settings);
    }

    proptest::proptest! {
        #[test]
        fn classify_pair_is_pure(shade_a: u8, shade_b: u8, cx in 0.0f64..64.0, cy in 0.0f64..64.0) {
            let settings = Settings::default();
            let a = solid_frame(32, 32, shade_a, (cx, cy));
            let b = solid_frame(32, 32, shade_b, (cx, cy));
            let first = classify_pair(&a, &b, &settings);
            let second = classify_pair(&a, &b, &settings);
            prop_assert_eq!(first, second);
        }
    }
}
