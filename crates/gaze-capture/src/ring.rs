use std::collections::VecDeque;

use gaze_protocol::Frame;

/// Bounded, drop-oldest ring of captured frames.
///
/// Grounded on `hotki-world::events::EventBuffer`: a `VecDeque` capped at a
/// fixed capacity, counting frames dropped rather than panicking or
/// blocking when full (spec.md §4.1).
pub struct CaptureRing {
    frames: VecDeque<Frame>,
    capacity: usize,
    lost_count: u64,
}

impl CaptureRing {
    /// Build a ring holding at most `capacity` frames. `capacity` is
    /// clamped to at least 1 so the ring is never unusable.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: VecDeque::new(),
            capacity: capacity.max(1),
            lost_count: 0,
        }
    }

    /// Push a newly captured frame, evicting the oldest if full.
    pub fn push(&mut self, frame: Frame) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
            self.lost_count = self.lost_count.saturating_add(1);
        }
        self.frames.push_back(frame);
    }

    /// The most recently pushed frame, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Frame> {
        self.frames.back().cloned()
    }

    /// Every frame with `from_ts <= timestamp_ms <= to_ts`, oldest first.
    #[must_use]
    pub fn range(&self, from_ts: u64, to_ts: u64) -> Vec<Frame> {
        self.frames
            .iter()
            .filter(|f| f.timestamp_ms >= from_ts && f.timestamp_ms <= to_ts)
            .cloned()
            .collect()
    }

    /// Total frames evicted by overflow since construction.
    #[must_use]
    pub fn lost_count(&self) -> u64 {
        self.lost_count
    }

    /// Number of frames currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when no frames are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn frame(t: u64) -> Frame {
        Frame::new(Arc::from(vec![0u8; 4]), 1, 1, t, (0.0, 0.0))
    }

    #[test]
    fn drops_oldest_and_counts_loss_when_full() {
        let mut ring = CaptureRing::new(2);
        ring.push(frame(1));
        ring.push(frame(2));
        ring.push(frame(3));
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.lost_count(), 1);
        assert_eq!(ring.range(0, 10).iter().map(|f| f.timestamp_ms).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn latest_returns_the_most_recent_frame() {
        let mut ring = CaptureRing::new(4);
        assert!(ring.latest().is_none());
        ring.push(frame(1));
        ring.push(frame(2));
        assert_eq!(ring.latest().unwrap().timestamp_ms, 2);
    }

    #[test]
    fn range_filters_by_inclusive_bounds() {
        let mut ring = CaptureRing::new(10);
        for t in [1, 5, 10, 15, 20] {
            ring.push(frame(t));
        }
        let got: Vec<u64> = ring.range(5, 15).iter().map(|f| f.timestamp_ms).collect();
        assert_eq!(got, vec![5, 10, 15]);
    }
}
