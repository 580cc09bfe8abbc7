//! Motion Planner: a pure, deterministic cursor trajectory generator
//! (spec.md §4.8).
//!
//! Grounded on `hotki-world::frames`'s pure rect/delta geometry helpers: no
//! I/O, no hidden state, total functions over plain data.
#![warn(missing_docs)]

use gaze_protocol::Rect;

/// Interval, in milliseconds, between consecutive planned points. Not a
/// real-time clock: it only sizes each step so the implied speed stays
/// under `motion_speed_pixels_per_sec`.
const TICK_MS: f64 = 16.0;

/// Style of trajectory to generate between two points (spec.md §4.8).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrajectoryKind {
    /// Straight-line interpolation.
    Direct,
    /// Detours around zones marked "avoid" (drag avoidance).
    Safe,
    /// Sweeps a grid to elicit hover tooltips.
    Exploratory,
}

/// Build a trajectory from `from` to `to` of the given `kind`, bounding
/// consecutive step size so the effective speed never exceeds
/// `speed_pixels_per_sec`. `avoid` only affects [`TrajectoryKind::Safe`].
/// Pure and deterministic: identical inputs always produce an identical
/// output.
#[must_use]
pub fn plan(
    from: (f64, f64),
    to: (f64, f64),
    kind: TrajectoryKind,
    avoid: &[Rect],
    speed_pixels_per_sec: f64,
) -> Vec<(f64, f64)> {
    match kind {
        TrajectoryKind::Direct => direct(from, to, speed_pixels_per_sec),
        TrajectoryKind::Safe => safe(from, to, avoid, speed_pixels_per_sec),
        TrajectoryKind::Exploratory => exploratory(from, to, speed_pixels_per_sec),
    }
}

fn max_step(speed_pixels_per_sec: f64) -> f64 {
    (speed_pixels_per_sec.max(1.0) * (TICK_MS / 1000.0)).max(1.0)
}

fn interpolate(from: (f64, f64), to: (f64, f64), speed_pixels_per_sec: f64) -> Vec<(f64, f64)> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let distance = dx.hypot(dy);
    if distance == 0.0 {
        return vec![to];
    }
    let step = max_step(speed_pixels_per_sec);
    let steps = (distance / step).ceil().max(1.0) as u32;
    (1..=steps)
        .map(|i| {
            let t = f64::from(i) / f64::from(steps);
            (from.0 + dx * t, from.1 + dy * t)
        })
        .collect()
}

fn direct(from: (f64, f64), to: (f64, f64), speed: f64) -> Vec<(f64, f64)> {
    interpolate(from, to, speed)
}

fn segment_hits(rect: &Rect, from: (f64, f64), to: (f64, f64)) -> bool {
    let bbox = Rect::new(
        from.0.min(to.0),
        from.1.min(to.1),
        (from.0 - to.0).abs(),
        (from.1 - to.1).abs(),
    );
    !(bbox.x + bbox.w < rect.x
        || rect.x + rect.w < bbox.x
        || bbox.y + bbox.h < rect.y
        || rect.y + rect.h < bbox.y)
}

/// Waypoint just outside `rect`'s corner nearest the direct path's midpoint,
/// used to route around an "avoid" zone.
fn detour_waypoint(rect: &Rect, from: (f64, f64), to: (f64, f64)) -> (f64, f64) {
    let mid = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
    let corners = [
        (rect.x, rect.y),
        (rect.x + rect.w, rect.y),
        (rect.x, rect.y + rect.h),
        (rect.x + rect.w, rect.y + rect.h),
    ];
    let margin = 8.0;
    corners
        .into_iter()
        .map(|(cx, cy)| {
            let ox = if cx <= rect.x + rect.w / 2.0 { cx - margin } else { cx + margin };
            let oy = if cy <= rect.y + rect.h / 2.0 { cy - margin } else { cy + margin };
            (ox, oy)
        })
        .min_by(|a, b| {
            let da = (a.0 - mid.0).hypot(a.1 - mid.1);
            let db = (b.0 - mid.0).hypot(b.1 - mid.1);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(mid)
}

fn safe(from: (f64, f64), to: (f64, f64), avoid: &[Rect], speed: f64) -> Vec<(f64, f64)> {
    let blocking = avoid.iter().find(|rect| segment_hits(rect, from, to));
    match blocking {
        None => direct(from, to, speed),
        Some(rect) => {
            let waypoint = detour_waypoint(rect, from, to);
            let mut points = interpolate(from, waypoint, speed);
            points.extend(interpolate(waypoint, to, speed));
            points
        }
    }
}

/// Number of grid rows/columns an exploratory sweep visits.
const EXPLORATORY_GRID: u32 = 3;

fn exploratory(from: (f64, f64), to: (f64, f64), speed: f64) -> Vec<(f64, f64)> {
    let (x0, y0) = from;
    let (x1, y1) = to;
    let mut waypoints = Vec::new();
    for row in 0..EXPLORATORY_GRID {
        let ty = f64::from(row) / f64::from(EXPLORATORY_GRID - 1).max(1.0);
        let y = y0 + (y1 - y0) * ty;
        let cols: Box<dyn Iterator<Item = u32>> = if row % 2 == 0 {
            Box::new(0..EXPLORATORY_GRID)
        } else {
            Box::new((0..EXPLORATORY_GRID).rev())
        };
        for col in cols {
            let tx = f64::from(col) / f64::from(EXPLORATORY_GRID - 1).max(1.0);
            let x = x0 + (x1 - x0) * tx;
            waypoints.push((x, y));
        }
    }

    let mut points = Vec::new();
    let mut cursor = from;
    for waypoint in waypoints {
        points.extend(interpolate(cursor, waypoint, speed));
        cursor = waypoint;
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_consecutive_step(points: &[(f64, f64)], start: (f64, f64)) -> f64 {
        let mut prev = start;
        let mut max = 0.0_f64;
        for p in points {
            let step = (p.0 - prev.0).hypot(p.1 - prev.1);
            max = max.max(step);
            prev = *p;
        }
        max
    }

    #[test]
    fn direct_ends_exactly_at_the_target() {
        let points = plan((0.0, 0.0), (100.0, 0.0), TrajectoryKind::Direct, &[], 1500.0);
        assert_eq!(*points.last().unwrap(), (100.0, 0.0));
    }

    #[test]
    fn direct_respects_the_speed_bound() {
        let from = (0.0, 0.0);
        let points = plan(from, (1000.0, 0.0), TrajectoryKind::Direct, &[], 500.0);
        let max_step_allowed = max_step(500.0) + 1e-9;
        assert!(max_consecutive_step(&points, from) <= max_step_allowed);
    }

    #[test]
    fn zero_distance_yields_a_single_point() {
        let points = plan((5.0, 5.0), (5.0, 5.0), TrajectoryKind::Direct, &[], 1500.0);
        assert_eq!(points, vec![(5.0, 5.0)]);
    }

    #[test]
    fn safe_detours_around_a_blocking_zone() {
        let avoid = Rect::new(40.0, -10.0, 20.0, 20.0);
        let direct_points = plan((0.0, 0.0), (100.0, 0.0), TrajectoryKind::Direct, &[], 1500.0);
        let safe_points = plan((0.0, 0.0), (100.0, 0.0), TrajectoryKind::Safe, &[avoid], 1500.0);
        assert_ne!(direct_points, safe_points);
        assert_eq!(*safe_points.last().unwrap(), (100.0, 0.0));
    }

    #[test]
    fn safe_is_direct_when_nothing_blocks() {
        let avoid = Rect::new(500.0, 500.0, 10.0, 10.0);
        let direct_points = plan((0.0, 0.0), (100.0, 0.0), TrajectoryKind::Direct, &[], 1500.0);
        let safe_points = plan((0.0, 0.0), (100.0, 0.0), TrajectoryKind::Safe, &[avoid], 1500.0);
        assert_eq!(direct_points, safe_points);
    }

    #[test]
    fn exploratory_visits_the_full_span() {
        let points = plan((0.0, 0.0), (90.0, 90.0), TrajectoryKind::Exploratory, &[], 1500.0);
        assert!(points.iter().any(|(x, _)| *x > 80.0));
        assert!(points.iter().any(|(_, y)| *y > 80.0));
    }

    proptest::proptest! {
        #[test]
        fn plan_is_pure(
            fx in -500.0f64..500.0, fy in -500.0f64..500.0,
            tx in -500.0f64..500.0, ty in -500.0f64..500.0,
            speed in 1.0f64..3000.0,
        ) {
            let a = plan((fx, fy), (tx, ty), TrajectoryKind::Direct, &[], speed);
            let b = plan((fx, fy), (tx, ty), TrajectoryKind::Direct, &[], speed);
            prop_assert_eq!(a, b);
        }
    }
}
