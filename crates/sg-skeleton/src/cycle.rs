//! Recovery of closed loops left over after endpoint tracing.

use core::f64::consts::SQRT_2;

use sg_core::{GridPoint, PixelMask};

use crate::stats::ExtractionStats;
use crate::trace::{PathKind, PathRecord, sample_trail, walk_trail};

/// 8-connected foreground components, ordered by their first pixel in
/// row-major order.
pub fn label_components(mask: &PixelMask) -> Vec<Vec<GridPoint>> {
    let mut seen = PixelMask::new_fill(mask.width(), mask.height(), false);
    let mut components = Vec::new();
    let mut stack = Vec::new();

    for seed in mask.foreground() {
        if seen.is_foreground(seed) {
            continue;
        }

        let mut component = Vec::new();
        seen.set(seed, true);
        stack.push(seed);

        while let Some(p) = stack.pop() {
            component.push(p);
            for q in p.neighbors() {
                if mask.is_foreground(q) && !seen.is_foreground(q) {
                    seen.set(q, true);
                    stack.push(q);
                }
            }
        }

        components.push(component);
    }

    components
}

/// Leftmost-then-topmost pixel of a component.
pub fn canonical_start(component: &[GridPoint]) -> Option<GridPoint> {
    component.iter().copied().min_by(GridPoint::cmp_column_major)
}

/// Samples of a closed trail: one sample at the start and two more at a
/// third and two thirds of the perimeter, closed on the start.
///
/// `trail` must hold at least three pixels.
fn ring_samples(trail: &[(GridPoint, f64)]) -> Vec<GridPoint> {
    let n = trail.len();
    let start = trail[0].0;
    let end = trail[n - 1].0;
    let closing = if end.row != start.row && end.col != start.col {
        SQRT_2
    } else {
        1.0
    };

    let mut cumulative = Vec::with_capacity(n);
    let mut acc = 0.0_f64;
    for &(_, cost) in trail {
        acc += cost;
        cumulative.push(acc);
    }
    let perimeter = acc + closing;

    let reach = |target: f64| {
        cumulative
            .iter()
            .position(|&c| c >= target)
            .unwrap_or(n - 1)
    };
    let first = reach(perimeter / 3.0).clamp(1, n - 2);
    let second = reach(2.0 * perimeter / 3.0).clamp(first + 1, n - 1);

    vec![start, trail[first].0, trail[second].0, start]
}

/// Traces every component still present in `working` until it is empty.
///
/// A walk of three or more pixels that ends next to its start pixel is
/// closed by replacing its final sample with the start. Closed walks keep at
/// least three distinct samples; when arc-length sampling yields fewer, the
/// ring is resampled at thirds of its perimeter. Anything else is kept as
/// an open remainder.
pub fn recover_cycles(
    working: &mut PixelMask,
    step_length: f64,
    stats: &mut ExtractionStats,
) -> Vec<PathRecord> {
    let mut paths = Vec::new();

    loop {
        let components = label_components(working);
        if components.is_empty() {
            break;
        }

        for component in &components {
            let Some(start) = canonical_start(component) else {
                continue;
            };

            let trail = walk_trail(working, start);
            let mut points = sample_trail(&trail, step_length);
            let end = trail[trail.len() - 1].0;

            let kind = if trail.len() == 1 {
                stats.isolated_pixels += 1;
                PathKind::Isolated
            } else if trail.len() >= 3 && end.is_adjacent(start) {
                if let Some(last) = points.last_mut() {
                    *last = start;
                }
                if points.len() < 4 {
                    points = ring_samples(&trail);
                }
                stats.cycles += 1;
                PathKind::Cycle
            } else {
                tracing::warn!(
                    row = start.row,
                    col = start.col,
                    pixels = component.len(),
                    "leftover component does not close into a loop"
                );
                stats.unclosed_remainders += 1;
                PathKind::Remainder
            };

            paths.push(PathRecord::new(kind, points));
        }
    }

    paths
}
