//! Arc-length sampled walking over the shared working mask.
//!
//! A walk consumes every pixel it steps on (the pixel is cleared in the
//! working mask), so no pixel is visited twice in one extraction call.

use serde::{Deserialize, Serialize};
use sg_core::{GridPoint, NEIGHBORS_8, PixelMask};

use crate::junction::{Attachment, EndpointPlan, JunctionClusters};
use crate::stats::ExtractionStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    /// Segment walked from an endpoint.
    Open,
    /// Direct link between two junction centroids.
    Bridge,
    /// Closed loop; first and last points coincide.
    Cycle,
    /// Single pixel with no neighbors.
    Isolated,
    /// Leftover component that could not be closed into a loop.
    Remainder,
}

/// Ordered samples along one skeleton segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRecord {
    pub kind: PathKind,
    pub points: Vec<GridPoint>,
}

impl PathRecord {
    pub fn new(kind: PathKind, points: Vec<GridPoint>) -> Self {
        Self { kind, points }
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }

    /// Euclidean length of the sample polyline.
    pub fn polyline_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| {
                let dr = w[0].row as f64 - w[1].row as f64;
                let dc = w[0].col as f64 - w[1].col as f64;
                (dr * dr + dc * dc).sqrt()
            })
            .sum()
    }

    pub(crate) fn dedup_consecutive(&mut self) {
        self.points.dedup();
    }
}

/// First unconsumed foreground neighbor of `p` in priority order, with the
/// cost of stepping to it.
pub fn next_unvisited(mask: &PixelMask, p: GridPoint) -> Option<(GridPoint, f64)> {
    NEIGHBORS_8.iter().find_map(|s| {
        let q = p.offset(s)?;
        mask.is_foreground(q).then_some((q, s.cost))
    })
}

/// Consumes pixels from `start` until no unconsumed neighbor remains.
///
/// Each entry is a consumed pixel with the cost of the step that reached
/// it; the first entry is `start` with cost 0.
pub fn walk_trail(mask: &mut PixelMask, start: GridPoint) -> Vec<(GridPoint, f64)> {
    let mut trail = vec![(start, 0.0)];
    let mut cur = start;
    mask.set(start, false);

    while let Some((next, cost)) = next_unvisited(mask, cur) {
        mask.set(next, false);
        trail.push((next, cost));
        cur = next;
    }

    trail
}

/// Arc-length sampling of a trail.
///
/// The first pixel is always a sample; a further sample is emitted each time
/// the accumulated arc length reaches `step_length`, and the final pixel is
/// appended if the last step did not emit it.
pub fn sample_trail(trail: &[(GridPoint, f64)], step_length: f64) -> Vec<GridPoint> {
    let mut samples = Vec::new();
    let mut acc = 0.0_f64;

    for (i, &(p, cost)) in trail.iter().enumerate() {
        acc += cost;
        if i == 0 || acc >= step_length {
            samples.push(p);
            acc = 0.0;
        }
    }

    if let Some(&(last, _)) = trail.last()
        && samples.last() != Some(&last)
    {
        samples.push(last);
    }
    samples
}

/// Walks from `start` and returns the arc-length samples of the walk.
pub fn walk(mask: &mut PixelMask, start: GridPoint, step_length: f64) -> Vec<GridPoint> {
    sample_trail(&walk_trail(mask, start), step_length)
}

/// Traces every segment reachable from an endpoint, plus the degenerate
/// segments found during planning (bridges, isolated pixels).
///
/// Attached endpoints are walked before free ones. Path ends that touch a
/// junction get the cluster centroid added beyond them; the raw end pixels
/// are stripped later, before assembly.
pub fn trace_endpoints(
    working: &mut PixelMask,
    plan: &EndpointPlan,
    clusters: &JunctionClusters,
    step_length: f64,
    stats: &mut ExtractionStats,
) -> Vec<PathRecord> {
    let mut paths = Vec::new();

    for &(p, a, b) in &plan.bridges {
        working.set(p, false);
        paths.push(PathRecord::new(
            PathKind::Bridge,
            vec![clusters.centroid(a), clusters.centroid(b)],
        ));
        stats.bridges += 1;
    }

    for &(p, attachment) in &plan.isolated {
        working.set(p, false);
        let path = match attachment {
            Attachment::Attached(c) => {
                stats.open_paths += 1;
                PathRecord::new(PathKind::Open, vec![clusters.centroid(c), p])
            }
            Attachment::Bridge(a, b) => {
                stats.bridges += 1;
                PathRecord::new(
                    PathKind::Bridge,
                    vec![clusters.centroid(a), clusters.centroid(b)],
                )
            }
            Attachment::Free | Attachment::Ambiguous(_) => {
                stats.isolated_pixels += 1;
                PathRecord::new(PathKind::Isolated, vec![p])
            }
        };
        paths.push(path);
    }

    let starts = plan
        .attached
        .iter()
        .map(|&(p, _)| p)
        .chain(plan.free.iter().copied());

    for start in starts {
        if !working.is_foreground(start) {
            stats.skipped_starts += 1;
            continue;
        }

        let mut points = walk(working, start, step_length);
        if let Some(c) = plan.attachment_of(start) {
            points.insert(0, clusters.centroid(c));
        }
        let end = points[points.len() - 1];
        if end != start
            && let Some(c) = plan.attachment_of(end)
        {
            points.push(clusters.centroid(c));
        }

        stats.open_paths += 1;
        paths.push(PathRecord::new(PathKind::Open, points));
    }

    paths
}
