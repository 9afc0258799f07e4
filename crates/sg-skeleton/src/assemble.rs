//! Graph assembly from traced paths.

use std::collections::HashSet;

use sg_core::GridPoint;

use crate::graph::{GraphEdge, Node, NodeKind, SkeletonGraph};
use crate::junction::EndpointPlan;
use crate::trace::PathRecord;

/// Removes raw junction-attached endpoint pixels from every path, leaving
/// the centroid that was added in their place. Centroids themselves are
/// never removed. Paths left empty are dropped.
pub fn strip_attachment_pixels(
    paths: &mut Vec<PathRecord>,
    plan: &EndpointPlan,
    centroids: &[GridPoint],
) {
    let centroids: HashSet<GridPoint> = centroids.iter().copied().collect();
    for path in paths.iter_mut() {
        path.points
            .retain(|p| centroids.contains(p) || plan.attachment_of(*p).is_none());
        path.dedup_consecutive();
    }
    paths.retain(|p| !p.points.is_empty());
}

/// Builds the undirected graph of all `paths`.
///
/// Node ids number the distinct referenced points in `(col, row)` order, so
/// they depend only on the point set. Each consecutive pair along a path
/// adds one edge unless the pair already exists or is a self-loop. Points
/// listed in `centroids` become [`NodeKind::Junction`] nodes; all others are
/// typed by degree.
pub fn assemble_graph(
    width: usize,
    height: usize,
    paths: &[PathRecord],
    centroids: &[GridPoint],
) -> SkeletonGraph {
    let mut points: Vec<GridPoint> = paths
        .iter()
        .flat_map(|p| p.points.iter().copied())
        .collect();
    points.sort_by(GridPoint::cmp_column_major);
    points.dedup();

    let id_of = |p: GridPoint| {
        points
            .binary_search_by(|q| q.cmp_column_major(&p))
            .ok()
    };

    let mut nodes: Vec<Node> = points
        .iter()
        .enumerate()
        .map(|(id, &p)| Node {
            id,
            kind: NodeKind::Isolated,
            pos: p.to_point2f(),
            idx: p,
            degree: 0,
            incident_edges: Vec::new(),
        })
        .collect();

    let mut edges = Vec::new();
    let mut seen = HashSet::new();
    for path in paths {
        for w in path.points.windows(2) {
            let (Some(u), Some(v)) = (id_of(w[0]), id_of(w[1])) else {
                continue;
            };
            if u == v {
                continue;
            }

            let (a, b) = (u.min(v), u.max(v));
            if !seen.insert((a, b)) {
                continue;
            }

            let id = edges.len();
            edges.push(GraphEdge { id, a, b });
            nodes[a].incident_edges.push(id);
            nodes[b].incident_edges.push(id);
        }
    }

    let centroids: HashSet<GridPoint> = centroids.iter().copied().collect();
    for node in &mut nodes {
        node.degree = node.incident_edges.len();
        node.kind = if centroids.contains(&node.idx) {
            NodeKind::Junction
        } else {
            NodeKind::from_degree(node.degree)
        };
    }

    SkeletonGraph {
        width,
        height,
        nodes,
        edges,
    }
}
