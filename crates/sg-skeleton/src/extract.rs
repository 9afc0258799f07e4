use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sg_core::{GridPoint, ImageView, MaskPolarity, PixelMask, mask_from_u8};

use crate::assemble::{assemble_graph, strip_attachment_pixels};
use crate::config::ExtractConfig;
use crate::cycle::recover_cycles;
use crate::error::ExtractError;
use crate::graph::SkeletonGraph;
use crate::junction::{JunctionCluster, JunctionClusters, plan_endpoints};
use crate::stats::ExtractionStats;
use crate::topology::detect_topology;
use crate::trace::{PathKind, PathRecord, trace_endpoints};

/// Traced paths of one skeleton, ready for graph assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracedSkeleton {
    pub width: usize,
    pub height: usize,
    pub paths: Vec<PathRecord>,
    pub junctions: Vec<JunctionCluster>,
    pub stats: ExtractionStats,
}

impl TracedSkeleton {
    pub fn centroids(&self) -> Vec<GridPoint> {
        self.junctions.iter().map(|j| j.centroid).collect()
    }

    pub fn to_graph(&self) -> SkeletonGraph {
        assemble_graph(self.width, self.height, &self.paths, &self.centroids())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub graph: SkeletonGraph,
    pub traced: TracedSkeleton,
}

/// Runs detection, clustering, endpoint tracing and loop recovery.
///
/// The input mask is never modified; the call owns one junction-erased
/// working copy that tracing consumes.
pub fn trace_skeleton(
    mask: &PixelMask,
    cfg: &ExtractConfig,
) -> Result<TracedSkeleton, ExtractError> {
    if mask.is_empty() {
        return Err(ExtractError::EmptyMask {
            width: mask.width(),
            height: mask.height(),
        });
    }
    cfg.validate()?;

    let mut stats = ExtractionStats::default();

    let topo = detect_topology(mask);
    stats.endpoints = topo.endpoints.len();
    stats.junction_candidates = topo.junction_candidates.len();

    let clusters = JunctionClusters::build(mask.width(), mask.height(), &topo.junction_candidates);
    stats.junction_clusters = clusters.len();
    tracing::debug!(
        endpoints = stats.endpoints,
        junction_candidates = stats.junction_candidates,
        junction_clusters = stats.junction_clusters,
        "skeleton topology detected"
    );

    let mut working = clusters.erase_from(mask);
    let plan = plan_endpoints(&working, &clusters);
    stats.attached_endpoints = plan.attached.len();
    stats.ambiguous_endpoints = plan.ambiguous;

    let mut paths = trace_endpoints(&mut working, &plan, &clusters, cfg.step_length, &mut stats);
    tracing::debug!(
        paths = paths.len(),
        remaining_pixels = working.count_foreground(),
        "endpoint tracing done"
    );

    paths.extend(recover_cycles(&mut working, cfg.step_length, &mut stats));

    let centroids: Vec<GridPoint> = clusters.clusters().iter().map(|c| c.centroid).collect();
    strip_attachment_pixels(&mut paths, &plan, &centroids);

    let referenced: HashSet<GridPoint> = paths
        .iter()
        .flat_map(|p| p.points.iter().copied())
        .collect();
    for &c in &centroids {
        if !referenced.contains(&c) {
            stats.orphan_junctions += 1;
            paths.push(PathRecord::new(PathKind::Isolated, vec![c]));
        }
    }

    tracing::debug!(
        paths = paths.len(),
        open = stats.open_paths,
        bridges = stats.bridges,
        cycles = stats.cycles,
        skipped_starts = stats.skipped_starts,
        "skeleton traced"
    );

    Ok(TracedSkeleton {
        width: mask.width(),
        height: mask.height(),
        paths,
        junctions: clusters.into_clusters(),
        stats,
    })
}

pub fn extract(mask: &PixelMask, cfg: &ExtractConfig) -> Result<Extraction, ExtractError> {
    let traced = trace_skeleton(mask, cfg)?;
    let graph = traced.to_graph();
    tracing::debug!(
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        "skeleton graph assembled"
    );
    Ok(Extraction { graph, traced })
}

pub fn extract_graph(mask: &PixelMask, cfg: &ExtractConfig) -> Result<SkeletonGraph, ExtractError> {
    extract(mask, cfg).map(|e| e.graph)
}

/// Converts an 8-bit skeleton raster with the given polarity and extracts
/// its graph.
pub fn extract_graph_from_u8(
    img: &ImageView<'_, u8>,
    polarity: MaskPolarity,
    cfg: &ExtractConfig,
) -> Result<SkeletonGraph, ExtractError> {
    let mask = mask_from_u8(img, polarity);
    extract_graph(&mask, cfg)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use sg_core::{GridPoint, Image, ImageView, MaskPolarity, PixelMask, Point2f};

    use super::{extract, extract_graph, extract_graph_from_u8, trace_skeleton};
    use crate::config::ExtractConfig;
    use crate::error::ExtractError;
    use crate::graph::NodeKind;
    use crate::test_utils::mask_from_rows;
    use crate::trace::PathKind;

    const Y_SHAPE: [&str; 7] = [
        "....#....",
        "....#....",
        "....#....",
        "....#....",
        "...#.#...",
        "..#...#..",
        ".#.....#.",
    ];

    const RING: [&str; 5] = [".###.", "#...#", "#...#", "#...#", ".###."];

    const LOLLIPOP: [&str; 5] = [
        "....###.",
        "...#...#",
        "####...#",
        "...#...#",
        "....###.",
    ];

    const DOUBLE_CROSS: [&str; 5] = [
        "..#...#..",
        "..#...#..",
        "#########",
        "..#...#..",
        "..#...#..",
    ];

    fn cfg(step_length: f64) -> ExtractConfig {
        ExtractConfig { step_length }
    }

    #[test]
    fn straight_line_keeps_true_endpoints() {
        let mask = mask_from_rows(&["........", ".######.", "........"]);

        let g = extract_graph(&mask, &cfg(100.0)).expect("extract");
        assert_eq!(g.num_nodes(), 2);
        assert_eq!(g.num_edges(), 1);
        assert_eq!(g.nodes[0].pos, Point2f { x: 1.0, y: 1.0 });
        assert_eq!(g.nodes[1].pos, Point2f { x: 6.0, y: 1.0 });

        for step in [1.0, 2.0, 2.5, 4.0, 100.0] {
            let g = extract_graph(&mask, &cfg(step)).expect("extract");
            assert_eq!(g.num_ends(), 2, "step {step}");
            assert_eq!(g.num_edges(), g.num_nodes() - 1, "step {step}");
            assert_eq!(g.connected_components().len(), 1, "step {step}");

            let ends: Vec<GridPoint> = g.iter_ends().map(|n| n.idx).collect();
            assert_eq!(ends, vec![GridPoint::new(1, 1), GridPoint::new(1, 6)]);
        }
    }

    #[test]
    fn closed_ring_is_a_simple_cycle() {
        let mask = mask_from_rows(&RING);
        let out = extract(&mask, &cfg(2.0)).expect("extract");
        let g = &out.graph;

        assert_eq!(g.num_nodes(), 6);
        assert_eq!(g.num_edges(), 6);
        assert_eq!(g.num_ends(), 0);
        assert!(g.nodes.iter().all(|n| n.degree == 2));
        assert_eq!(g.connected_components().len(), 1);

        assert_eq!(out.traced.stats.cycles, 1);
        assert_eq!(out.traced.paths.len(), 1);
        assert!(out.traced.paths[0].is_closed());
    }

    #[test]
    fn small_rings_stay_cycles_at_any_step() {
        let diamond = [".#.", "#.#", ".#."];
        for rows in [&RING[..], &diamond[..]] {
            for step in [1.0, 2.0, 5.0, 10.0, 100.0] {
                let mask = mask_from_rows(rows);
                let g = extract_graph(&mask, &cfg(step)).expect("extract");

                assert!(g.num_nodes() >= 3, "step {step}");
                assert_eq!(g.num_nodes(), g.num_edges(), "step {step}");
                assert_eq!(g.num_ends(), 0, "step {step}");
                assert!(g.nodes.iter().all(|n| n.kind == NodeKind::Chain));
                assert_eq!(g.connected_components().len(), 1, "step {step}");
            }
        }

        let g = extract_graph(&mask_from_rows(&RING), &ExtractConfig::default()).expect("extract");
        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_edges(), 3);
    }

    #[test]
    fn y_shape_has_one_centroid_and_three_arms() {
        let mask = mask_from_rows(&Y_SHAPE);
        let out = extract(&mask, &cfg(100.0)).expect("extract");
        let g = &out.graph;

        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.num_edges(), 3);
        assert_eq!(g.num_junctions(), 1);
        assert_eq!(g.num_ends(), 3);

        let j = g.iter_junctions().next().expect("junction node");
        assert_eq!(j.idx, GridPoint::new(3, 4));
        assert_eq!(j.pos, Point2f { x: 4.0, y: 3.0 });
        assert_eq!(j.degree, 3);

        for end in [
            GridPoint::new(0, 4),
            GridPoint::new(6, 1),
            GridPoint::new(6, 7),
        ] {
            let id = g.node_at(end).expect("arm end is a node");
            assert!(g.has_edge(id, j.id));
        }

        // raw pixels next to the junction never become nodes
        for raw in [
            GridPoint::new(2, 4),
            GridPoint::new(4, 3),
            GridPoint::new(4, 5),
        ] {
            assert_eq!(g.node_at(raw), None);
        }

        let stats = out.traced.stats;
        assert_eq!(stats.junction_clusters, 1);
        assert_eq!(stats.attached_endpoints, 3);
        assert_eq!(stats.open_paths, 3);
        assert_eq!(stats.skipped_starts, 3);
    }

    #[test]
    fn loop_through_junction_closes_on_centroid() {
        let mask = mask_from_rows(&LOLLIPOP);
        let out = extract(&mask, &cfg(2.0)).expect("extract");
        let g = &out.graph;

        let order: Vec<GridPoint> = g.nodes.iter().map(|n| n.idx).collect();
        assert_eq!(
            order,
            vec![
                GridPoint::new(2, 0),
                GridPoint::new(2, 3),
                GridPoint::new(0, 6),
                GridPoint::new(4, 6),
                GridPoint::new(2, 7),
            ]
        );
        let edges: Vec<(usize, usize)> = g.iter_edges().map(|e| (e.a, e.b)).collect();
        assert_eq!(edges, vec![(0, 1), (1, 2), (2, 4), (3, 4), (1, 3)]);
        assert_eq!(g.nodes[1].kind, NodeKind::Junction);
        assert_eq!(g.degree(1), 3);
        assert_eq!(out.traced.stats.cycles, 0);
        assert_eq!(out.traced.stats.skipped_starts, 2);
    }

    #[test]
    fn pixels_isolated_by_erasure_become_spurs_and_bridges() {
        let mask = mask_from_rows(&DOUBLE_CROSS);
        let out = extract(&mask, &cfg(10.0)).expect("extract");
        let g = &out.graph;

        assert_eq!(g.num_nodes(), 8);
        assert_eq!(g.num_edges(), 7);
        assert_eq!(g.num_junctions(), 2);
        assert_eq!(g.num_ends(), 6);

        let a = g.node_at(GridPoint::new(2, 2)).expect("left centroid");
        let b = g.node_at(GridPoint::new(2, 6)).expect("right centroid");
        assert!(g.has_edge(a, b));
        assert_eq!(g.node_at(GridPoint::new(2, 4)), None);
        assert_eq!(out.traced.stats.bridges, 1);
    }

    #[test]
    fn isolated_pixel_is_a_single_node() {
        let mask = mask_from_rows(&["...", ".#.", "..."]);
        let out = extract(&mask, &cfg(3.0)).expect("extract");

        assert_eq!(out.graph.num_nodes(), 1);
        assert_eq!(out.graph.num_edges(), 0);
        assert_eq!(out.graph.nodes[0].kind, NodeKind::Isolated);
        assert_eq!(out.traced.paths[0].kind, PathKind::Isolated);
        assert_eq!(out.traced.stats.isolated_pixels, 1);
    }

    #[test]
    fn solid_blob_keeps_its_centroid() {
        let mask = mask_from_rows(&["....", ".##.", ".##.", "...."]);
        let out = extract(&mask, &cfg(3.0)).expect("extract");

        assert_eq!(out.graph.num_nodes(), 1);
        assert_eq!(out.graph.nodes[0].kind, NodeKind::Junction);
        assert_eq!(out.traced.stats.orphan_junctions, 1);
    }

    #[test]
    fn empty_foreground_gives_empty_graph() {
        let mask = PixelMask::new_fill(4, 3, false);
        let g = extract_graph(&mask, &cfg(5.0)).expect("extract");
        assert_eq!(g.num_nodes(), 0);
        assert_eq!(g.num_edges(), 0);
        assert_eq!((g.width, g.height), (4, 3));
    }

    #[test]
    fn invalid_parameters_abort() {
        let empty = PixelMask::new_fill(0, 5, false);
        assert_eq!(
            extract_graph(&empty, &cfg(5.0)),
            Err(ExtractError::EmptyMask {
                width: 0,
                height: 5
            })
        );

        let mask = mask_from_rows(&["##"]);
        assert_eq!(
            extract_graph(&mask, &cfg(0.0)),
            Err(ExtractError::InvalidStepLength(0.0))
        );
        assert!(extract_graph(&mask, &cfg(-2.0)).is_err());
    }

    #[test]
    fn disjoint_components_stay_disconnected() {
        let mask = mask_from_rows(&[
            ".###.....",
            "#...#....",
            "#...#..#.",
            "#...#..#.",
            ".###...#.",
        ]);
        let g = extract_graph(&mask, &cfg(2.0)).expect("extract");

        let components = g.connected_components();
        assert_eq!(components.len(), 2);
        assert_eq!(g.num_ends(), 2);
    }

    #[test]
    fn repeated_extraction_is_identical() {
        let mask = mask_from_rows(&LOLLIPOP);
        let a = extract(&mask, &cfg(1.5)).expect("extract");
        let b = extract(&mask, &cfg(1.5)).expect("extract");
        assert_eq!(a, b);
    }

    #[test]
    fn no_pixel_is_interior_to_two_paths() {
        for rows in [&Y_SHAPE[..], &RING[..], &LOLLIPOP[..], &DOUBLE_CROSS[..]] {
            let mask = mask_from_rows(rows);
            let traced = trace_skeleton(&mask, &cfg(1.0)).expect("trace");

            let mut seen = HashSet::new();
            for path in &traced.paths {
                if path.points.len() < 3 {
                    continue;
                }
                for &p in &path.points[1..path.points.len() - 1] {
                    assert!(seen.insert(p), "{p:?} interior to two paths");
                    assert!(mask.is_foreground(p));
                }
            }
        }
    }

    #[test]
    fn input_mask_is_untouched() {
        let mask = mask_from_rows(&Y_SHAPE);
        let before = mask.clone();
        extract_graph(&mask, &cfg(2.0)).expect("extract");
        assert_eq!(mask, before);
    }

    #[test]
    fn dark_strokes_on_white_paper() {
        let mut data = vec![255u8; 15];
        for x in 1..4 {
            data[5 + x] = 0;
        }
        let img = Image::from_vec(5, 3, data).expect("valid image");
        let g = extract_graph_from_u8(&img.as_view(), MaskPolarity::Zero, &cfg(10.0))
            .expect("extract");

        assert_eq!(g.num_nodes(), 2);
        assert_eq!(g.nodes[0].pos, Point2f { x: 1.0, y: 1.0 });
        assert_eq!(g.nodes[1].pos, Point2f { x: 3.0, y: 1.0 });
    }

    #[test]
    fn graph_serializes_with_xy_positions() {
        let mask = mask_from_rows(&["###"]);
        let g = extract_graph(&mask, &cfg(10.0)).expect("extract");
        let json = serde_json::to_value(&g).expect("serialize");

        assert_eq!(json["nodes"][1]["pos"]["x"], 2.0);
        assert_eq!(json["nodes"][1]["pos"]["y"], 0.0);
        assert_eq!(json["nodes"][0]["kind"], "end");
        assert_eq!(json["edges"][0]["a"], 0);
        assert_eq!(json["edges"][0]["b"], 1);
    }

    #[test]
    fn padded_buffer_is_read_through_its_stride() {
        // 4x3 skeleton stored with two padding bytes per row
        let data = [
            0u8, 0, 0, 0, 9, 9, //
            255, 255, 255, 255, 9, 9, //
            0, 0, 0, 0, 9, 9,
        ];
        let view = ImageView::from_slice(4, 3, 6, &data).expect("valid view");
        let g = extract_graph_from_u8(&view, MaskPolarity::NonZero, &cfg(10.0)).expect("extract");

        assert_eq!((g.width, g.height), (4, 3));
        assert_eq!(g.num_nodes(), 2);
        assert_eq!(g.nodes[1].pos, Point2f { x: 3.0, y: 1.0 });
    }
}
