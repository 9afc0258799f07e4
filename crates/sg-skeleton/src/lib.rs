//! Topological graph extraction from thinned skeleton masks.
//!
//! The pipeline consumes a one-pixel-wide [`PixelMask`](sg_core::PixelMask)
//! and runs five stages in order:
//! 1. **Topology** – pixels with one foreground 8-neighbor are endpoints,
//!    pixels with more than two are junction candidates.
//! 2. **Junctions** – 8-connected candidates collapse into clusters, each
//!    represented by its rounded centroid. Candidates are erased from a
//!    working copy of the mask and the remaining segment endpoints are
//!    classified by how many clusters they touch.
//! 3. **Tracing** – segments are walked from their endpoints in a fixed
//!    neighbor priority order, consuming pixels and emitting a sample every
//!    `step_length` of arc length. Ends next to a junction are replaced by
//!    the cluster centroid.
//! 4. **Cycles** – foreground left after tracing forms closed loops; each
//!    is walked from its leftmost-topmost pixel and closed on that pixel.
//! 5. **Assembly** – distinct path points become nodes numbered in
//!    `(col, row)` order; consecutive points along a path become edges.
//!
//! Node positions use `x = col`, `y = row`.
//!
//! Degenerate input never fails: isolated pixels, unclosed leftovers and
//! ambiguous junction contacts fall back to simple representations and are
//! counted in [`ExtractionStats`]. Only a zero-sized mask or an invalid
//! `step_length` is rejected.

mod assemble;
mod config;
mod cycle;
mod error;
mod extract;
mod graph;
mod junction;
mod stats;
#[cfg(test)]
mod test_utils;
mod topology;
mod trace;

pub use assemble::{assemble_graph, strip_attachment_pixels};
pub use config::ExtractConfig;
pub use cycle::{canonical_start, label_components, recover_cycles};
pub use error::ExtractError;
pub use extract::{
    Extraction, TracedSkeleton, extract, extract_graph, extract_graph_from_u8, trace_skeleton,
};
pub use graph::{EdgeId, GraphEdge, Node, NodeId, NodeKind, SkeletonGraph};
pub use junction::{
    Attachment, ClusterId, EndpointPlan, JunctionCluster, JunctionClusters, plan_endpoints,
};
pub use stats::ExtractionStats;
pub use topology::{PixelClass, Topology, detect_topology, foreground_neighbors};
pub use trace::{
    PathKind, PathRecord, next_unvisited, sample_trail, trace_endpoints, walk, walk_trail,
};
