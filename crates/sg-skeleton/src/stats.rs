use serde::{Deserialize, Serialize};

/// Counters collected during one extraction call.
///
/// Fallback counters (`ambiguous_endpoints`, `skipped_starts`,
/// `unclosed_remainders`, `orphan_junctions`) make the degenerate cases
/// observable without failing the call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Endpoints of the raw skeleton.
    pub endpoints: usize,
    pub junction_candidates: usize,
    pub junction_clusters: usize,
    /// Endpoints touching exactly one junction cluster after erasure.
    pub attached_endpoints: usize,
    pub bridges: usize,
    /// Endpoints touching three or more clusters, traced as plain endpoints.
    pub ambiguous_endpoints: usize,
    pub isolated_pixels: usize,
    /// Start pixels already consumed by an earlier path.
    pub skipped_starts: usize,
    pub open_paths: usize,
    pub cycles: usize,
    pub unclosed_remainders: usize,
    /// Junction clusters no traced path referenced.
    pub orphan_junctions: usize,
}
