//! Junction clustering and endpoint attachment.
//!
//! Junction-candidate pixels are grouped into 8-connected clusters, each
//! represented by its rounded centroid. Erasing the candidates from the
//! skeleton splits it into plain segments; the endpoints of those segments
//! are then classified by how many distinct clusters they touch.

use serde::{Deserialize, Serialize};
use sg_core::{GridPoint, Image, PixelMask};

use crate::topology::{PixelClass, foreground_neighbors};

pub type ClusterId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunctionCluster {
    pub id: ClusterId,
    pub members: Vec<GridPoint>,
    pub centroid: GridPoint,
}

#[derive(Debug, Clone)]
pub struct JunctionClusters {
    clusters: Vec<JunctionCluster>,
    labels: Image<Option<ClusterId>>,
}

impl JunctionClusters {
    /// Labels 8-connected groups of `candidates`. Cluster ids follow the
    /// row-major order of each cluster's first member.
    pub fn build(width: usize, height: usize, candidates: &[GridPoint]) -> Self {
        let mut is_candidate = PixelMask::new_fill(width, height, false);
        for &p in candidates {
            is_candidate.set(p, true);
        }

        let mut labels: Image<Option<ClusterId>> = Image::new_fill(width, height, None);
        let mut clusters = Vec::new();
        let mut stack = Vec::new();

        for &seed in candidates {
            if labels.get(seed).copied().flatten().is_some() {
                continue;
            }

            let id = clusters.len();
            let mut members = Vec::new();
            labels.set(seed, Some(id));
            stack.push(seed);

            while let Some(p) = stack.pop() {
                members.push(p);
                for q in p.neighbors() {
                    if is_candidate.is_foreground(q) && labels.get(q) == Some(&None) {
                        labels.set(q, Some(id));
                        stack.push(q);
                    }
                }
            }

            members.sort_by_key(|p| (p.row, p.col));
            let centroid = rounded_centroid(&members);
            clusters.push(JunctionCluster {
                id,
                members,
                centroid,
            });
        }

        Self { clusters, labels }
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn clusters(&self) -> &[JunctionCluster] {
        &self.clusters
    }

    pub fn into_clusters(self) -> Vec<JunctionCluster> {
        self.clusters
    }

    pub fn centroid(&self, id: ClusterId) -> GridPoint {
        self.clusters[id].centroid
    }

    pub fn cluster_at(&self, p: GridPoint) -> Option<ClusterId> {
        self.labels.get(p).copied().flatten()
    }

    /// Distinct clusters touching `p`, in neighbor priority order.
    pub fn adjacent_clusters(&self, p: GridPoint) -> Vec<ClusterId> {
        let mut out = Vec::new();
        for q in p.neighbors() {
            if let Some(id) = self.cluster_at(q)
                && !out.contains(&id)
            {
                out.push(id);
            }
        }
        out
    }

    pub fn attachment(&self, p: GridPoint) -> Attachment {
        match self.adjacent_clusters(p).as_slice() {
            [] => Attachment::Free,
            [c] => Attachment::Attached(*c),
            [a, b] => Attachment::Bridge(*a, *b),
            many => Attachment::Ambiguous(many.len()),
        }
    }

    /// Copy of `mask` with every clustered pixel cleared, so junctions act
    /// as barriers during tracing.
    pub fn erase_from(&self, mask: &PixelMask) -> PixelMask {
        let mut out = mask.clone();
        for cluster in &self.clusters {
            for &p in &cluster.members {
                out.set(p, false);
            }
        }
        out
    }
}

/// Per-axis mean of `members`, rounded half away from zero.
fn rounded_centroid(members: &[GridPoint]) -> GridPoint {
    let n = members.len().max(1) as f64;
    let (sum_r, sum_c) = members
        .iter()
        .fold((0usize, 0usize), |(r, c), p| (r + p.row, c + p.col));
    GridPoint::new(
        (sum_r as f64 / n).round() as usize,
        (sum_c as f64 / n).round() as usize,
    )
}

/// How a segment endpoint relates to the junction clusters around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Free,
    Attached(ClusterId),
    /// The pixel alone connects two clusters.
    Bridge(ClusterId, ClusterId),
    /// Touches this many (>= 3) clusters; handled like [`Attachment::Free`].
    Ambiguous(usize),
}

/// Tracing plan derived from the junction-erased mask.
#[derive(Debug, Clone, Default)]
pub struct EndpointPlan {
    /// Endpoints touching one cluster, sorted by `(col, row)`.
    pub attached: Vec<(GridPoint, ClusterId)>,
    /// Endpoints touching no cluster (or an ambiguous number), sorted by
    /// `(col, row)`.
    pub free: Vec<GridPoint>,
    /// Endpoint or isolated pixels that are a whole segment between two
    /// clusters.
    pub bridges: Vec<(GridPoint, ClusterId, ClusterId)>,
    /// Pixels with no foreground neighbor once junctions are erased.
    pub isolated: Vec<(GridPoint, Attachment)>,
    pub ambiguous: usize,
}

impl EndpointPlan {
    pub fn attachment_of(&self, p: GridPoint) -> Option<ClusterId> {
        self.attached
            .binary_search_by(|(q, _)| q.cmp_column_major(&p))
            .ok()
            .map(|i| self.attached[i].1)
    }
}

pub fn plan_endpoints(erased: &PixelMask, clusters: &JunctionClusters) -> EndpointPlan {
    let mut plan = EndpointPlan::default();

    for p in erased.foreground() {
        let class = PixelClass::from_neighbor_count(foreground_neighbors(erased, p));
        let attachment = clusters.attachment(p);
        if let Attachment::Ambiguous(n) = attachment
            && matches!(class, PixelClass::Endpoint | PixelClass::Isolated)
        {
            tracing::warn!(
                row = p.row,
                col = p.col,
                clusters = n,
                "endpoint touches too many junctions; tracing it as a plain endpoint"
            );
            plan.ambiguous += 1;
        }

        match (class, attachment) {
            (PixelClass::Isolated, _) => plan.isolated.push((p, attachment)),
            (PixelClass::Endpoint, Attachment::Attached(c)) => plan.attached.push((p, c)),
            (PixelClass::Endpoint, Attachment::Bridge(a, b)) => plan.bridges.push((p, a, b)),
            (PixelClass::Endpoint, Attachment::Free | Attachment::Ambiguous(_)) => {
                plan.free.push(p)
            }
            (PixelClass::Interior | PixelClass::JunctionCandidate, _) => {}
        }
    }

    plan.attached.sort_by(|a, b| a.0.cmp_column_major(&b.0));
    plan.free.sort_by(GridPoint::cmp_column_major);
    plan
}
