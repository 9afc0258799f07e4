//! Per-pixel classification by 8-neighborhood foreground count.

use sg_core::{GridPoint, PixelMask};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelClass {
    Isolated,
    Endpoint,
    Interior,
    JunctionCandidate,
}

impl PixelClass {
    pub fn from_neighbor_count(count: usize) -> Self {
        match count {
            0 => Self::Isolated,
            1 => Self::Endpoint,
            2 => Self::Interior,
            _ => Self::JunctionCandidate,
        }
    }
}

/// Endpoints and junction candidates, each list in row-major order.
/// Isolated pixels are classified again after junction erasure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    pub endpoints: Vec<GridPoint>,
    pub junction_candidates: Vec<GridPoint>,
}

pub fn foreground_neighbors(mask: &PixelMask, p: GridPoint) -> usize {
    p.neighbors().filter(|&q| mask.is_foreground(q)).count()
}

pub fn detect_topology(mask: &PixelMask) -> Topology {
    let mut topo = Topology::default();
    for p in mask.foreground() {
        match PixelClass::from_neighbor_count(foreground_neighbors(mask, p)) {
            PixelClass::Endpoint => topo.endpoints.push(p),
            PixelClass::Isolated | PixelClass::Interior => {}
            PixelClass::JunctionCandidate => topo.junction_candidates.push(p),
        }
    }
    topo
}
