use serde::{Deserialize, Serialize};
use sg_core::{GridPoint, Point2f};

pub type NodeId = usize;
pub type EdgeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    End,
    Junction,
    Chain,
    Isolated,
}

impl NodeKind {
    pub fn from_degree(degree: usize) -> Self {
        match degree {
            0 => Self::Isolated,
            1 => Self::End,
            2 => Self::Chain,
            _ => Self::Junction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// `x = col`, `y = row`.
    pub pos: Point2f,
    pub idx: GridPoint,
    pub degree: usize,
    pub incident_edges: Vec<EdgeId>,
}

/// Undirected edge stored with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub a: NodeId,
    pub b: NodeId,
}

impl GraphEdge {
    pub fn other(&self, n: NodeId) -> NodeId {
        if self.a == n { self.b } else { self.a }
    }
}

/// Undirected skeleton graph. Nodes are sorted by `(col, row)` and their
/// ids equal their index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonGraph {
    pub width: usize,
    pub height: usize,
    pub nodes: Vec<Node>,
    pub edges: Vec<GraphEdge>,
}

impl SkeletonGraph {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_junctions(&self) -> usize {
        self.count_kind(NodeKind::Junction)
    }

    pub fn num_ends(&self) -> usize {
        self.count_kind(NodeKind::End)
    }

    fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    pub fn iter_junctions(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Junction)
    }

    pub fn iter_ends(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::End)
    }

    pub fn iter_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    /// Node placed at grid position `p`, by binary search over the sorted
    /// node list.
    pub fn node_at(&self, p: GridPoint) -> Option<NodeId> {
        self.nodes
            .binary_search_by(|n| n.idx.cmp_column_major(&p))
            .ok()
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.nodes[id].degree
    }

    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id]
            .incident_edges
            .iter()
            .map(move |&e| self.edges[e].other(id))
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        a < self.nodes.len() && self.neighbors(a).any(|n| n == b)
    }

    /// Connected components as sorted node id lists, ordered by their
    /// smallest id.
    pub fn connected_components(&self) -> Vec<Vec<NodeId>> {
        let mut seen = vec![false; self.nodes.len()];
        let mut components = Vec::new();
        let mut stack = Vec::new();

        for seed in 0..self.nodes.len() {
            if seen[seed] {
                continue;
            }

            let mut component = Vec::new();
            seen[seed] = true;
            stack.push(seed);
            while let Some(n) = stack.pop() {
                component.push(n);
                for m in self.neighbors(n) {
                    if !seen[m] {
                        seen[m] = true;
                        stack.push(m);
                    }
                }
            }

            component.sort_unstable();
            components.push(component);
        }

        components
    }
}
