use std::fmt;

use super::NodeId;

/// Stable handle to an edge slot in an [`AssemblyGraph`](super::AssemblyGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeId(u32);

impl EdgeId {
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "edge arena overflow");
        Self(index as u32)
    }

    /// Arena slot index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Directed overlap between two nodes.
///
/// Endpoints never change after construction. Two edges with the same
/// endpoints are still distinct: identity is the [`EdgeId`].
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    from: NodeId,
    to: NodeId,
    overlap: u32,
    reverse_complement: EdgeId,
}

impl GraphEdge {
    pub(crate) fn new(from: NodeId, to: NodeId, overlap: u32, reverse_complement: EdgeId) -> Self {
        Self {
            from,
            to,
            overlap,
            reverse_complement,
        }
    }

    /// Node the edge leaves.
    #[inline]
    pub fn from(&self) -> NodeId {
        self.from
    }

    /// Node the edge enters.
    #[inline]
    pub fn to(&self) -> NodeId {
        self.to
    }

    /// Overlap length in bases.
    pub fn overlap(&self) -> u32 {
        self.overlap
    }

    /// The mirrored edge between the endpoints' reverse complements.
    pub fn reverse_complement(&self) -> EdgeId {
        self.reverse_complement
    }

    /// The endpoint opposite `node`. For a self loop this is `node` itself.
    pub fn other_end(&self, node: NodeId) -> NodeId {
        if self.from == node {
            self.to
        } else {
            self.from
        }
    }

    /// Whether `node` is one of the endpoints.
    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }

    /// `from == to`.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Whether `id` (this edge's handle) is also its own mirror, as happens for
    /// an edge from a node to its own reverse complement.
    pub fn is_own_reverse_complement(&self, id: EdgeId) -> bool {
        self.reverse_complement == id
    }
}
