use std::collections::BTreeSet;

use super::{AssemblyGraph, EdgeId, GraphError, NodeId};

/// Local edge-list queries. Each answers from the node's own edge list.
impl AssemblyGraph {
    /// Edges whose `from` is `id`, self loops included.
    pub fn leaving_edges(&self, id: NodeId) -> Result<Vec<EdgeId>, GraphError> {
        self.require_node(id)?;
        Ok(self
            .node_edges(id)
            .filter(|(_, edge)| edge.from() == id)
            .map(|(edge_id, _)| edge_id)
            .collect())
    }

    /// Edges whose `to` is `id`, self loops included.
    pub fn entering_edges(&self, id: NodeId) -> Result<Vec<EdgeId>, GraphError> {
        self.require_node(id)?;
        Ok(self
            .node_edges(id)
            .filter(|(_, edge)| edge.to() == id)
            .map(|(edge_id, _)| edge_id)
            .collect())
    }

    /// Distinct nodes one leaving edge away, in edge order.
    pub fn downstream_nodes(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        self.require_node(id)?;
        let mut nodes = Vec::new();
        for (_, edge) in self.node_edges(id).filter(|(_, edge)| edge.from() == id) {
            push_unique(&mut nodes, edge.to());
        }
        Ok(nodes)
    }

    /// Distinct nodes one entering edge away, in edge order.
    pub fn upstream_nodes(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        self.require_node(id)?;
        let mut nodes = Vec::new();
        for (_, edge) in self.node_edges(id).filter(|(_, edge)| edge.to() == id) {
            push_unique(&mut nodes, edge.from());
        }
        Ok(nodes)
    }

    /// Neighbours of `id` and of its partner, each replaced by its positive
    /// strand, without duplicates, sorted by handle.
    pub fn all_connected_positive_nodes(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let partner = self.require_node(id)?.reverse_complement();
        let mut connected = BTreeSet::new();
        for strand in [id, partner] {
            for (_, edge) in self.node_edges(strand) {
                let other = self.require_node(edge.other_end(strand))?;
                let positive = if other.is_positive() {
                    edge.other_end(strand)
                } else {
                    other.reverse_complement()
                };
                connected.insert(positive);
            }
        }
        Ok(connected.into_iter().collect())
    }

    /// The first edge with `from == to == id`, if any.
    pub fn self_looping_edge(&self, id: NodeId) -> Result<Option<EdgeId>, GraphError> {
        self.require_node(id)?;
        Ok(self
            .node_edges(id)
            .find(|(_, edge)| edge.from() == id && edge.to() == id)
            .map(|(edge_id, _)| edge_id))
    }

    /// How many of the two directions (entering, leaving) have no edge.
    pub fn dead_end_count(&self, id: NodeId) -> Result<usize, GraphError> {
        self.require_node(id)?;
        let mut has_entering = false;
        let mut has_leaving = false;
        for (_, edge) in self.node_edges(id) {
            has_leaving |= edge.from() == id;
            has_entering |= edge.to() == id;
        }
        Ok(usize::from(!has_entering) + usize::from(!has_leaving))
    }

    /// Whether any edge of `id` touches `other`, in either direction.
    pub fn is_node_connected(&self, id: NodeId, other: NodeId) -> Result<bool, GraphError> {
        self.require_node(id)?;
        Ok(self.node_edges(id).any(|(_, edge)| edge.touches(other)))
    }

    /// An edge `from -> id`, if present.
    pub fn edge_leading_in(&self, id: NodeId, from: NodeId) -> Result<Option<EdgeId>, GraphError> {
        self.require_node(id)?;
        Ok(self
            .node_edges(id)
            .find(|(_, edge)| edge.from() == from && edge.to() == id)
            .map(|(edge_id, _)| edge_id))
    }

    /// An edge `id -> to`, if present.
    pub fn edge_leading_away(&self, id: NodeId, to: NodeId) -> Result<Option<EdgeId>, GraphError> {
        self.require_node(id)?;
        Ok(self
            .node_edges(id)
            .find(|(_, edge)| edge.from() == id && edge.to() == to)
            .map(|(edge_id, _)| edge_id))
    }

    /// Node length minus the largest overlap among its leaving edges,
    /// floored at zero.
    pub fn length_without_trailing_overlap(&self, id: NodeId) -> Result<u32, GraphError> {
        let length = self.require_node(id)?.length();
        let max_overlap = self
            .node_edges(id)
            .filter(|(_, edge)| edge.from() == id)
            .map(|(_, edge)| edge.overlap())
            .max()
            .unwrap_or(0);
        Ok(length.saturating_sub(max_overlap))
    }
}

fn push_unique(nodes: &mut Vec<NodeId>, node: NodeId) {
    if !nodes.contains(&node) {
        nodes.push(node);
    }
}
