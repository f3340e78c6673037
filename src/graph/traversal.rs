//! Breadth-first neighbourhood and component queries.
//!
//! Edges are followed in both directions. A visited bit per arena slot keeps
//! every node to a single visit, so self loops, cycles and parallel edges
//! cannot stall a traversal.

use std::collections::VecDeque;

use bitvec::prelude::*;
use tracing::debug;

use super::{AssemblyGraph, GraphError, NodeId};

impl AssemblyGraph {
    /// Every node reachable from `start` over edges in either direction,
    /// `start` first, in breadth-first order. Strands are not merged: the
    /// partner of a reached node is only included if an edge leads to it.
    pub fn connected_component(&self, start: NodeId) -> Result<Vec<NodeId>, GraphError> {
        self.require_node(start)?;
        Ok(self
            .breadth_first(start, None)
            .into_iter()
            .map(|(node, _)| node)
            .collect())
    }

    /// Nodes at most `max_hops` edges from `start`, with their hop distance,
    /// in breadth-first order. `start` is included at distance zero.
    pub fn nodes_within_distance(
        &self,
        start: NodeId,
        max_hops: usize,
    ) -> Result<Vec<(NodeId, usize)>, GraphError> {
        self.require_node(start)?;
        Ok(self.breadth_first(start, Some(max_hops)))
    }

    /// Partition segments into connected components, treating a node and
    /// its partner as one. Each component lists positive-strand handles.
    pub fn connected_components(&self) -> Vec<Vec<NodeId>> {
        let mut visited = bitvec![0; self.slot_count()];
        let mut components = Vec::new();

        for (seed, _) in self.positive_nodes() {
            if visited[seed.index()] {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = VecDeque::new();
            visited.set(seed.index(), true);
            queue.push_back(seed);

            while let Some(current) = queue.pop_front() {
                let Some(node) = self.node(current) else {
                    continue;
                };
                let partner = node.reverse_complement();
                let positive = if node.is_positive() { current } else { partner };
                if !component.contains(&positive) {
                    component.push(positive);
                }

                let next = self
                    .node_edges(current)
                    .map(|(_, edge)| edge.other_end(current))
                    .chain(std::iter::once(partner));
                for neighbour in next {
                    if !visited[neighbour.index()] {
                        visited.set(neighbour.index(), true);
                        queue.push_back(neighbour);
                    }
                }
            }
            components.push(component);
        }

        debug!(components = components.len(), "computed connected components");
        components
    }

    /// Mark every node within `distance` hops of `start`, and each of their
    /// partners, as drawn. Flags set earlier are left in place.
    pub fn mark_drawn_around(&mut self, start: NodeId, distance: usize) -> Result<usize, GraphError> {
        let reached = self.nodes_within_distance(start, distance)?;
        let mut targets = Vec::with_capacity(reached.len() * 2);
        for (node, _) in &reached {
            targets.push(*node);
            if let Some(partner) = self.reverse_complement_of(*node) {
                targets.push(partner);
            }
        }
        for target in &targets {
            if let Some(node) = self.node_mut(*target) {
                node.set_drawn(true);
            }
        }
        debug!(%start, distance, reached = reached.len(), "marked neighbourhood as drawn");
        Ok(reached.len())
    }

    /// Mark every node as drawn.
    pub fn mark_all_drawn(&mut self) {
        let ids: Vec<NodeId> = self.nodes().map(|(id, _)| id).collect();
        for id in ids {
            if let Some(node) = self.node_mut(id) {
                node.set_drawn(true);
            }
        }
    }

    /// Clear the drawn flag on every node.
    pub fn reset_drawn(&mut self) {
        let ids: Vec<NodeId> = self.nodes().map(|(id, _)| id).collect();
        for id in ids {
            if let Some(node) = self.node_mut(id) {
                node.set_drawn(false);
            }
        }
    }

    fn breadth_first(&self, start: NodeId, max_hops: Option<usize>) -> Vec<(NodeId, usize)> {
        let mut visited = bitvec![0; self.slot_count()];
        let mut order = Vec::new();
        let mut queue = VecDeque::new();

        visited.set(start.index(), true);
        queue.push_back((start, 0usize));

        while let Some((current, hops)) = queue.pop_front() {
            order.push((current, hops));
            if max_hops.is_some_and(|limit| hops >= limit) {
                continue;
            }
            for (_, edge) in self.node_edges(current) {
                let neighbour = edge.other_end(current);
                if !visited[neighbour.index()] {
                    visited.set(neighbour.index(), true);
                    queue.push_back((neighbour, hops + 1));
                }
            }
        }

        order
    }
}
