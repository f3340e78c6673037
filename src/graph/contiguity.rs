//! Contiguity relative to a chosen start node.
//!
//! Walks are traced out of the start node up to a step budget, separately
//! for its leaving and its entering edges. Nodes on any walk are
//! `MaybeContiguous`. Nodes on every walk of one direction are contiguous
//! with the start, strand-specifically or on either strand. A second pass
//! promotes `MaybeContiguous` nodes from which every walk in some direction
//! arrives back at the start. Everything left unclassified is
//! `NotContiguous`.

use std::collections::BTreeSet;

use bitvec::prelude::*;
use tracing::{debug, trace};

use super::{AssemblyGraph, ContiguityStatus, EdgeId, GraphError, NodeId};

impl AssemblyGraph {
    /// Classify every node's contiguity with `start`.
    ///
    /// All statuses are reset first. `start` itself keeps
    /// [`ContiguityStatus::Starting`].
    pub fn determine_contiguity(&mut self, start: NodeId) -> Result<(), GraphError> {
        let start_partner = self.require_node(start)?.reverse_complement();
        let steps = self.config().contiguity_search_steps.max(1);

        self.reset_contiguity();

        let mut checked: BTreeSet<NodeId> = BTreeSet::new();
        for forward in [true, false] {
            let edges = self.edges_in_direction(start, forward);
            if edges.is_empty() {
                continue;
            }

            let mut paths = Vec::new();
            let mut path = Vec::new();
            for edge_id in edges {
                self.trace_from_edge(edge_id, forward, steps, (start, start_partner), &mut path, &mut paths);
            }
            trace!(%start, forward, paths = paths.len(), "traced paths");

            for node in paths.iter().flatten() {
                checked.insert(*node);
                self.upgrade_unless_start(*node, start, ContiguityStatus::MaybeContiguous);
            }
            for node in self.nodes_common_to_all_paths(&paths, false) {
                self.upgrade_unless_start(node, start, ContiguityStatus::ContiguousStrandSpecific);
            }
            for node in self.nodes_common_to_all_paths(&paths, true) {
                self.upgrade_with_partner(node, start, ContiguityStatus::ContiguousEitherStrand);
            }
        }

        for node in checked {
            let still_maybe = self
                .node(node)
                .map(|n| n.contiguity_status() == ContiguityStatus::MaybeContiguous)
                .unwrap_or(false);
            if !still_maybe {
                continue;
            }
            if self.path_leads_only_to(node, start, false, steps) {
                self.upgrade_unless_start(node, start, ContiguityStatus::ContiguousStrandSpecific);
            } else if self.path_leads_only_to(node, start, true, steps) {
                self.upgrade_with_partner(node, start, ContiguityStatus::ContiguousEitherStrand);
            }
        }

        let unclassified: Vec<NodeId> = self
            .nodes()
            .filter(|(id, node)| *id != start && node.contiguity_status() == ContiguityStatus::Starting)
            .map(|(id, _)| id)
            .collect();
        for id in &unclassified {
            self.upgrade_unless_start(*id, start, ContiguityStatus::NotContiguous);
        }

        debug!(%start, not_contiguous = unclassified.len(), "contiguity determined");
        Ok(())
    }

    /// Return every node to [`ContiguityStatus::Starting`].
    pub fn reset_contiguity(&mut self) {
        let ids: Vec<NodeId> = self.nodes().map(|(id, _)| id).collect();
        for id in ids {
            if let Some(node) = self.node_mut(id) {
                node.reset_contiguity_status();
            }
        }
    }

    /// Handles of nodes currently holding `status`.
    pub fn nodes_with_contiguity(&self, status: ContiguityStatus) -> Vec<NodeId> {
        self.nodes()
            .filter(|(_, node)| node.contiguity_status() == status)
            .map(|(id, _)| id)
            .collect()
    }

    fn upgrade_unless_start(&mut self, id: NodeId, start: NodeId, status: ContiguityStatus) {
        if id == start {
            return;
        }
        if let Some(node) = self.node_mut(id) {
            node.upgrade_contiguity_status(status);
        }
    }

    fn upgrade_with_partner(&mut self, id: NodeId, start: NodeId, status: ContiguityStatus) {
        self.upgrade_unless_start(id, start, status);
        if let Some(partner) = self.reverse_complement_of(id) {
            self.upgrade_unless_start(partner, start, status);
        }
    }

    /// Edges that continue a walk which arrived at `node` over `via`, going
    /// `forward` (along edge direction) or backward. The mirror of `via` is
    /// never taken, so a walk cannot double back on itself.
    fn next_edges_in_path(&self, via: EdgeId, node: NodeId, forward: bool) -> Vec<EdgeId> {
        let via_mirror = self.edge(via).map(|edge| edge.reverse_complement());
        let mut edges = self.edges_in_direction(node, forward);
        edges.retain(|edge_id| Some(*edge_id) != via_mirror);
        edges
    }

    /// Edges of `node` leaving it (`forward`) or entering it. A self loop
    /// belongs to both directions.
    fn edges_in_direction(&self, node: NodeId, forward: bool) -> Vec<EdgeId> {
        self.node_edges(node)
            .filter(|(_, edge)| {
                if forward {
                    edge.from() == node
                } else {
                    edge.to() == node
                }
            })
            .map(|(edge_id, _)| edge_id)
            .collect()
    }

    /// Depth-first enumeration of walks continuing over `edge_id`. A walk is
    /// recorded when it dead-ends, revisits a node, runs out of steps, or
    /// returns to either strand of the start (which is not recorded).
    fn trace_from_edge(
        &self,
        edge_id: EdgeId,
        forward: bool,
        steps_remaining: usize,
        (start, start_partner): (NodeId, NodeId),
        path: &mut Vec<NodeId>,
        paths: &mut Vec<Vec<NodeId>>,
    ) {
        let Some(edge) = self.edge(edge_id) else {
            return;
        };
        let next = if forward { edge.to() } else { edge.from() };
        if next == start || next == start_partner {
            paths.push(path.clone());
            return;
        }

        let looped = path.contains(&next);
        path.push(next);

        let steps_remaining = steps_remaining - 1;
        let next_edges = if steps_remaining == 0 || looped {
            Vec::new()
        } else {
            self.next_edges_in_path(edge_id, next, forward)
        };

        if next_edges.is_empty() {
            paths.push(path.clone());
        } else {
            for next_edge in next_edges {
                self.trace_from_edge(next_edge, forward, steps_remaining, (start, start_partner), path, paths);
            }
        }
        path.pop();
    }

    /// Nodes present in every path. With `include_partners`, a node also
    /// counts as present when its reverse complement is.
    fn nodes_common_to_all_paths(&self, paths: &[Vec<NodeId>], include_partners: bool) -> Vec<NodeId> {
        let Some((first, rest)) = paths.split_first() else {
            return Vec::new();
        };

        let mut common: Vec<NodeId> = first.clone();
        if include_partners {
            common.extend(first.iter().filter_map(|&node| self.reverse_complement_of(node)));
        }
        common.sort_unstable();
        common.dedup();

        for path in rest {
            let mut in_path = bitvec![0; self.slot_count()];
            for node in path {
                in_path.set(node.index(), true);
            }
            common.retain(|&node| {
                in_path[node.index()]
                    || (include_partners
                        && self
                            .reverse_complement_of(node)
                            .map(|partner| in_path[partner.index()])
                            .unwrap_or(false))
            });
        }
        common
    }

    /// Whether, in one direction out of `node`, every walk reaches `target`
    /// (or, with `include_partner`, its reverse complement) within `steps`.
    fn path_leads_only_to(&self, node: NodeId, target: NodeId, include_partner: bool, steps: usize) -> bool {
        let target_partner = if include_partner {
            self.reverse_complement_of(target)
        } else {
            None
        };
        [true, false].into_iter().any(|forward| {
            let edges = self.edges_in_direction(node, forward);
            !edges.is_empty()
                && edges.into_iter().all(|edge_id| {
                    let mut path = vec![node];
                    self.leads_only_to(edge_id, forward, steps, target, target_partner, &mut path)
                })
        })
    }

    fn leads_only_to(
        &self,
        edge_id: EdgeId,
        forward: bool,
        steps_remaining: usize,
        target: NodeId,
        target_partner: Option<NodeId>,
        path: &mut Vec<NodeId>,
    ) -> bool {
        let Some(edge) = self.edge(edge_id) else {
            return false;
        };
        let next = if forward { edge.to() } else { edge.from() };
        if next == target || Some(next) == target_partner {
            return true;
        }

        let steps_remaining = steps_remaining - 1;
        if steps_remaining == 0 || path.contains(&next) {
            return false;
        }

        let next_edges = self.next_edges_in_path(edge_id, next, forward);
        if next_edges.is_empty() {
            return false;
        }

        path.push(next);
        let all_reach = next_edges.into_iter().all(|next_edge| {
            self.leads_only_to(next_edge, forward, steps_remaining, target, target_partner, path)
        });
        path.pop();
        all_reach
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{AssemblyGraph, ContiguityStatus};
    use crate::sequence::PackedSequence;

    fn graph_with(names: &[&str]) -> AssemblyGraph {
        let mut graph = AssemblyGraph::new();
        for name in names {
            graph
                .add_node_pair(name, 1.0, "ACGTTGCA".parse::<PackedSequence>().unwrap())
                .unwrap();
        }
        graph
    }

    fn status(graph: &AssemblyGraph, name: &str) -> ContiguityStatus {
        graph
            .node(graph.find_node(name).unwrap())
            .unwrap()
            .contiguity_status()
    }

    #[test]
    fn linear_chain_is_strand_specific() {
        let mut graph = graph_with(&["1", "2", "3"]);
        graph.add_edge_by_name("1+", "2+", 0).unwrap();
        graph.add_edge_by_name("2+", "3+", 0).unwrap();
        let start = graph.find_node("2+").unwrap();

        graph.determine_contiguity(start).unwrap();

        assert_eq!(status(&graph, "2+"), ContiguityStatus::Starting);
        assert_eq!(status(&graph, "1+"), ContiguityStatus::ContiguousStrandSpecific);
        assert_eq!(status(&graph, "3+"), ContiguityStatus::ContiguousStrandSpecific);
        assert_eq!(status(&graph, "1-"), ContiguityStatus::ContiguousEitherStrand);
        assert_eq!(status(&graph, "2-"), ContiguityStatus::NotContiguous);
    }

    #[test]
    fn bubble_merge_is_contiguous() {
        // 1+ -> {2+, 3+} -> 4+, with 5+ also feeding 3+.
        let mut graph = graph_with(&["1", "2", "3", "4", "5"]);
        graph.add_edge_by_name("1+", "2+", 0).unwrap();
        graph.add_edge_by_name("1+", "3+", 0).unwrap();
        graph.add_edge_by_name("2+", "4+", 0).unwrap();
        graph.add_edge_by_name("3+", "4+", 0).unwrap();
        graph.add_edge_by_name("5+", "3+", 0).unwrap();
        let start = graph.find_node("1+").unwrap();

        graph.determine_contiguity(start).unwrap();

        assert_eq!(status(&graph, "4+"), ContiguityStatus::ContiguousStrandSpecific);
        assert_eq!(status(&graph, "4-"), ContiguityStatus::ContiguousEitherStrand);
        // Every walk back from 2+ arrives at 1+.
        assert_eq!(status(&graph, "2+"), ContiguityStatus::ContiguousStrandSpecific);
        assert_eq!(status(&graph, "3+"), ContiguityStatus::MaybeContiguous);
        assert_eq!(status(&graph, "5+"), ContiguityStatus::NotContiguous);
    }

    #[test]
    fn reverse_complement_branch_is_either_strand() {
        // 1+ -> 2+ -> 3+ and 1+ -> 4+ -> 3-: every path reaches segment 3 on
        // one strand or the other.
        let mut graph = graph_with(&["1", "2", "3", "4"]);
        graph.add_edge_by_name("1+", "2+", 0).unwrap();
        graph.add_edge_by_name("1+", "4+", 0).unwrap();
        graph.add_edge_by_name("2+", "3+", 0).unwrap();
        graph.add_edge_by_name("4+", "3-", 0).unwrap();
        let start = graph.find_node("1+").unwrap();

        graph.determine_contiguity(start).unwrap();

        assert_eq!(status(&graph, "3+"), ContiguityStatus::ContiguousEitherStrand);
        assert_eq!(status(&graph, "3-"), ContiguityStatus::ContiguousEitherStrand);
    }

    #[test]
    fn rerun_resets_previous_results() {
        let mut graph = graph_with(&["1", "2", "3"]);
        graph.add_edge_by_name("1+", "2+", 0).unwrap();
        let one = graph.find_node("1+").unwrap();
        let three = graph.find_node("3+").unwrap();

        graph.determine_contiguity(one).unwrap();
        assert_eq!(status(&graph, "3+"), ContiguityStatus::NotContiguous);

        graph.determine_contiguity(three).unwrap();
        assert_eq!(status(&graph, "3+"), ContiguityStatus::Starting);
        assert_eq!(status(&graph, "1+"), ContiguityStatus::NotContiguous);
        assert_eq!(
            graph.nodes_with_contiguity(ContiguityStatus::NotContiguous).len(),
            graph.node_count() - 1
        );
    }

    #[test]
    fn self_loops_terminate() {
        let mut graph = graph_with(&["1", "2"]);
        graph.add_edge_by_name("1+", "1+", 0).unwrap();
        graph.add_edge_by_name("1+", "2+", 0).unwrap();
        graph.add_edge_by_name("2+", "2+", 0).unwrap();
        let start = graph.find_node("1+").unwrap();

        graph.determine_contiguity(start).unwrap();
        assert_eq!(status(&graph, "1+"), ContiguityStatus::Starting);
        assert!(status(&graph, "2+") != ContiguityStatus::NotContiguous);
    }
}
