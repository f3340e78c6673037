//! Whole-graph statistics.
//!
//! Per-segment figures are taken from positive-strand nodes so that each
//! segment counts once; edges are counted once per mirrored pair.

use std::fmt;

use tracing::debug;

use super::{AssemblyGraph, GraphNode};

/// Summary statistics for an [`AssemblyGraph`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphSummary {
    /// Segments (node pairs).
    pub node_count: usize,
    /// Edge pairs.
    pub edge_count: usize,
    /// Sum of segment lengths.
    pub total_length: u64,
    /// Segment ends without a connection.
    pub dead_ends: usize,
    /// Connected components, strands merged.
    pub component_count: usize,
    /// N50 segment length.
    pub n50: u32,
    /// Shortest segment length, zero for an empty graph.
    pub shortest: u32,
    /// Longest segment length, zero for an empty graph.
    pub longest: u32,
    /// Length-weighted mean depth.
    pub mean_depth: f64,
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nodes:\t{}", self.node_count)?;
        writeln!(f, "Edges:\t{}", self.edge_count)?;
        writeln!(f, "Total length:\t{}", self.total_length)?;
        writeln!(f, "Dead ends:\t{}", self.dead_ends)?;
        writeln!(f, "Connected components:\t{}", self.component_count)?;
        writeln!(f, "N50:\t{}", self.n50)?;
        writeln!(f, "Shortest node:\t{}", self.shortest)?;
        writeln!(f, "Longest node:\t{}", self.longest)?;
        write!(f, "Mean depth:\t{:.2}", self.mean_depth)
    }
}

impl AssemblyGraph {
    /// Mean depth over all segments, weighted by length. Zero when the graph
    /// holds no bases.
    pub fn mean_depth(&self) -> f64 {
        weighted_mean_depth(self.positive_nodes().map(|(_, node)| node))
    }

    /// Like [`mean_depth`](Self::mean_depth), restricted to segments with
    /// either strand drawn.
    pub fn mean_drawn_depth(&self) -> f64 {
        weighted_mean_depth(self.positive_nodes().filter_map(|(_, node)| {
            let partner_drawn = self
                .node(node.reverse_complement())
                .is_some_and(GraphNode::is_drawn);
            (node.is_drawn() || partner_drawn).then_some(node)
        }))
    }

    /// Store `depth / mean_drawn_depth` on every node. When no drawn segment
    /// has any depth every node gets `1.0`.
    pub fn recalculate_relative_depths(&mut self) {
        let mean = self.mean_drawn_depth();
        let ids: Vec<_> = self.nodes().map(|(id, _)| id).collect();
        for id in ids {
            if let Some(node) = self.node_mut(id) {
                let relative = if mean == 0.0 { 1.0 } else { node.depth() / mean };
                node.set_depth_relative_to_mean(relative);
            }
        }
        debug!(mean, "recalculated relative depths");
    }

    /// Sum of segment lengths.
    pub fn total_length(&self) -> u64 {
        self.positive_nodes()
            .map(|(_, node)| u64::from(node.full_length()))
            .sum()
    }

    /// Length `L` such that segments of length `>= L` hold at least half of
    /// the total length. Zero for an empty graph.
    pub fn n50(&self) -> u32 {
        let mut lengths: Vec<u32> = self.positive_nodes().map(|(_, node)| node.full_length()).collect();
        lengths.sort_unstable_by(|a, b| b.cmp(a));
        let total: u64 = lengths.iter().map(|&len| u64::from(len)).sum();

        let mut cumulative = 0u64;
        for len in lengths {
            cumulative += u64::from(len);
            if cumulative * 2 >= total {
                return len;
            }
        }
        0
    }

    /// Compute every figure in [`GraphSummary`].
    pub fn summary(&self) -> GraphSummary {
        let lengths: Vec<u32> = self.positive_nodes().map(|(_, node)| node.full_length()).collect();
        let dead_ends = self
            .positive_nodes()
            .map(|(id, _)| self.dead_end_count(id).unwrap_or(0))
            .sum();
        let edge_count = self
            .edges()
            .filter(|(id, edge)| *id <= edge.reverse_complement())
            .count();

        GraphSummary {
            node_count: lengths.len(),
            edge_count,
            total_length: self.total_length(),
            dead_ends,
            component_count: self.connected_components().len(),
            n50: self.n50(),
            shortest: lengths.iter().copied().min().unwrap_or(0),
            longest: lengths.iter().copied().max().unwrap_or(0),
            mean_depth: self.mean_depth(),
        }
    }
}

fn weighted_mean_depth<'a>(nodes: impl Iterator<Item = &'a GraphNode>) -> f64 {
    let (weighted, total) = nodes.fold((0.0, 0u64), |(weighted, total), node| {
        let length = node.full_length();
        (weighted + node.depth() * f64::from(length), total + u64::from(length))
    });
    if total == 0 {
        0.0
    } else {
        weighted / total as f64
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::AssemblyGraph;
    use crate::sequence::PackedSequence;

    fn seq(len: usize) -> PackedSequence {
        "ACGT".repeat(len).parse().unwrap()
    }

    #[test]
    fn mean_depth_is_length_weighted() {
        let mut graph = AssemblyGraph::new();
        graph.add_node_pair("1", 10.0, seq(1)).unwrap();
        graph.add_node_pair("2", 40.0, seq(3)).unwrap();
        // (10 * 4 + 40 * 12) / 16
        assert!((graph.mean_depth() - 32.5).abs() < 1e-9);
    }

    #[test]
    fn relative_depths_fall_back_to_one() {
        let mut graph = AssemblyGraph::new();
        let (pos, neg) = graph.add_node_pair("1", 0.0, seq(1)).unwrap();
        graph.mark_all_drawn();
        graph.recalculate_relative_depths();
        assert_eq!(graph.node(pos).unwrap().depth_relative_to_mean(), 1.0);
        assert_eq!(graph.node(neg).unwrap().depth_relative_to_mean(), 1.0);

        graph.node_mut(pos).unwrap().set_depth(6.0);
        graph.add_node_pair("2", 2.0, seq(1)).unwrap();
        graph.mark_all_drawn();
        graph.recalculate_relative_depths();
        assert!((graph.node(pos).unwrap().depth_relative_to_mean() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn relative_depths_use_drawn_segments_only() {
        let mut graph = AssemblyGraph::new();
        let (first, _) = graph.add_node_pair("1", 1.0, seq(1)).unwrap();
        let (second, _) = graph.add_node_pair("2", 1.0, seq(1)).unwrap();
        let (third, _) = graph.add_node_pair("3", 9.0, seq(1)).unwrap();
        graph.node_mut(first).unwrap().set_drawn(true);

        graph.recalculate_relative_depths();

        assert!((graph.mean_depth() - 11.0 / 3.0).abs() < 1e-9);
        assert_eq!(graph.mean_drawn_depth(), 1.0);
        assert!((graph.node(first).unwrap().depth_relative_to_mean() - 1.0).abs() < 1e-9);
        assert!((graph.node(second).unwrap().depth_relative_to_mean() - 1.0).abs() < 1e-9);
        assert!((graph.node(third).unwrap().depth_relative_to_mean() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn relative_depths_without_drawn_segments_are_one() {
        let mut graph = AssemblyGraph::new();
        let (pos, _) = graph.add_node_pair("1", 4.0, seq(1)).unwrap();
        graph.recalculate_relative_depths();
        assert_eq!(graph.node(pos).unwrap().depth_relative_to_mean(), 1.0);
    }

    #[test]
    fn drawn_mean_ignores_hidden_segments() {
        let mut graph = AssemblyGraph::new();
        let (_, neg) = graph.add_node_pair("1", 10.0, seq(1)).unwrap();
        graph.add_node_pair("2", 30.0, seq(1)).unwrap();
        assert_eq!(graph.mean_drawn_depth(), 0.0);
        graph.node_mut(neg).unwrap().set_drawn(true);
        assert!((graph.mean_drawn_depth() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn n50_and_summary() {
        let mut graph = AssemblyGraph::new();
        for (name, repeats) in [("1", 10), ("2", 5), ("3", 3), ("4", 2)] {
            graph.add_node_pair(name, 1.0, seq(repeats)).unwrap();
        }
        graph.add_edge_by_name("1+", "2+", 0).unwrap();
        graph.add_edge_by_name("2+", "2-", 0).unwrap();

        // Lengths 40, 20, 12, 8: total 80, so 40 alone reaches half.
        assert_eq!(graph.n50(), 40);

        let summary = graph.summary();
        assert_eq!(summary.node_count, 4);
        assert_eq!(summary.edge_count, 2);
        assert_eq!(summary.total_length, 80);
        assert_eq!(summary.component_count, 3);
        assert_eq!(summary.shortest, 8);
        assert_eq!(summary.longest, 40);
        // 1+ has no entry, 2+ is fully connected, 3+ and 4+ are isolated.
        assert_eq!(summary.dead_ends, 5);
        assert!(summary.to_string().contains("N50:\t40"));
    }

    #[test]
    fn empty_graph_summary_is_zeroed() {
        let summary = AssemblyGraph::new().summary();
        assert_eq!(summary.node_count, 0);
        assert_eq!(summary.n50, 0);
        assert_eq!(summary.mean_depth, 0.0);
    }
}
