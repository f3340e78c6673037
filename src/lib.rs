//! # Packed sequences and bidirected assembly graphs
//!
//! Two layers:
//!
//! 1. [`sequence`]: 2-bit packed nucleotide storage with O(1)
//!    reverse-complement and subrange views over a shared buffer, and a
//!    sparse record of ambiguous positions.
//! 2. [`graph`]: an arena-backed bidirected graph in which every segment is
//!    a `+`/`-` node pair and every overlap edge has a mirror on the
//!    opposite strands, plus neighbourhood, contiguity and summary queries.
//!
//! ## Usage Example
//!
//! ```
//! use asmgraph::{AssemblyGraph, ContiguityStatus, PackedSequence};
//!
//! let mut graph = AssemblyGraph::new();
//! graph.add_node_pair("1", 12.0, "ACGTTGCA".parse::<PackedSequence>()?)?;
//! graph.add_node_pair("2", 9.5, "GGATCCNA".parse::<PackedSequence>()?)?;
//! graph.add_edge_by_name("1+", "2+", 0)?;
//!
//! // The mirror edge 2- -> 1- exists as well.
//! let two_neg = graph.find_node("2-").unwrap();
//! let one_neg = graph.find_node("1-").unwrap();
//! assert_eq!(graph.downstream_nodes(two_neg)?, vec![one_neg]);
//!
//! let one = graph.find_node("1+").unwrap();
//! graph.determine_contiguity(one)?;
//! let two = graph.node(graph.find_node("2+").unwrap()).unwrap();
//! assert_eq!(two.contiguity_status(), ContiguityStatus::ContiguousStrandSpecific);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod graph;
pub mod sequence;

pub use graph::{
    AssemblyGraph, ContiguityStatus, EdgeId, GraphEdge, GraphError, GraphNode, GraphSummary, NodeFlags, NodeId,
    Strand,
};
pub use sequence::{Nucleotide, PackedSequence, SequenceError};

/// GFA tag used to write segment depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DepthTag {
    /// `DP:f`, depth as written.
    #[default]
    Dp,
    /// `KC:i`, k-mer count.
    Kc,
    /// `RC:i`, read count.
    Rc,
    /// `FC:i`, fragment count.
    Fc,
}

impl DepthTag {
    /// Two-letter tag name.
    pub fn as_str(self) -> &'static str {
        match self {
            DepthTag::Dp => "DP",
            DepthTag::Kc => "KC",
            DepthTag::Rc => "RC",
            DepthTag::Fc => "FC",
        }
    }
}

/// Tunables carried by an [`AssemblyGraph`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphConfig {
    /// Maximum nodes walked per path during contiguity determination.
    pub contiguity_search_steps: usize,

    /// Bases per line in wrapped FASTA output. Zero disables wrapping.
    pub fasta_line_width: usize,

    /// Tag used for depth in whole-graph GFA output.
    pub depth_tag: DepthTag,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            contiguity_search_steps: 15,
            fasta_line_width: 70,
            depth_tag: DepthTag::Dp,
        }
    }
}

impl GraphConfig {
    /// Set the contiguity step budget.
    pub fn with_contiguity_search_steps(mut self, steps: usize) -> Self {
        self.contiguity_search_steps = steps;
        self
    }

    /// Set the FASTA line width.
    pub fn with_fasta_line_width(mut self, width: usize) -> Self {
        self.fasta_line_width = width;
        self
    }

    /// Set the GFA depth tag.
    pub fn with_depth_tag(mut self, tag: DepthTag) -> Self {
        self.depth_tag = tag;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GraphConfig::default();
        assert_eq!(config.contiguity_search_steps, 15);
        assert_eq!(config.fasta_line_width, 70);
        assert_eq!(config.depth_tag, DepthTag::Dp);
    }

    #[test]
    fn test_builder_setters() {
        let config = GraphConfig::default()
            .with_contiguity_search_steps(3)
            .with_fasta_line_width(0)
            .with_depth_tag(DepthTag::Rc);
        assert_eq!(config.contiguity_search_steps, 3);
        assert_eq!(config.fasta_line_width, 0);
        assert_eq!(config.depth_tag.as_str(), "RC");
    }
}
