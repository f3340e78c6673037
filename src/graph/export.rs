//! FASTA and GFA text rendering.

use super::{AssemblyGraph, EdgeId, GraphError, GraphNode, NodeId};
use crate::DepthTag;

impl AssemblyGraph {
    /// FASTA record for a node: a `>NODE_<name>_length_<len>_cov_<depth>`
    /// header followed by the bases.
    ///
    /// `signed` keeps the strand sign in the header name. With `wrap` the
    /// sequence is split into lines of [`GraphConfig::fasta_line_width`]
    /// bases. A missing sequence yields the header alone.
    ///
    /// [`GraphConfig::fasta_line_width`]: crate::GraphConfig::fasta_line_width
    pub fn fasta_record(&self, id: NodeId, signed: bool, wrap: bool) -> Result<String, GraphError> {
        let node = self.require_node(id)?;
        let name = if signed {
            node.signed_name()
        } else {
            node.name().to_string()
        };

        let mut record = format!(
            ">NODE_{}_length_{}_cov_{}\n",
            name,
            node.full_length(),
            node.depth()
        );
        if node.sequence().is_empty() {
            return Ok(record);
        }

        let bases = node.sequence().to_vec();
        let width = self.config().fasta_line_width;
        if wrap && width > 0 {
            for line in bases.chunks(width) {
                record.push_str(&String::from_utf8_lossy(line));
                record.push('\n');
            }
        } else {
            record.push_str(&String::from_utf8_lossy(&bases));
            record.push('\n');
        }
        Ok(record)
    }

    /// GFA 1 `S` line for the segment `id` belongs to, without a trailing
    /// newline.
    ///
    /// Always describes the positive strand. The sequence column is `*`
    /// when bases are missing; length and depth still come through as tags.
    pub fn gfa_segment_line(&self, id: NodeId, depth_tag: DepthTag) -> Result<String, GraphError> {
        let node = self.positive_of(id)?;

        let sequence = if node.sequence_is_missing() {
            "*".to_string()
        } else {
            node.sequence().to_string()
        };
        let length = node.full_length();

        let mut line = format!("S\t{}\t{}\tLN:i:{}", node.name(), sequence, length);
        match depth_tag {
            DepthTag::Dp => line.push_str(&format!("\tDP:f:{}", node.depth())),
            DepthTag::Kc | DepthTag::Rc | DepthTag::Fc => {
                let count = (node.depth() * f64::from(length)).round() as u64;
                line.push_str(&format!("\t{}:i:{}", depth_tag.as_str(), count));
            }
        }
        if let Some(label) = node.custom_label() {
            line.push_str(&format!("\tLB:z:{label}"));
        }
        if let Some(colour) = node.custom_colour() {
            line.push_str(&format!("\tCL:z:{colour}"));
        }
        Ok(line)
    }

    /// GFA 1 `L` line for an edge, overlap written as an `M` CIGAR, without
    /// a trailing newline.
    pub fn gfa_link_line(&self, id: EdgeId) -> Result<String, GraphError> {
        let edge = self.edge(id).ok_or(GraphError::UnknownEdge(id))?;
        let from = self.require_node(edge.from())?;
        let to = self.require_node(edge.to())?;
        Ok(format!(
            "L\t{}\t{}\t{}\t{}\t{}M",
            from.name(),
            from.strand().sign(),
            to.name(),
            to.strand().sign(),
            edge.overlap()
        ))
    }

    /// The whole graph as GFA 1: a header, one `S` line per segment and one
    /// `L` line per edge pair, using the configured depth tag.
    pub fn to_gfa(&self) -> Result<String, GraphError> {
        let depth_tag = self.config().depth_tag;
        let mut gfa = String::from("H\tVN:Z:1.0\n");

        for (id, _) in self.positive_nodes() {
            gfa.push_str(&self.gfa_segment_line(id, depth_tag)?);
            gfa.push('\n');
        }
        for (id, edge) in self.edges() {
            if id <= edge.reverse_complement() {
                gfa.push_str(&self.gfa_link_line(id)?);
                gfa.push('\n');
            }
        }
        Ok(gfa)
    }

    fn positive_of(&self, id: NodeId) -> Result<&GraphNode, GraphError> {
        let node = self.require_node(id)?;
        if node.is_positive() {
            Ok(node)
        } else {
            self.require_node(node.reverse_complement())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::AssemblyGraph;
    use crate::sequence::PackedSequence;
    use crate::{DepthTag, GraphConfig};

    #[test]
    fn fasta_wraps_at_configured_width() {
        let mut graph = AssemblyGraph::with_config(GraphConfig::default().with_fasta_line_width(4));
        let (_, neg) = graph
            .add_node_pair("7", 2.5, "AACCGGTTA".parse::<PackedSequence>().unwrap())
            .unwrap();

        let record = graph.fasta_record(neg, true, true).unwrap();
        assert_eq!(record, ">NODE_7-_length_9_cov_2.5\nTAAC\nCGGT\nT\n");

        let unwrapped = graph.fasta_record(neg, false, false).unwrap();
        assert_eq!(unwrapped, ">NODE_7_length_9_cov_2.5\nTAACCGGTT\n");
    }

    #[test]
    fn segment_line_with_missing_sequence() {
        let mut graph = AssemblyGraph::new();
        let (_, neg) = graph
            .add_node_pair_with_length("12", 3.0, PackedSequence::empty(), 100)
            .unwrap();
        assert_eq!(
            graph.gfa_segment_line(neg, DepthTag::Dp).unwrap(),
            "S\t12\t*\tLN:i:100\tDP:f:3"
        );
        assert_eq!(
            graph.gfa_segment_line(neg, DepthTag::Kc).unwrap(),
            "S\t12\t*\tLN:i:100\tKC:i:300"
        );
        assert_eq!(
            graph.gfa_segment_line(neg, DepthTag::Rc).unwrap(),
            "S\t12\t*\tLN:i:100\tRC:i:300"
        );
        assert_eq!(graph.fasta_record(neg, true, true).unwrap(), ">NODE_12-_length_100_cov_3\n");
    }

    #[test]
    fn segment_line_carries_label_and_colour() {
        let mut graph = AssemblyGraph::new();
        let (pos, _) = graph
            .add_node_pair("a", 1.5, "ACGT".parse::<PackedSequence>().unwrap())
            .unwrap();
        let node = graph.node_mut(pos).unwrap();
        node.set_custom_label("gene\tx");
        node.set_custom_colour(Some("red".into()));
        assert_eq!(
            graph.gfa_segment_line(pos, DepthTag::Dp).unwrap(),
            "S\ta\tACGT\tLN:i:4\tDP:f:1.5\tLB:z:gene    x\tCL:z:red"
        );
    }

    #[test]
    fn gfa_lists_each_edge_pair_once() {
        let mut graph = AssemblyGraph::new();
        graph.add_node_pair("1", 1.0, "ACGT".parse::<PackedSequence>().unwrap()).unwrap();
        graph.add_node_pair("2", 1.0, "GGCC".parse::<PackedSequence>().unwrap()).unwrap();
        graph.add_edge_by_name("1+", "2-", 2).unwrap();
        graph.add_edge_by_name("1+", "1-", 0).unwrap();

        let gfa = graph.to_gfa().unwrap();
        let lines: Vec<&str> = gfa.lines().collect();
        assert_eq!(lines[0], "H\tVN:Z:1.0");
        assert_eq!(lines.iter().filter(|l| l.starts_with('S')).count(), 2);
        let links: Vec<&str> = lines.iter().copied().filter(|l| l.starts_with('L')).collect();
        assert_eq!(links, vec!["L\t1\t+\t2\t-\t2M", "L\t1\t+\t1\t-\t0M"]);
    }
}
