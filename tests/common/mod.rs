#![allow(dead_code)]

use asmgraph::{AssemblyGraph, GraphConfig, NodeId, PackedSequence};

pub fn seq(bases: &str) -> PackedSequence {
    bases.parse().expect("valid test sequence")
}

/// Graph with one segment per `(name, depth, bases)` entry.
pub fn graph_with_nodes(nodes: &[(&str, f64, &str)]) -> AssemblyGraph {
    graph_with_config(nodes, GraphConfig::default())
}

pub fn graph_with_config(nodes: &[(&str, f64, &str)], config: GraphConfig) -> AssemblyGraph {
    let mut graph = AssemblyGraph::with_config(config);
    for (name, depth, bases) in nodes {
        graph
            .add_node_pair(name, *depth, seq(bases))
            .expect("unique test node name");
    }
    graph
}

/// Add edges given as `(from, to)` signed names with zero overlap.
pub fn add_edges(graph: &mut AssemblyGraph, edges: &[(&str, &str)]) {
    for (from, to) in edges {
        graph
            .add_edge_by_name(from, to, 0)
            .expect("test edge endpoints exist");
    }
}

/// Linear chain `0+ -> 1+ -> ... -> (len-1)+`.
pub fn chain(len: usize) -> AssemblyGraph {
    let mut graph = AssemblyGraph::new();
    for i in 0..len {
        graph
            .add_node_pair(&i.to_string(), 1.0, seq("ACGTACGT"))
            .expect("unique test node name");
    }
    for i in 1..len {
        graph
            .add_edge_by_name(&format!("{}+", i - 1), &format!("{i}+"), 0)
            .expect("test edge endpoints exist");
    }
    graph
}

pub fn node(graph: &AssemblyGraph, name: &str) -> NodeId {
    graph
        .find_node(name)
        .unwrap_or_else(|| panic!("node {name} exists"))
}
