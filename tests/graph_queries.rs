mod common;

use asmgraph::{ContiguityStatus, DepthTag, GraphConfig};
use common::{add_edges, chain, graph_with_config, graph_with_nodes, node};
use test_case::test_case;

#[test]
fn breadth_first_terminates_on_cycles() {
    let mut graph = chain(4);
    add_edges(&mut graph, &[("3+", "0+"), ("2+", "2+"), ("1+", "2+")]);
    let start = node(&graph, "0+");

    let component = graph.connected_component(start).unwrap();
    assert_eq!(component.len(), 4);
    let mut sorted = component.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), component.len());

    let reached = graph.nodes_within_distance(start, 2).unwrap();
    assert_eq!(reached.len(), 4);
    assert_eq!(reached.iter().filter(|&&(_, hops)| hops == 1).count(), 2);
}

#[test]
fn component_follows_edges_onto_the_other_strand() {
    let mut graph = chain(2);
    graph.add_node_pair("x", 1.0, common::seq("GATTACA")).unwrap();
    add_edges(&mut graph, &[("1+", "x-")]);

    let component = graph.connected_component(node(&graph, "0+")).unwrap();
    assert!(component.contains(&node(&graph, "x-")));
    assert!(!component.contains(&node(&graph, "x+")));
    assert_eq!(graph.connected_components().len(), 1);
}

#[test]
fn dead_end_scenarios() {
    let mut graph = graph_with_nodes(&[("1", 1.0, "ACGT"), ("2", 1.0, "ACGT")]);
    let one = node(&graph, "1+");
    assert_eq!(graph.dead_end_count(one).unwrap(), 2);
    add_edges(&mut graph, &[("1+", "2+")]);
    assert_eq!(graph.dead_end_count(one).unwrap(), 1);
    // No leaving edge and one entering edge.
    assert_eq!(graph.dead_end_count(node(&graph, "2+")).unwrap(), 1);
    assert_eq!(graph.dead_end_count(node(&graph, "2-")).unwrap(), 1);
    add_edges(&mut graph, &[("1+", "1+")]);
    assert_eq!(graph.dead_end_count(one).unwrap(), 0);
}

#[test]
fn step_budget_limits_contiguity() {
    let config = GraphConfig::default().with_contiguity_search_steps(2);
    let nodes: Vec<(String, f64, &str)> = (0..6).map(|i| (i.to_string(), 1.0, "ACGT")).collect();
    let refs: Vec<(&str, f64, &str)> = nodes.iter().map(|(n, d, s)| (n.as_str(), *d, *s)).collect();
    let mut graph = graph_with_config(&refs, config);
    add_edges(
        &mut graph,
        &[("0+", "1+"), ("1+", "2+"), ("2+", "3+"), ("3+", "4+"), ("4+", "5+")],
    );

    graph.determine_contiguity(node(&graph, "0+")).unwrap();

    let status = |name: &str| graph.node(node(&graph, name)).unwrap().contiguity_status();
    assert_eq!(status("1+"), ContiguityStatus::ContiguousStrandSpecific);
    assert_eq!(status("2+"), ContiguityStatus::ContiguousStrandSpecific);
    assert_eq!(status("3+"), ContiguityStatus::NotContiguous);
    assert_eq!(status("5+"), ContiguityStatus::NotContiguous);
}

#[test]
fn contiguity_requires_a_live_start() {
    let mut graph = chain(2);
    let start = node(&graph, "0+");
    graph.remove_node_pair(start).unwrap();
    assert!(graph.determine_contiguity(start).is_err());
}

// Statuses only ever move up the order; NotContiguous holds until a reset.
#[test_case(ContiguityStatus::MaybeContiguous, ContiguityStatus::ContiguousEitherStrand, true ; "maybe to either")]
#[test_case(ContiguityStatus::ContiguousEitherStrand, ContiguityStatus::ContiguousStrandSpecific, true ; "either to strand specific")]
#[test_case(ContiguityStatus::ContiguousStrandSpecific, ContiguityStatus::MaybeContiguous, false ; "no downgrade")]
#[test_case(ContiguityStatus::NotContiguous, ContiguityStatus::ContiguousStrandSpecific, false ; "not contiguous is absorbing")]
fn contiguity_upgrades_through_the_graph(first: ContiguityStatus, second: ContiguityStatus, changes: bool) {
    let mut graph = chain(1);
    let id = node(&graph, "0+");
    let n = graph.node_mut(id).unwrap();
    assert!(n.upgrade_contiguity_status(first));
    assert_eq!(n.upgrade_contiguity_status(second), changes);
    graph.reset_contiguity();
    assert_eq!(graph.node(id).unwrap().contiguity_status(), ContiguityStatus::Starting);
}

#[test]
fn gfa_and_fasta_for_present_and_missing_sequences() {
    let config = GraphConfig::default().with_depth_tag(DepthTag::Fc);
    let mut graph = graph_with_config(&[("1", 2.0, "ACGTA")], config);
    graph
        .add_node_pair_with_length("2", 0.5, asmgraph::PackedSequence::empty(), 10)
        .unwrap();
    graph.add_edge_by_name("1+", "2-", 3).unwrap();

    let gfa = graph.to_gfa().unwrap();
    assert_eq!(
        gfa,
        "H\tVN:Z:1.0\nS\t1\tACGTA\tLN:i:5\tFC:i:10\nS\t2\t*\tLN:i:10\tFC:i:5\nL\t1\t+\t2\t-\t3M\n"
    );

    let fasta = graph.fasta_record(node(&graph, "1-"), true, true).unwrap();
    assert_eq!(fasta, ">NODE_1-_length_5_cov_2\nTACGT\n");
    let missing = graph.fasta_record(node(&graph, "2+"), false, true).unwrap();
    assert_eq!(missing, ">NODE_2_length_10_cov_0.5\n");
}

#[test]
fn neighbourhood_drawing_and_drawn_mean() {
    let mut graph = chain(5);
    graph.node_mut(node(&graph, "4+")).unwrap().set_depth(100.0);
    let reached = graph.mark_drawn_around(node(&graph, "0+"), 2).unwrap();
    assert_eq!(reached, 3);
    assert!(graph.node(node(&graph, "2-")).unwrap().is_drawn());
    assert!((graph.mean_drawn_depth() - 1.0).abs() < 1e-9);
    assert!(graph.mean_depth() > 1.0);
}
