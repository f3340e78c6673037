//! Bidirected assembly graph.
//!
//! Every segment is stored as two [`GraphNode`]s, one per strand, and every
//! overlap as two [`GraphEdge`]s: `u -> v` and its mirror `rc(v) -> rc(u)`.
//! Nodes and edges live in arenas addressed by [`NodeId`]/[`EdgeId`]; the
//! partner and endpoint relations are plain handle lookups.
//!
//! Removed entities leave empty slots behind so outstanding handles never
//! alias a different node or edge.

mod contiguity;
mod edge;
mod export;
mod neighbours;
mod node;
mod summary;
mod traversal;

pub use edge::{EdgeId, GraphEdge};
pub use node::{parse_signed_name, ContiguityStatus, GraphNode, NodeFlags, NodeId, Strand};
pub use summary::GraphSummary;

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, trace};

use crate::sequence::{PackedSequence, SequenceError};
use crate::GraphConfig;

/// Errors returned by graph construction, mutation and queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A node pair with this name already exists.
    #[error("node name '{0}' already exists")]
    DuplicateNodeName(String),

    /// Handle does not refer to a live node.
    #[error("no node with handle {0}")]
    UnknownNode(NodeId),

    /// No node carries this name.
    #[error("no node named '{0}'")]
    UnknownNodeName(String),

    /// Handle does not refer to a live edge.
    #[error("no edge with handle {0}")]
    UnknownEdge(EdgeId),

    /// Bare node names must be non-empty and must not end in a strand sign.
    #[error("malformed node name '{0}'")]
    MalformedNodeName(String),

    /// Sequence failure bubbling up from [`PackedSequence`].
    #[error("sequence error: {0}")]
    Sequence(#[from] SequenceError),
}

/// Arena of paired nodes and mirrored edges.
#[derive(Debug, Default)]
pub struct AssemblyGraph {
    nodes: Vec<Option<GraphNode>>,
    edges: Vec<Option<GraphEdge>>,
    names: HashMap<String, (NodeId, NodeId)>,
    live_nodes: usize,
    live_edges: usize,
    config: GraphConfig,
}

impl AssemblyGraph {
    /// Empty graph with the default configuration.
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Empty graph with `config`.
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            names: HashMap::new(),
            live_nodes: 0,
            live_edges: 0,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Mutable access to the configuration.
    pub fn config_mut(&mut self) -> &mut GraphConfig {
        &mut self.config
    }

    /// Number of live nodes, both strands counted.
    pub fn node_count(&self) -> usize {
        self.live_nodes
    }

    /// Number of live directed edges, mirrors counted separately.
    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    /// Returns `true` when the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.live_nodes == 0
    }

    /// Drop every node and edge. Previously issued handles become stale.
    pub fn clear(&mut self) {
        debug!(nodes = self.live_nodes, edges = self.live_edges, "clearing graph");
        self.nodes.clear();
        self.edges.clear();
        self.names.clear();
        self.live_nodes = 0;
        self.live_edges = 0;
    }

    /// Add a segment as a `name+`/`name-` node pair.
    ///
    /// The negative node reads `sequence.reverse_complement()`, a view over
    /// the same buffer. Fails without touching the graph if the name exists.
    pub fn add_node_pair(
        &mut self,
        name: &str,
        depth: f64,
        sequence: PackedSequence,
    ) -> Result<(NodeId, NodeId), GraphError> {
        self.add_node_pair_with_length(name, depth, sequence, 0)
    }

    /// Like [`add_node_pair`](Self::add_node_pair) for parsers that know a
    /// segment's length but not (yet) its bases. A `length` of zero takes
    /// the length from `sequence`.
    pub fn add_node_pair_with_length(
        &mut self,
        name: &str,
        depth: f64,
        sequence: PackedSequence,
        length: u32,
    ) -> Result<(NodeId, NodeId), GraphError> {
        if name.is_empty() || name.ends_with(['+', '-']) {
            return Err(GraphError::MalformedNodeName(name.to_string()));
        }
        if self.names.contains_key(name) {
            return Err(GraphError::DuplicateNodeName(name.to_string()));
        }

        let positive = NodeId::from_index(self.nodes.len());
        let negative = NodeId::from_index(self.nodes.len() + 1);
        let reverse = sequence.reverse_complement();

        self.nodes.push(Some(GraphNode::new(
            name.to_string(),
            Strand::Positive,
            depth,
            sequence,
            length,
            negative,
        )));
        self.nodes.push(Some(GraphNode::new(
            name.to_string(),
            Strand::Negative,
            depth,
            reverse,
            length,
            positive,
        )));
        self.names.insert(name.to_string(), (positive, negative));
        self.live_nodes += 2;

        trace!(name, %positive, %negative, depth, "added node pair");
        Ok((positive, negative))
    }

    /// Add `from -> to` together with its mirror `rc(to) -> rc(from)`.
    ///
    /// Both edges are inserted or neither is. An edge from a node to its own
    /// reverse complement is its own mirror and is inserted once. Returns the
    /// handle of the requested edge; the mirror is reachable through
    /// [`GraphEdge::reverse_complement`].
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, overlap: u32) -> Result<EdgeId, GraphError> {
        let from_rc = self.require_node(from)?.reverse_complement();
        let to_rc = self.require_node(to)?.reverse_complement();

        let forward = EdgeId::from_index(self.edges.len());
        let own_pair = from == to_rc;
        let mirror = if own_pair {
            forward
        } else {
            EdgeId::from_index(self.edges.len() + 1)
        };

        self.edges.push(Some(GraphEdge::new(from, to, overlap, mirror)));
        self.attach(forward, from, to);
        self.live_edges += 1;

        if !own_pair {
            self.edges.push(Some(GraphEdge::new(to_rc, from_rc, overlap, forward)));
            self.attach(mirror, to_rc, from_rc);
            self.live_edges += 1;
        }

        debug!(%from, %to, %forward, %mirror, overlap, "added edge pair");
        Ok(forward)
    }

    /// [`add_edge`](Self::add_edge) addressed by signed names such as `"4+"`.
    pub fn add_edge_by_name(&mut self, from: &str, to: &str, overlap: u32) -> Result<EdgeId, GraphError> {
        let from_id = self
            .find_node(from)
            .ok_or_else(|| GraphError::UnknownNodeName(from.to_string()))?;
        let to_id = self
            .find_node(to)
            .ok_or_else(|| GraphError::UnknownNodeName(to.to_string()))?;
        self.add_edge(from_id, to_id, overlap)
    }

    /// Remove an edge and its mirror.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<(), GraphError> {
        let edge = self
            .edges
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(GraphError::UnknownEdge(id))?;
        self.detach(id, &edge);
        self.live_edges -= 1;

        let mirror = edge.reverse_complement();
        if mirror != id {
            if let Some(mirror_edge) = self.edges.get_mut(mirror.index()).and_then(Option::take) {
                self.detach(mirror, &mirror_edge);
                self.live_edges -= 1;
            }
        }

        debug!(%id, %mirror, "removed edge pair");
        Ok(())
    }

    /// Remove the segment `id` belongs to: both strands and every edge that
    /// touches either of them, mirrors included.
    pub fn remove_node_pair(&mut self, id: NodeId) -> Result<(), GraphError> {
        let node = self.require_node(id)?;
        let partner = node.reverse_complement();
        let name = node.name().to_string();

        let mut incident: Vec<EdgeId> = node
            .edges()
            .iter()
            .chain(self.require_node(partner)?.edges())
            .copied()
            .collect();
        incident.sort_unstable();
        incident.dedup();

        for edge in &incident {
            // Mirrors of earlier entries are already gone.
            if self.edge(*edge).is_some() {
                self.remove_edge(*edge)?;
            }
        }

        self.nodes[id.index()] = None;
        self.nodes[partner.index()] = None;
        self.names.remove(&name);
        self.live_nodes -= 2;

        debug!(name = %name, edges = incident.len(), "removed node pair");
        Ok(())
    }

    /// Replace the bases of a segment. The partner receives the reverse
    /// complement view, and both lengths follow the new sequence.
    pub fn set_node_sequence(&mut self, id: NodeId, sequence: PackedSequence) -> Result<(), GraphError> {
        let partner = self.require_node(id)?.reverse_complement();
        let reverse = sequence.reverse_complement();
        if let Some(node) = self.slot_mut(id) {
            node.set_sequence(sequence);
        }
        if let Some(node) = self.slot_mut(partner) {
            node.set_sequence(reverse);
        }
        Ok(())
    }

    /// Node behind `id`, or `None` if the handle is stale.
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    /// Mutable node behind `id`, for annotation and flag updates.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.slot_mut(id)
    }

    /// Edge behind `id`, or `None` if the handle is stale.
    pub fn edge(&self, id: EdgeId) -> Option<&GraphEdge> {
        self.edges.get(id.index()).and_then(Option::as_ref)
    }

    /// `(positive, negative)` handles of the segment named `name` (no sign).
    pub fn find_node_pair(&self, name: &str) -> Option<(NodeId, NodeId)> {
        self.names.get(name).copied()
    }

    /// Handle of the node with signed name `name` (`"5-"`). An unsigned name
    /// resolves to the positive strand.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        let (bare, strand) = parse_signed_name(name);
        let (positive, negative) = self.find_node_pair(bare)?;
        Some(match strand {
            Strand::Positive => positive,
            Strand::Negative => negative,
        })
    }

    /// Positive strand of the segment whose name is the number `number`.
    pub fn node_by_number(&self, number: u64) -> Option<NodeId> {
        self.find_node_pair(&number.to_string())
            .map(|(positive, _)| positive)
    }

    /// Partner handle of `id`.
    pub fn reverse_complement_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).map(GraphNode::reverse_complement)
    }

    /// All live nodes with their handles, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &GraphNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|node| (NodeId::from_index(idx), node)))
    }

    /// Positive-strand nodes only: one entry per segment.
    pub fn positive_nodes(&self) -> impl Iterator<Item = (NodeId, &GraphNode)> + '_ {
        self.nodes().filter(|(_, node)| node.is_positive())
    }

    /// All live edges with their handles, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &GraphEdge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|edge| (EdgeId::from_index(idx), edge)))
    }

    /// Edges touching `id`. Empty for a stale handle.
    pub fn node_edges(&self, id: NodeId) -> impl Iterator<Item = (EdgeId, &GraphEdge)> + '_ {
        self.node(id)
            .into_iter()
            .flat_map(move |node| node.edges().iter())
            .filter_map(move |&edge_id| self.edge(edge_id).map(|edge| (edge_id, edge)))
    }

    pub(crate) fn require_node(&self, id: NodeId) -> Result<&GraphNode, GraphError> {
        self.node(id).ok_or(GraphError::UnknownNode(id))
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    fn attach(&mut self, edge: EdgeId, from: NodeId, to: NodeId) {
        if let Some(node) = self.slot_mut(from) {
            node.add_edge(edge);
        }
        if to != from {
            if let Some(node) = self.slot_mut(to) {
                node.add_edge(edge);
            }
        }
    }

    fn detach(&mut self, id: EdgeId, edge: &GraphEdge) {
        if let Some(node) = self.slot_mut(edge.from()) {
            node.remove_edge(id);
        }
        if edge.to() != edge.from() {
            if let Some(node) = self.slot_mut(edge.to()) {
                node.remove_edge(id);
            }
        }
    }
}
