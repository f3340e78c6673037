use std::fmt;

use super::EdgeId;
use crate::sequence::PackedSequence;

/// Stable handle to a node slot in an [`AssemblyGraph`](super::AssemblyGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "node arena overflow");
        Self(index as u32)
    }

    /// Arena slot index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Which strand of a segment a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strand {
    /// Forward strand, written `+`.
    Positive,
    /// Reverse-complement strand, written `-`.
    Negative,
}

impl Strand {
    /// Parse a `+`/`-` sign.
    pub fn from_sign(sign: char) -> Option<Self> {
        match sign {
            '+' => Some(Strand::Positive),
            '-' => Some(Strand::Negative),
            _ => None,
        }
    }

    /// `+` or `-`.
    pub fn sign(self) -> char {
        match self {
            Strand::Positive => '+',
            Strand::Negative => '-',
        }
    }

    /// The other strand.
    pub fn opposite(self) -> Self {
        match self {
            Strand::Positive => Strand::Negative,
            Strand::Negative => Strand::Positive,
        }
    }
}

/// Split `"12+"` into `("12", Positive)`.
///
/// A name without a trailing sign is read as the positive strand.
pub fn parse_signed_name(name: &str) -> (&str, Strand) {
    match name.chars().last().and_then(Strand::from_sign) {
        Some(strand) => (&name[..name.len() - 1], strand),
        None => (name, Strand::Positive),
    }
}

/// How a node relates to the node a contiguity scan started from.
///
/// Statuses only move up in certainty:
/// `Starting < MaybeContiguous < ContiguousEitherStrand < ContiguousStrandSpecific`.
/// `NotContiguous` can be reached from any status and is absorbing until
/// [`GraphNode::reset_contiguity_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContiguityStatus {
    /// Not yet classified; also the status kept by the scan's start node.
    #[default]
    Starting,
    /// Lies on some path from the start node but not on all of them.
    MaybeContiguous,
    /// Contiguous with the start node on one strand or the other.
    ContiguousEitherStrand,
    /// Contiguous with the start node on this exact strand.
    ContiguousStrandSpecific,
    /// Not reachable as a continuation of the start node.
    NotContiguous,
}

impl ContiguityStatus {
    fn certainty(self) -> u8 {
        match self {
            ContiguityStatus::Starting => 0,
            ContiguityStatus::MaybeContiguous => 1,
            ContiguityStatus::ContiguousEitherStrand => 2,
            ContiguityStatus::ContiguousStrandSpecific => 3,
            ContiguityStatus::NotContiguous => 4,
        }
    }

    /// Whether moving from `self` to `new` is an upgrade.
    pub fn can_upgrade_to(self, new: ContiguityStatus) -> bool {
        self != ContiguityStatus::NotContiguous && new.certainty() > self.certainty()
    }

    /// Either of the two contiguous statuses.
    pub fn is_contiguous(self) -> bool {
        matches!(
            self,
            ContiguityStatus::ContiguousEitherStrand | ContiguityStatus::ContiguousStrandSpecific
        )
    }
}

/// Per-node boolean flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeFlags {
    /// Highlighted by a search or selection.
    pub special: bool,
    /// Part of the currently drawn scope.
    pub drawn: bool,
}

/// One strand of a graph segment.
///
/// Nodes are created in pairs by
/// [`AssemblyGraph::add_node_pair`](super::AssemblyGraph::add_node_pair) and
/// always know their partner's handle.
#[derive(Debug, Clone)]
pub struct GraphNode {
    name: String,
    strand: Strand,
    depth: f64,
    depth_relative_to_mean: f64,
    length: u32,
    sequence: PackedSequence,
    reverse_complement: NodeId,
    edges: Vec<EdgeId>,
    contiguity: ContiguityStatus,
    flags: NodeFlags,
    custom_colour: Option<String>,
    custom_label: Option<String>,
    csv_data: Vec<String>,
}

impl GraphNode {
    /// A `length` of zero means "take it from the sequence".
    pub(crate) fn new(
        name: String,
        strand: Strand,
        depth: f64,
        sequence: PackedSequence,
        length: u32,
        reverse_complement: NodeId,
    ) -> Self {
        let length = if length == 0 {
            sequence.len() as u32
        } else {
            length
        };
        Self {
            name,
            strand,
            depth,
            depth_relative_to_mean: 1.0,
            length,
            sequence,
            reverse_complement,
            edges: Vec::new(),
            contiguity: ContiguityStatus::Starting,
            flags: NodeFlags::default(),
            custom_colour: None,
            custom_label: None,
            csv_data: Vec::new(),
        }
    }

    /// Segment name without the strand sign.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Segment name with the strand sign appended, e.g. `"12-"`.
    pub fn signed_name(&self) -> String {
        format!("{}{}", self.name, self.strand.sign())
    }

    /// Strand this node represents.
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// `strand() == Positive`.
    pub fn is_positive(&self) -> bool {
        self.strand == Strand::Positive
    }

    /// `strand() == Negative`.
    pub fn is_negative(&self) -> bool {
        self.strand == Strand::Negative
    }

    /// Read depth (coverage).
    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// Overwrite the depth of this strand.
    pub fn set_depth(&mut self, depth: f64) {
        self.depth = depth;
    }

    /// Inclusive range test on depth.
    pub fn is_in_depth_range(&self, min: f64, max: f64) -> bool {
        self.depth >= min && self.depth <= max
    }

    /// Depth divided by the mean depth of the drawn nodes, as last computed by
    /// [`AssemblyGraph::recalculate_relative_depths`](super::AssemblyGraph::recalculate_relative_depths).
    pub fn depth_relative_to_mean(&self) -> f64 {
        self.depth_relative_to_mean
    }

    pub(crate) fn set_depth_relative_to_mean(&mut self, value: f64) {
        self.depth_relative_to_mean = value;
    }

    /// Segment length in bases. May be known when the sequence is not.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Sequence length when bases are present, otherwise the recorded length.
    pub fn full_length(&self) -> u32 {
        if self.sequence.is_empty() {
            self.length
        } else {
            self.sequence.len() as u32
        }
    }

    /// Bases of this strand.
    pub fn sequence(&self) -> &PackedSequence {
        &self.sequence
    }

    /// Replace the sequence and take the length from it.
    ///
    /// Only the graph calls this, so both strands change together.
    pub(crate) fn set_sequence(&mut self, sequence: PackedSequence) {
        self.length = sequence.len() as u32;
        self.sequence = sequence;
    }

    /// True when the sequence is empty or entirely ambiguous.
    pub fn sequence_is_missing(&self) -> bool {
        self.sequence.is_empty() || self.sequence.is_all_ambiguous()
    }

    /// Handle of the partner strand.
    pub fn reverse_complement(&self) -> NodeId {
        self.reverse_complement
    }

    /// Handles of every edge touching this node, in insertion order.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// Number of edges touching this node.
    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    /// Append `edge` unless it is already attached.
    pub(crate) fn add_edge(&mut self, edge: EdgeId) {
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    pub(crate) fn remove_edge(&mut self, edge: EdgeId) -> bool {
        match self.edges.iter().position(|&candidate| candidate == edge) {
            Some(pos) => {
                self.edges.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Current contiguity status.
    pub fn contiguity_status(&self) -> ContiguityStatus {
        self.contiguity
    }

    /// Move to `status` if it is an upgrade; otherwise keep the current status.
    /// Returns whether the status changed.
    pub fn upgrade_contiguity_status(&mut self, status: ContiguityStatus) -> bool {
        if self.contiguity.can_upgrade_to(status) {
            self.contiguity = status;
            true
        } else {
            false
        }
    }

    /// Force the status back to [`ContiguityStatus::Starting`].
    pub fn reset_contiguity_status(&mut self) {
        self.contiguity = ContiguityStatus::Starting;
    }

    /// Boolean flags.
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Highlighted by a search or selection.
    pub fn is_special(&self) -> bool {
        self.flags.special
    }

    /// Mark or unmark as special.
    pub fn set_special(&mut self, special: bool) {
        self.flags.special = special;
    }

    /// Part of the drawn scope.
    pub fn is_drawn(&self) -> bool {
        self.flags.drawn
    }

    /// Mark or unmark as drawn.
    pub fn set_drawn(&mut self, drawn: bool) {
        self.flags.drawn = drawn;
    }

    /// User colour, kept as the text the user supplied (`#rrggbb`, a name...).
    pub fn custom_colour(&self) -> Option<&str> {
        self.custom_colour.as_deref()
    }

    /// Set or clear the user colour.
    pub fn set_custom_colour(&mut self, colour: Option<String>) {
        self.custom_colour = colour;
    }

    /// User label.
    pub fn custom_label(&self) -> Option<&str> {
        self.custom_label.as_deref()
    }

    /// Set the user label. Tabs become four spaces so the label survives
    /// tab-separated output. An empty label clears it.
    pub fn set_custom_label(&mut self, label: &str) {
        self.custom_label = if label.is_empty() {
            None
        } else {
            Some(label.replace('\t', "    "))
        };
    }

    /// Whether CSV annotation rows are attached.
    pub fn has_csv_data(&self) -> bool {
        !self.csv_data.is_empty()
    }

    /// All attached CSV annotation cells.
    pub fn csv_data(&self) -> &[String] {
        &self.csv_data
    }

    /// Cell `i` of the attached CSV row, if present.
    pub fn csv_line(&self, i: usize) -> Option<&str> {
        self.csv_data.get(i).map(String::as_str)
    }

    /// Attach CSV annotation cells, replacing any previous ones.
    pub fn set_csv_data(&mut self, data: Vec<String>) {
        self.csv_data = data;
    }

    /// Drop CSV annotation cells.
    pub fn clear_csv_data(&mut self) {
        self.csv_data.clear();
    }
}
