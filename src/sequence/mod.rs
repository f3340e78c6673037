//! Packed nucleotide sequences.
//!
//! [`PackedSequence`] stores bases two bits apiece in a reference-counted
//! buffer. Slices and reverse complements are views over that buffer, so
//! taking them never copies or allocates.

mod ambiguity;
mod nucleotide;
mod packed;

pub use ambiguity::AmbiguityMask;
pub use nucleotide::{complement_base, reverse_complement_bytes, Nucleotide, AMBIGUOUS_BASE};
pub use packed::{Bases, PackedSequence};

use thiserror::Error;

/// Errors raised by [`PackedSequence`] construction and slicing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// Requested range does not satisfy `from <= to <= len`.
    #[error("range {from}..{to} is out of bounds for sequence of length {len}")]
    OutOfBounds {
        /// Inclusive start of the requested range.
        from: usize,
        /// Exclusive end of the requested range.
        to: usize,
        /// Length of the view being sliced.
        len: usize,
    },

    /// Sequence length does not fit the 32-bit length field.
    #[error("sequence of {0} bases exceeds the maximum supported length")]
    TooLong(usize),
}
