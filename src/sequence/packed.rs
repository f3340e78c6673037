use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use super::ambiguity::AmbiguityMask;
use super::nucleotide::{Nucleotide, AMBIGUOUS_BASE};
use super::SequenceError;

/// Number of bases encoded per `u64` chunk.
const BASES_PER_WORD: usize = 32;
/// Bits used to encode a single DNA base (A/C/G/T).
const BITS_PER_BASE: usize = 2;

/// Immutable packed storage shared by every view cut from it.
#[derive(Debug)]
struct PackedBuffer {
    words: Box<[u64]>,
    len: usize,
    ambiguous: Option<AmbiguityMask>,
}

impl PackedBuffer {
    fn pack(symbols: &[u8]) -> Self {
        let mut words = vec![0u64; words_for_len(symbols.len())];
        let mut ambiguous: Option<AmbiguityMask> = None;

        for (idx, &symbol) in symbols.iter().enumerate() {
            match Nucleotide::from_ascii(symbol) {
                Some(nucleotide) => {
                    let (word_idx, bit_shift) = word_position(idx);
                    words[word_idx] |= (nucleotide.code() as u64) << bit_shift;
                }
                None => {
                    ambiguous.get_or_insert_with(AmbiguityMask::new).insert(idx);
                }
            }
        }

        Self {
            words: words.into_boxed_slice(),
            len: symbols.len(),
            ambiguous,
        }
    }

    fn missing(len: usize) -> Self {
        Self {
            words: vec![0u64; words_for_len(len)].into_boxed_slice(),
            len,
            ambiguous: (len > 0).then(|| AmbiguityMask::filled(len)),
        }
    }

    #[inline]
    fn code_at(&self, idx: usize) -> u8 {
        let (word_idx, bit_shift) = word_position(idx);
        ((self.words[word_idx] >> bit_shift) & 0b11) as u8
    }

    #[inline]
    fn is_ambiguous(&self, idx: usize) -> bool {
        match &self.ambiguous {
            Some(mask) => mask.contains(idx),
            None => false,
        }
    }

    fn ambiguous_in(&self, start: usize, end: usize) -> usize {
        self.ambiguous
            .as_ref()
            .map(|mask| mask.count_range(start, end))
            .unwrap_or(0)
    }
}

/// View over a 2-bit packed nucleotide buffer.
///
/// Cloning, slicing and reverse complementing only adjust the view fields;
/// the underlying buffer is shared through an [`Arc`] and never written after
/// construction, so views can be read from any number of threads.
///
/// Positions that are not A/C/G/T are remembered in a sparse mask and always
/// decode to `N`, on either strand.
#[derive(Clone)]
pub struct PackedSequence {
    buffer: Arc<PackedBuffer>,
    offset: u32,
    len: u32,
    reverse_complemented: bool,
}

impl PackedSequence {
    /// Pack ASCII symbols. Anything outside `ACGTacgt` is stored as ambiguous.
    pub fn new(symbols: &[u8]) -> Result<Self, SequenceError> {
        let len = checked_len(symbols.len())?;
        Ok(Self::from_buffer(PackedBuffer::pack(symbols), len))
    }

    /// Sequence of `len` ambiguous bases, for segments whose bases are unknown.
    pub fn with_missing(len: u32) -> Self {
        Self::from_buffer(PackedBuffer::missing(len as usize), len)
    }

    /// Zero-length sequence.
    pub fn empty() -> Self {
        Self::from_buffer(PackedBuffer::pack(&[]), 0)
    }

    fn from_buffer(buffer: PackedBuffer, len: u32) -> Self {
        Self {
            buffer: Arc::new(buffer),
            offset: 0,
            len,
            reverse_complemented: false,
        }
    }

    /// Number of bases in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns `true` when the view is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether this view reads the buffer right to left, complemented.
    pub fn is_reverse_complemented(&self) -> bool {
        self.reverse_complemented
    }

    /// Decode the base at `index` as uppercase ASCII.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn get(&self, index: usize) -> u8 {
        match self.base_at(index) {
            Some(base) => base,
            None => panic!(
                "index {index} out of bounds for sequence of length {}",
                self.len
            ),
        }
    }

    /// Decode the base at `index`, or `None` past the end of the view.
    pub fn base_at(&self, index: usize) -> Option<u8> {
        if index >= self.len() {
            return None;
        }
        let physical = self.physical_index(index);
        if self.buffer.is_ambiguous(physical) {
            return Some(AMBIGUOUS_BASE);
        }
        let nucleotide = Nucleotide::from_code(self.buffer.code_at(physical));
        let nucleotide = if self.reverse_complemented {
            nucleotide.complement()
        } else {
            nucleotide
        };
        Some(nucleotide.to_ascii())
    }

    #[inline]
    fn physical_index(&self, index: usize) -> usize {
        let offset = self.offset as usize;
        if self.reverse_complemented {
            offset + self.len() - 1 - index
        } else {
            offset + index
        }
    }

    /// View of `from..to` (from inclusive, to exclusive) sharing this buffer.
    pub fn subrange(&self, from: usize, to: usize) -> Result<Self, SequenceError> {
        if from > to || to > self.len() {
            return Err(SequenceError::OutOfBounds {
                from,
                to,
                len: self.len(),
            });
        }
        let start = if self.reverse_complemented {
            self.offset as usize + self.len() - to
        } else {
            self.offset as usize + from
        };
        Ok(Self {
            buffer: Arc::clone(&self.buffer),
            offset: start as u32,
            len: (to - from) as u32,
            reverse_complemented: self.reverse_complemented,
        })
    }

    /// View of everything from `from` to the end.
    pub fn suffix_from(&self, from: usize) -> Result<Self, SequenceError> {
        self.subrange(from, self.len())
    }

    /// First `count` bases.
    pub fn first(&self, count: usize) -> Result<Self, SequenceError> {
        self.subrange(0, count)
    }

    /// Last `count` bases.
    pub fn last(&self, count: usize) -> Result<Self, SequenceError> {
        let from = self.len().checked_sub(count).ok_or(SequenceError::OutOfBounds {
            from: 0,
            to: count,
            len: self.len(),
        })?;
        self.suffix_from(from)
    }

    /// Reverse complement view over the same buffer.
    pub fn reverse_complement(&self) -> Self {
        Self {
            buffer: Arc::clone(&self.buffer),
            offset: self.offset,
            len: self.len,
            reverse_complemented: !self.reverse_complemented,
        }
    }

    /// Concatenate into a freshly packed buffer.
    ///
    /// Views may start at arbitrary bit offsets, so both operands are decoded
    /// and re-encoded rather than spliced word by word.
    pub fn concat(&self, other: &PackedSequence) -> Result<Self, SequenceError> {
        let mut joined = Vec::with_capacity(self.len() + other.len());
        joined.extend(self.iter());
        joined.extend(other.iter());
        Self::new(&joined)
    }

    /// Position of the first occurrence of `needle` at or after `from`.
    ///
    /// Plain O(n·m) scan over subranges.
    pub fn find(&self, needle: &PackedSequence, from: usize) -> Option<usize> {
        if needle.len() > self.len() {
            return None;
        }
        let last_start = self.len() - needle.len();
        (from..=last_start).find(|&start| {
            self.subrange(start, start + needle.len())
                .map(|window| &window == needle)
                .unwrap_or(false)
        })
    }

    /// Number of ambiguous positions in the view.
    pub fn ambiguous_count(&self) -> usize {
        let start = self.offset as usize;
        self.buffer.ambiguous_in(start, start + self.len())
    }

    /// Whether every position in a non-empty view is ambiguous.
    pub fn is_all_ambiguous(&self) -> bool {
        !self.is_empty() && self.ambiguous_count() == self.len()
    }

    /// Whether both views read the same underlying buffer.
    pub fn shares_buffer_with(&self, other: &PackedSequence) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }

    /// Bytes held by the packed words of the shared buffer.
    pub fn packed_bytes(&self) -> usize {
        self.buffer.words.len() * std::mem::size_of::<u64>()
    }

    /// Iterate over decoded bases (uppercase ASCII).
    pub fn iter(&self) -> Bases<'_> {
        Bases {
            sequence: self,
            front: 0,
            back: self.len(),
        }
    }

    /// Decode into a newly allocated vector of uppercase ASCII bases.
    pub fn to_vec(&self) -> Vec<u8> {
        self.iter().collect()
    }

    fn same_view(&self, other: &PackedSequence) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
            && self.offset == other.offset
            && self.len == other.len
            && self.reverse_complemented == other.reverse_complemented
    }
}

impl Default for PackedSequence {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for PackedSequence {
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        // Ambiguity lives in the shared buffer, so identical views agree on it too.
        if self.same_view(other) {
            return true;
        }
        self.iter().eq(other.iter())
    }
}

impl Eq for PackedSequence {}

impl PartialOrd for PackedSequence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackedSequence {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.same_view(other) {
            return Ordering::Equal;
        }
        self.iter().cmp(other.iter())
    }
}

impl Hash for PackedSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for base in self.iter() {
            base.hash(state);
        }
    }
}

impl FromStr for PackedSequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.as_bytes())
    }
}

impl fmt::Display for PackedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decoded = self.to_vec();
        write!(f, "{}", String::from_utf8_lossy(&decoded))
    }
}

impl fmt::Debug for PackedSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 24;
        let preview: String = self.iter().take(PREVIEW).map(char::from).collect();
        let ellipsis = if self.len() > PREVIEW { "..." } else { "" };
        f.debug_struct("PackedSequence")
            .field("len", &self.len)
            .field("offset", &self.offset)
            .field("reverse_complemented", &self.reverse_complemented)
            .field("bases", &format_args!("{preview}{ellipsis}"))
            .finish()
    }
}

/// Iterator over decoded bases of a [`PackedSequence`].
#[derive(Debug)]
pub struct Bases<'a> {
    sequence: &'a PackedSequence,
    front: usize,
    back: usize,
}

impl Iterator for Bases<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let base = self.sequence.base_at(self.front);
        self.front += 1;
        base
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Bases<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.sequence.base_at(self.back)
    }
}

impl ExactSizeIterator for Bases<'_> {}

fn checked_len(len: usize) -> Result<u32, SequenceError> {
    u32::try_from(len).map_err(|_| SequenceError::TooLong(len))
}

fn words_for_len(len: usize) -> usize {
    (len + BASES_PER_WORD - 1) / BASES_PER_WORD
}

fn word_position(idx: usize) -> (usize, usize) {
    let word_idx = idx / BASES_PER_WORD;
    let bit_shift = (idx % BASES_PER_WORD) * BITS_PER_BASE;
    (word_idx, bit_shift)
}
