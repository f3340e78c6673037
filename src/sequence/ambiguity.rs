use std::collections::BTreeMap;

const BITS_PER_WORD: usize = 64;

/// Sparse bitset of ambiguous positions inside a packed buffer.
///
/// Only words holding at least one set bit are stored, so a long contig with
/// a handful of `N` runs costs a few map entries rather than one bit per base.
/// Positions are physical buffer offsets, never view offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmbiguityMask {
    words: BTreeMap<usize, u64>,
    count: usize,
}

impl AmbiguityMask {
    /// Create an empty mask.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mask with every position in `0..len` set.
    pub fn filled(len: usize) -> Self {
        let mut words = BTreeMap::new();
        let full_words = len / BITS_PER_WORD;
        for word_idx in 0..full_words {
            words.insert(word_idx, u64::MAX);
        }
        let tail = len % BITS_PER_WORD;
        if tail != 0 {
            words.insert(full_words, (1u64 << tail) - 1);
        }
        Self { words, count: len }
    }

    /// Set `idx`. Returns `true` if it was not already present.
    pub fn insert(&mut self, idx: usize) -> bool {
        let (word_idx, bit_idx) = bit_position(idx);
        let word = self.words.entry(word_idx).or_insert(0);
        let bit = 1u64 << bit_idx;
        if *word & bit != 0 {
            return false;
        }
        *word |= bit;
        self.count += 1;
        true
    }

    /// Whether `idx` is set.
    pub fn contains(&self, idx: usize) -> bool {
        let (word_idx, bit_idx) = bit_position(idx);
        self.words
            .get(&word_idx)
            .map(|word| (word >> bit_idx) & 1 == 1)
            .unwrap_or(false)
    }

    /// Number of set positions.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns `true` when no position is set.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of set positions in `start..end`.
    pub fn count_range(&self, start: usize, end: usize) -> usize {
        if start >= end {
            return 0;
        }
        let (first_word, first_bit) = bit_position(start);
        let (last_word, last_bit) = bit_position(end - 1);

        self.words
            .range(first_word..=last_word)
            .map(|(&word_idx, &bits)| {
                let mut mask = u64::MAX;
                if word_idx == first_word {
                    mask &= u64::MAX << first_bit;
                }
                if word_idx == last_word {
                    mask &= u64::MAX >> (BITS_PER_WORD - 1 - last_bit);
                }
                (bits & mask).count_ones() as usize
            })
            .sum()
    }

    /// Iterate over set positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().flat_map(|(&word_idx, &bits)| {
            (0..BITS_PER_WORD)
                .filter(move |bit| (bits >> bit) & 1 == 1)
                .map(move |bit| word_idx * BITS_PER_WORD + bit)
        })
    }
}

fn bit_position(idx: usize) -> (usize, usize) {
    (idx / BITS_PER_WORD, idx % BITS_PER_WORD)
}
