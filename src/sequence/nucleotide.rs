/// Symbol every non-ACGT position decodes to.
pub const AMBIGUOUS_BASE: u8 = b'N';

/// Canonical nucleotide with its 2-bit code.
///
/// Codes are chosen so that the complement of `code` is `3 - code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Nucleotide {
    /// Adenine.
    A = 0,
    /// Cytosine.
    C = 1,
    /// Guanine.
    G = 2,
    /// Thymine.
    T = 3,
}

impl Nucleotide {
    /// Attempt to parse an ASCII base (either case) into a [`Nucleotide`].
    ///
    /// Everything outside `ACGTacgt`, IUPAC codes included, yields `None`.
    pub fn from_ascii(base: u8) -> Option<Self> {
        match base {
            b'A' | b'a' => Some(Nucleotide::A),
            b'C' | b'c' => Some(Nucleotide::C),
            b'G' | b'g' => Some(Nucleotide::G),
            b'T' | b't' => Some(Nucleotide::T),
            _ => None,
        }
    }

    /// Rebuild a nucleotide from the low two bits of `code`.
    #[inline]
    pub fn from_code(code: u8) -> Self {
        match code & 0b11 {
            0b00 => Nucleotide::A,
            0b01 => Nucleotide::C,
            0b10 => Nucleotide::G,
            _ => Nucleotide::T,
        }
    }

    /// The 2-bit packed code.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Uppercase ASCII symbol.
    #[inline]
    pub fn to_ascii(self) -> u8 {
        match self {
            Nucleotide::A => b'A',
            Nucleotide::C => b'C',
            Nucleotide::G => b'G',
            Nucleotide::T => b'T',
        }
    }

    /// Watson-Crick complement.
    #[inline]
    pub fn complement(self) -> Self {
        Self::from_code(0b11 - self.code())
    }
}

/// Complement a single ASCII base. Non-ACGT symbols become [`AMBIGUOUS_BASE`].
pub fn complement_base(base: u8) -> u8 {
    Nucleotide::from_ascii(base)
        .map(|nucleotide| nucleotide.complement().to_ascii())
        .unwrap_or(AMBIGUOUS_BASE)
}

/// Reverse complement a plain ASCII slice into a new uppercase vector.
pub fn reverse_complement_bytes(bases: &[u8]) -> Vec<u8> {
    bases.iter().rev().map(|&base| complement_base(base)).collect()
}
