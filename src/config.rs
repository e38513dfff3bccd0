use std::fmt;

use crate::error::AlphabetError;

/// Default chunk size for reads from the source.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Highest Phred score accepted by default (`~` under Phred+33).
pub const DEFAULT_MAX_QUALITY_SCORE: u8 = 93;

const NUCLEOTIDES: &[u8] = b"ACGTNacgtn";
const IUPAC: &[u8] = b"ACGTURYSWKMBDHVNacgturyswkmbdhvn";

const fn table(bytes: &[u8]) -> [bool; 256] {
    let mut table = [false; 256];
    let mut i = 0;
    while i < bytes.len() {
        table[bytes[i] as usize] = true;
        i += 1;
    }
    table
}

/// Set of bytes permitted on a sequence line.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    allowed: [bool; 256],
}

impl Alphabet {
    /// `ACGTN` in either case.
    pub const fn nucleotide() -> Self {
        Self {
            allowed: table(NUCLEOTIDES),
        }
    }

    /// IUPAC nucleotide codes, including `U` and the ambiguity codes, in either case.
    pub const fn iupac() -> Self {
        Self {
            allowed: table(IUPAC),
        }
    }

    /// Alphabet of exactly the given characters, which must be ASCII.
    pub fn from_chars(chars: &str) -> Result<Self, AlphabetError> {
        Self {
            allowed: [false; 256],
        }
        .with_extra(chars)
    }

    /// Extends the alphabet with additional ASCII characters.
    pub fn with_extra(mut self, chars: &str) -> Result<Self, AlphabetError> {
        if let Some(c) = chars.chars().find(|c| !c.is_ascii()) {
            return Err(AlphabetError::NonAscii(c));
        }
        for b in chars.bytes() {
            self.allowed[usize::from(b)] = true;
        }
        Ok(self)
    }

    #[inline]
    pub fn contains(&self, byte: u8) -> bool {
        self.allowed[usize::from(byte)]
    }

    /// Index of the first byte not in the alphabet.
    #[inline]
    pub fn first_invalid(&self, seq: &[u8]) -> Option<usize> {
        seq.iter().position(|&b| !self.contains(b))
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::nucleotide()
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chars: String = (0..=u8::MAX)
            .filter(|&b| self.contains(b))
            .map(char::from)
            .collect();
        f.debug_tuple("Alphabet").field(&chars).finish()
    }
}

/// ASCII offset used to encode Phred scores as characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityEncoding {
    #[default]
    Phred33,
    Phred64,
}

impl QualityEncoding {
    pub const fn offset(self) -> u8 {
        match self {
            QualityEncoding::Phred33 => 33,
            QualityEncoding::Phred64 => 64,
        }
    }

    /// Decodes one quality character; negative results are out of range.
    #[inline]
    pub const fn decode(self, byte: u8) -> i32 {
        byte as i32 - self.offset() as i32
    }
}

/// Options recognized by [`crate::Validator`].
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Bytes requested from the source per read.
    pub chunk_size: usize,
    pub alphabet: Alphabet,
    pub quality_encoding: QualityEncoding,
    pub max_quality_score: u8,
    /// Reject a read name that already appeared earlier in the source.
    pub check_duplicate_names: bool,
    /// Accept a source with no records.
    pub allow_empty: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            alphabet: Alphabet::nucleotide(),
            quality_encoding: QualityEncoding::Phred33,
            max_quality_score: DEFAULT_MAX_QUALITY_SCORE,
            check_duplicate_names: false,
            allow_empty: true,
        }
    }
}

impl ValidatorConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn with_quality_encoding(mut self, encoding: QualityEncoding) -> Self {
        self.quality_encoding = encoding;
        self
    }

    pub fn with_max_quality_score(mut self, max: u8) -> Self {
        self.max_quality_score = max;
        self
    }

    pub fn with_duplicate_check(mut self, enabled: bool) -> Self {
        self.check_duplicate_names = enabled;
        self
    }

    pub fn with_allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }
}
