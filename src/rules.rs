use crate::config::{Alphabet, QualityEncoding, ValidatorConfig};
use crate::error::ErrorKind;
use crate::record::{Field, Record};
use crate::report::excerpt;

/// A rule failure, located relative to its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Violation {
    pub kind: ErrorKind,
    pub field: Field,
    /// 1-based column of the offending byte, when there is one.
    pub column: Option<usize>,
    pub detail: String,
}

/// Per-record structural and alphabet checks, compiled from a configuration.
#[derive(Debug, Clone)]
pub(crate) struct RecordValidator {
    alphabet: Alphabet,
    encoding: QualityEncoding,
    max_score: u8,
    quality_ok: [bool; 256],
}

impl RecordValidator {
    pub fn new(config: &ValidatorConfig) -> Self {
        let encoding = config.quality_encoding;
        let max_score = i32::from(config.max_quality_score);
        let mut quality_ok = [false; 256];
        for (byte, ok) in quality_ok.iter_mut().enumerate() {
            let byte = byte as u8;
            *ok = byte.is_ascii() && (0..=max_score).contains(&encoding.decode(byte));
        }

        Self {
            alphabet: config.alphabet.clone(),
            encoding,
            max_score: config.max_quality_score,
            quality_ok,
        }
    }

    /// Runs every rule in order and stops at the first failure.
    pub fn check(&self, record: &Record<'_>) -> Result<(), Violation> {
        self.check_header(record)?;
        self.check_separator(record)?;
        self.check_sequence(record)?;
        self.check_lengths(record)?;
        self.check_quality(record)
    }

    fn check_header(&self, record: &Record<'_>) -> Result<(), Violation> {
        let header = record.header.bytes;
        if header.first() == Some(&b'@') {
            return Ok(());
        }
        Err(Violation {
            kind: ErrorKind::HeaderFormat,
            field: Field::Header,
            column: None,
            detail: format!("expected '@', found \"{}\"", excerpt(header)),
        })
    }

    fn check_separator(&self, record: &Record<'_>) -> Result<(), Violation> {
        let separator = record.separator.bytes;
        let Some((&b'+', repeated)) = separator.split_first() else {
            return Err(Violation {
                kind: ErrorKind::SeparatorFormat,
                field: Field::Separator,
                column: None,
                detail: format!("expected '+', found \"{}\"", excerpt(separator)),
            });
        };

        if repeated.is_empty() || repeated == &record.header.bytes[1..] {
            return Ok(());
        }
        Err(Violation {
            kind: ErrorKind::SeparatorMismatch,
            field: Field::Separator,
            column: Some(2),
            detail: format!(
                "separator \"{}\" does not match header \"{}\"",
                excerpt(separator),
                excerpt(record.header.bytes)
            ),
        })
    }

    fn check_sequence(&self, record: &Record<'_>) -> Result<(), Violation> {
        let sequence = record.sequence.bytes;
        let Some(pos) = self.alphabet.first_invalid(sequence) else {
            return Ok(());
        };
        Err(Violation {
            kind: ErrorKind::InvalidSequenceCharacter {
                character: char_at(sequence, pos),
                column: pos + 1,
            },
            field: Field::Sequence,
            column: Some(pos + 1),
            detail: format!("in sequence \"{}\"", excerpt(sequence)),
        })
    }

    fn check_lengths(&self, record: &Record<'_>) -> Result<(), Violation> {
        let sequence = record.sequence.bytes.len();
        let quality = record.quality.bytes.len();
        if sequence == quality {
            return Ok(());
        }
        Err(Violation {
            kind: ErrorKind::LengthMismatch { sequence, quality },
            field: Field::Quality,
            column: None,
            detail: format!("quality \"{}\"", excerpt(record.quality.bytes)),
        })
    }

    fn check_quality(&self, record: &Record<'_>) -> Result<(), Violation> {
        let quality = record.quality.bytes;
        let Some(pos) = quality.iter().position(|&b| !self.quality_ok[usize::from(b)]) else {
            return Ok(());
        };
        let byte = quality[pos];
        Err(Violation {
            kind: ErrorKind::QualityScoreRange {
                character: char_at(quality, pos),
                column: pos + 1,
                score: self.encoding.decode(byte),
                max: self.max_score,
            },
            field: Field::Quality,
            column: Some(pos + 1),
            detail: format!("{:?} quality \"{}\"", self.encoding, excerpt(quality)),
        })
    }
}

/// Character starting at byte `pos`. Scanned lines are valid UTF-8 and every
/// rule table is ASCII-only, so `pos` is always a character boundary.
fn char_at(line: &[u8], pos: usize) -> char {
    std::str::from_utf8(&line[pos..])
        .ok()
        .and_then(|rest| rest.chars().next())
        .unwrap_or(char::from(line[pos]))
}
