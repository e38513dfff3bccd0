use std::io;
use thiserror::Error;

/// What went wrong in a FASTQ source, independent of where.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("invalid text byte 0x{byte:02x}")]
    Encoding { byte: u8 },

    #[error("truncated record: expected 4 lines, found {lines}")]
    TruncatedRecord { lines: usize },

    #[error("header line does not start with '@'")]
    HeaderFormat,

    #[error("separator line does not start with '+'")]
    SeparatorFormat,

    #[error("separator line does not repeat the header")]
    SeparatorMismatch,

    #[error("invalid sequence character '{character}' at column {column}")]
    InvalidSequenceCharacter { character: char, column: usize },

    #[error("sequence length {sequence} does not match quality length {quality}")]
    LengthMismatch { sequence: usize, quality: usize },

    #[error("quality character '{character}' at column {column} decodes to {score}, outside 0..={max}")]
    QualityScoreRange {
        character: char,
        column: usize,
        score: i32,
        max: u8,
    },

    #[error("duplicate read name, first seen in record {first_record}")]
    DuplicateReadName { first_record: u64 },

    #[error("input contains no records")]
    EmptyInput,

    #[error("validation cancelled")]
    Cancelled,
}

impl ErrorKind {
    /// Stable name of the kind, suitable for branching in callers and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Encoding { .. } => "EncodingError",
            ErrorKind::TruncatedRecord { .. } => "TruncatedRecordError",
            ErrorKind::HeaderFormat => "HeaderFormatError",
            ErrorKind::SeparatorFormat => "SeparatorFormatError",
            ErrorKind::SeparatorMismatch => "SeparatorMismatchError",
            ErrorKind::InvalidSequenceCharacter { .. } => "InvalidSequenceCharacterError",
            ErrorKind::LengthMismatch { .. } => "LengthMismatchError",
            ErrorKind::QualityScoreRange { .. } => "QualityScoreRangeError",
            ErrorKind::DuplicateReadName { .. } => "DuplicateReadNameError",
            ErrorKind::EmptyInput => "EmptyInputError",
            ErrorKind::Cancelled => "CancelledError",
        }
    }
}

/// The first fault found in a source, with its location.
///
/// `record_index` and `line_number` are 1-based, `byte_offset` is 0-based and
/// points at the offending byte when the fault has a column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (record {record_index}, line {line_number}, byte {byte_offset}): {detail}")]
pub struct ValidationError {
    kind: ErrorKind,
    record_index: u64,
    line_number: u64,
    byte_offset: u64,
    detail: String,
}

impl ValidationError {
    pub(crate) fn new(
        kind: ErrorKind,
        record_index: u64,
        line_number: u64,
        byte_offset: u64,
        detail: String,
    ) -> Self {
        Self {
            kind,
            record_index,
            line_number,
            byte_offset,
            detail,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn record_index(&self) -> u64 {
        self.record_index
    }

    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    pub fn byte_offset(&self) -> u64 {
        self.byte_offset
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Rejected alphabet definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlphabetError {
    #[error("non-ASCII character '{0}' cannot be a sequence base")]
    NonAscii(char),
}

/// Errors from FASTQ validation.
#[derive(Debug, Error)]
pub enum FastqFormatError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl FastqFormatError {
    /// The located format fault, or `None` for I/O failures.
    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            FastqFormatError::Io(_) => None,
            FastqFormatError::Invalid(err) => Some(err),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            FastqFormatError::Io(_) => "IoError",
            FastqFormatError::Invalid(err) => err.kind().name(),
        }
    }
}
