use std::io;

use crate::error::{ErrorKind, FastqFormatError, ValidationError};
use crate::record::Record;
use crate::rules::Violation;

const EXCERPT_LEN: usize = 64;

/// A fault located by the component that raised it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fault {
    pub kind: ErrorKind,
    pub line_number: u64,
    pub byte_offset: u64,
    pub detail: String,
}

/// Why the scanner or assembler stopped.
#[derive(Debug)]
pub(crate) enum Halt {
    Io(io::Error),
    Fault(Fault),
}

impl From<io::Error> for Halt {
    fn from(e: io::Error) -> Self {
        Halt::Io(e)
    }
}

/// Attaches the record being assembled to a halt.
pub(crate) fn halt(halt: Halt, record_index: u64) -> FastqFormatError {
    match halt {
        Halt::Io(e) => FastqFormatError::Io(e),
        Halt::Fault(fault) => locate(fault, record_index).into(),
    }
}

pub(crate) fn locate(fault: Fault, record_index: u64) -> ValidationError {
    ValidationError::new(
        fault.kind,
        record_index,
        fault.line_number,
        fault.byte_offset,
        fault.detail,
    )
}

/// Resolves a rule violation to the absolute line, and byte when the
/// violation has a column.
pub(crate) fn violation(record: &Record<'_>, violation: Violation) -> ValidationError {
    let line = record.line(violation.field);
    let byte_offset = match violation.column {
        Some(column) => line.offset + column as u64 - 1,
        None => line.offset,
    };
    ValidationError::new(
        violation.kind,
        record.index,
        line.number,
        byte_offset,
        violation.detail,
    )
}

/// Printable, bounded rendering of offending content.
pub(crate) fn excerpt(bytes: &[u8]) -> String {
    if bytes.len() <= EXCERPT_LEN {
        return String::from_utf8_lossy(bytes).escape_debug().to_string();
    }
    let head = String::from_utf8_lossy(&bytes[..EXCERPT_LEN]);
    format!("{}...", head.escape_debug())
}
