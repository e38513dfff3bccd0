use std::io::Read;

use crate::error::ErrorKind;
use crate::line::{LineScanner, LineSpan};
use crate::report::{Fault, Halt};

/// The four lines of a FASTQ record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Header,
    Sequence,
    Separator,
    Quality,
}

/// A borrowed line with its position in the source.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    pub bytes: &'a [u8],
    /// 1-based.
    pub number: u64,
    /// Absolute offset of the first byte.
    pub offset: u64,
}

impl<'a> Line<'a> {
    fn new(window: &'a [u8], span: LineSpan) -> Self {
        Self {
            bytes: &window[span.start..span.end],
            number: span.number,
            offset: span.offset,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Record<'a> {
    /// 1-based.
    pub index: u64,
    pub header: Line<'a>,
    pub sequence: Line<'a>,
    pub separator: Line<'a>,
    pub quality: Line<'a>,
}

impl<'a> Record<'a> {
    pub fn line(&self, field: Field) -> &Line<'a> {
        match field {
            Field::Header => &self.header,
            Field::Sequence => &self.sequence,
            Field::Separator => &self.separator,
            Field::Quality => &self.quality,
        }
    }
}

/// Groups scanned lines into four-line records.
pub(crate) struct RecordAssembler<R> {
    scanner: LineScanner<R>,
    next_index: u64,
}

impl<R: Read> RecordAssembler<R> {
    pub fn new(scanner: LineScanner<R>) -> Self {
        Self {
            scanner,
            next_index: 1,
        }
    }

    /// Returns the next complete record, or `None` at a clean end of source.
    ///
    /// The previous record is released first, so a record only lives until
    /// the next call.
    pub fn next_record(&mut self) -> Result<Option<Record<'_>>, Halt> {
        self.scanner.release();

        let Some(first) = self.first_line()? else {
            return Ok(None);
        };

        let mut spans = [first; 4];
        for (found, slot) in spans.iter_mut().enumerate().skip(1) {
            match self.scanner.next_line()? {
                Some(span) => *slot = span,
                None => {
                    return Err(Halt::Fault(Fault {
                        kind: ErrorKind::TruncatedRecord { lines: found },
                        line_number: first.number,
                        byte_offset: first.offset,
                        detail: format!(
                            "source ends {found} line(s) into the record starting at line {}",
                            first.number
                        ),
                    }));
                }
            }
        }

        let index = self.next_index;
        self.next_index += 1;

        let window = self.scanner.window();
        let [header, sequence, separator, quality] = spans.map(|span| Line::new(window, span));
        Ok(Some(Record {
            index,
            header,
            sequence,
            separator,
            quality,
        }))
    }

    /// Index the next record will get; the record being assembled when an
    /// error is raised.
    pub fn record_index(&self) -> u64 {
        self.next_index
    }

    pub fn lines_read(&self) -> u64 {
        self.scanner.lines_read()
    }

    pub fn bytes_read(&self) -> u64 {
        self.scanner.bytes_read()
    }

    /// First line of the next record. Empty lines running to the end of the
    /// source are not a record; an empty line followed by content is the
    /// (malformed) header of one.
    fn first_line(&mut self) -> Result<Option<LineSpan>, Halt> {
        let (line_number, byte_offset) = match self.scanner.next_line()? {
            Some(span) if !span.is_empty() => return Ok(Some(span)),
            Some(span) => (span.number, span.offset),
            None => return Ok(None),
        };

        // Blank lines belong to no record.
        self.scanner.release();
        while let Some(span) = self.scanner.next_line()? {
            if !span.is_empty() {
                return Err(Halt::Fault(Fault {
                    kind: ErrorKind::HeaderFormat,
                    line_number,
                    byte_offset,
                    detail: "expected '@', found an empty line".to_string(),
                }));
            }
            self.scanner.release();
        }
        Ok(None)
    }
}
