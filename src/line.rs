use std::io::Read;

use memchr::memchr;

use crate::chunk::ChunkReader;
use crate::error::ErrorKind;
use crate::report::{Fault, Halt, excerpt};

/// Location of one line inside the scanner's window, terminator excluded.
///
/// `start`/`end` stay valid until the next [`LineScanner::release`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineSpan {
    pub start: usize,
    pub end: usize,
    pub number: u64,
    pub offset: u64,
}

impl LineSpan {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Splits a chunked byte stream into `\n`-terminated lines without copying.
pub(crate) struct LineScanner<R> {
    reader: ChunkReader<R>,
    /// Window position where the next line starts.
    cursor: usize,
    /// Bytes between `cursor` and here hold no terminator.
    searched: usize,
    line_number: u64,
}

impl<R: Read> LineScanner<R> {
    pub fn new(reader: ChunkReader<R>) -> Self {
        Self {
            reader,
            cursor: 0,
            searched: 0,
            line_number: 0,
        }
    }

    /// Returns the next line, or `None` at end of source.
    pub fn next_line(&mut self) -> Result<Option<LineSpan>, Halt> {
        loop {
            let window = self.reader.window();
            if let Some(pos) = memchr(b'\n', &window[self.searched..]) {
                let newline = self.searched + pos;
                return self.take_line(newline, newline + 1).map(Some);
            }
            self.searched = window.len();

            if self.reader.next_chunk()? == 0 {
                let end = self.reader.window().len();
                if self.cursor == end {
                    return Ok(None);
                }
                // Last line has no terminator.
                return self.take_line(end, end).map(Some);
            }
        }
    }

    /// Drops every line returned so far from the window.
    pub fn release(&mut self) {
        self.reader.release(self.cursor);
        self.searched -= self.cursor;
        self.cursor = 0;
    }

    #[inline]
    pub fn window(&self) -> &[u8] {
        self.reader.window()
    }

    pub fn lines_read(&self) -> u64 {
        self.line_number
    }

    pub fn bytes_read(&self) -> u64 {
        self.reader.bytes_read()
    }

    fn take_line(&mut self, end: usize, next: usize) -> Result<LineSpan, Halt> {
        let window = self.reader.window();
        let start = self.cursor;
        let end = if end > start && window[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };

        self.line_number += 1;
        let span = LineSpan {
            start,
            end,
            number: self.line_number,
            offset: self.reader.window_offset() + start as u64,
        };

        let content = &window[start..end];
        if let Some(column) = invalid_text_position(content) {
            let byte = content[column];
            return Err(Halt::Fault(Fault {
                kind: ErrorKind::Encoding { byte },
                line_number: span.number,
                byte_offset: span.offset + column as u64,
                detail: format!(
                    "byte 0x{byte:02x} at column {} in \"{}\"",
                    column + 1,
                    excerpt(content)
                ),
            }));
        }

        self.cursor = next;
        self.searched = next;
        Ok(span)
    }
}

#[inline]
fn is_control(b: u8) -> bool {
    (b < 0x20 && b != b'\t') || b == 0x7f
}

/// Index of the first byte that keeps `line` from being valid text.
fn invalid_text_position(line: &[u8]) -> Option<usize> {
    if let Some(pos) = line.iter().position(|&b| is_control(b)) {
        return Some(pos);
    }
    if line.is_ascii() {
        return None;
    }
    std::str::from_utf8(line).err().map(|e| e.valid_up_to())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect_lines(data: &[u8], chunk_size: usize) -> Vec<(Vec<u8>, u64, u64)> {
        let mut scanner = LineScanner::new(ChunkReader::with_capacity(
            chunk_size,
            Cursor::new(data.to_vec()),
        ));
        let mut lines = Vec::new();
        while let Some(span) = scanner.next_line().unwrap() {
            lines.push((
                scanner.window()[span.start..span.end].to_vec(),
                span.number,
                span.offset,
            ));
            scanner.release();
        }
        lines
    }

    #[test]
    fn test_lines_and_offsets() {
        let lines = collect_lines(b"@r1\nACGT\n+\n!!!!\n", 1024);
        assert_eq!(
            lines,
            vec![
                (b"@r1".to_vec(), 1, 0),
                (b"ACGT".to_vec(), 2, 4),
                (b"+".to_vec(), 3, 9),
                (b"!!!!".to_vec(), 4, 11),
            ]
        );
    }

    #[test]
    fn test_missing_final_terminator() {
        let lines = collect_lines(b"ACGT\nTG", 1024);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], (b"TG".to_vec(), 2, 5));
    }

    #[test]
    fn test_crlf_line_endings() {
        let lines = collect_lines(b"@r1\r\nACGT\r\n\r\nTT\r", 1024);
        let contents: Vec<&[u8]> = lines.iter().map(|l| l.0.as_slice()).collect();
        assert_eq!(contents, vec![&b"@r1"[..], b"ACGT", b"", b"TT"]);
        assert_eq!(lines[1].2, 5);
    }

    #[test]
    fn test_small_buffer() {
        let data = b"@read1 description\nACGTACGTACGT\n+\nIIIIIIIIIIII\n";
        let expected = collect_lines(data, 64 * 1024);
        for chunk_size in 1..=8 {
            assert_eq!(collect_lines(data, chunk_size), expected, "chunk size {chunk_size}");
        }
    }

    #[test]
    fn test_lines_held_across_chunks() {
        // Spans stay valid until release, even when later lines need more chunks.
        let data = b"@r1\nACGT\n+\n!!!!\n";
        let mut scanner = LineScanner::new(ChunkReader::with_capacity(3, Cursor::new(&data[..])));
        let spans: Vec<LineSpan> = (0..4).map(|_| scanner.next_line().unwrap().unwrap()).collect();
        let window = scanner.window();
        assert_eq!(&window[spans[0].start..spans[0].end], b"@r1");
        assert_eq!(&window[spans[3].start..spans[3].end], b"!!!!");
        assert!(scanner.next_line().unwrap().is_none());
        assert_eq!(scanner.lines_read(), 4);
        assert_eq!(scanner.bytes_read(), data.len() as u64);
    }

    #[test]
    fn test_control_byte_is_encoding_error() {
        let data = b"@r1\nAC\x00T\n";
        let mut scanner = LineScanner::new(ChunkReader::with_capacity(2, Cursor::new(&data[..])));
        scanner.next_line().unwrap();
        match scanner.next_line() {
            Err(Halt::Fault(fault)) => {
                assert_eq!(fault.kind, ErrorKind::Encoding { byte: 0 });
                assert_eq!(fault.line_number, 2);
                assert_eq!(fault.byte_offset, 6);
            }
            _ => panic!("expected an encoding fault"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_encoding_error() {
        let mut scanner =
            LineScanner::new(ChunkReader::with_capacity(16, Cursor::new(&b"@r\xff1\n"[..])));
        match scanner.next_line() {
            Err(Halt::Fault(fault)) => {
                assert_eq!(fault.kind, ErrorKind::Encoding { byte: 0xff });
                assert_eq!(fault.byte_offset, 2);
            }
            _ => panic!("expected an encoding fault"),
        }
    }

    #[test]
    fn test_utf8_and_tabs_are_text() {
        let lines = collect_lines("@r1\tcaf\u{e9}\n".as_bytes(), 4);
        assert_eq!(lines[0].0, "@r1\tcaf\u{e9}".as_bytes());
    }
}
