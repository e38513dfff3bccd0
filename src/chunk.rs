use std::io::{self, Read};

use tracing::trace;

/// Forward-only block reader over a byte source.
///
/// Chunks are appended to a window of live bytes. The consumer releases
/// bytes it is done with; released bytes are dropped and the live tail is
/// moved to the front before the next chunk is read, so the buffer stays at
/// roughly one chunk plus whatever the consumer still holds.
pub(crate) struct ChunkReader<R> {
    inner: R,
    buf: Vec<u8>,
    start: usize,
    chunk_size: usize,
    base_offset: u64,
    total: u64,
    eof: bool,
}

impl<R: Read> ChunkReader<R> {
    pub fn with_capacity(chunk_size: usize, inner: R) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            inner,
            buf: Vec::with_capacity(chunk_size),
            start: 0,
            chunk_size,
            base_offset: 0,
            total: 0,
            eof: false,
        }
    }

    /// Reads the next chunk into the window. Returns the number of bytes
    /// read, 0 once the source is exhausted.
    pub fn next_chunk(&mut self) -> io::Result<usize> {
        if self.eof {
            return Ok(0);
        }
        self.compact();

        let len = self.buf.len();
        self.buf.resize(len + self.chunk_size, 0);
        let read = loop {
            match self.inner.read(&mut self.buf[len..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buf.truncate(len);
                    return Err(e);
                }
            }
        };
        self.buf.truncate(len + read);

        if read == 0 {
            self.eof = true;
        } else {
            self.total += read as u64;
            trace!(bytes = read, offset = self.total, "read chunk");
        }
        Ok(read)
    }

    /// Live bytes, from the first unreleased byte to the end of the last chunk.
    #[inline]
    pub fn window(&self) -> &[u8] {
        &self.buf[self.start..]
    }

    /// Absolute source offset of `window()[0]`.
    #[inline]
    pub fn window_offset(&self) -> u64 {
        self.base_offset + self.start as u64
    }

    /// Drops the first `amt` bytes of the window.
    pub fn release(&mut self, amt: usize) {
        debug_assert!(self.start + amt <= self.buf.len());
        self.start += amt;
    }

    /// Total bytes read from the source so far.
    pub fn bytes_read(&self) -> u64 {
        self.total
    }

    fn compact(&mut self) {
        if self.start == 0 {
            return;
        }
        self.buf.copy_within(self.start.., 0);
        self.buf.truncate(self.buf.len() - self.start);
        self.base_offset += self.start as u64;
        self.start = 0;
    }
}
