//! Random-access sinks
//!
//! The framer closes its JSON container by overwriting the last separator
//! in place, so it needs a destination that can seek and truncate.

use std::fs::File;
use std::io::{self, BufWriter, Cursor, Seek, SeekFrom, Write};

/// A writer that can also seek and be cut to a given length
pub trait RandomAccessSink: Write + Seek {
    /// Cut the sink to exactly `len` bytes
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl RandomAccessSink for File {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

impl RandomAccessSink for BufWriter<File> {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.flush()?;
        self.get_ref().set_len(len)
    }
}

impl RandomAccessSink for Cursor<Vec<u8>> {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "length exceeds memory"))?;
        self.get_mut().truncate(len);
        if self.position() > len as u64 {
            self.set_position(len as u64);
        }
        Ok(())
    }
}

impl<S: RandomAccessSink + ?Sized> RandomAccessSink for &mut S {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        (**self).truncate(len)
    }
}

// ============================================================================
// Buffering adapter
// ============================================================================

/// Gives an append-only writer the random-access capability
///
/// Everything is staged in memory and handed to the inner writer on
/// [`BufferedSink::finish`]. Use this only for destinations that cannot
/// seek (sockets, pipes, stdout).
#[derive(Debug)]
pub struct BufferedSink<W: Write> {
    buffer: Cursor<Vec<u8>>,
    inner: W,
}

impl<W: Write> BufferedSink<W> {
    /// Wrap an append-only writer
    pub fn new(inner: W) -> Self {
        Self {
            buffer: Cursor::new(Vec::new()),
            inner,
        }
    }

    /// Bytes staged so far
    pub fn buffered_len(&self) -> usize {
        self.buffer.get_ref().len()
    }

    /// Write the staged bytes to the inner writer and return it
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.write_all(self.buffer.get_ref())?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for BufferedSink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: Write> Seek for BufferedSink<W> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.buffer.seek(pos)
    }
}

impl<W: Write> RandomAccessSink for BufferedSink<W> {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.buffer.truncate(len)
    }
}
