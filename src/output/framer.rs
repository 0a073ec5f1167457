//! Incremental JSON container writer
//!
//! Elements are written as soon as they arrive, each followed by a `,`.
//! On finish the framer seeks back over the trailing separator, writes the
//! closing delimiter in its place and truncates the sink there. An empty
//! container just gets its closing delimiter appended.

use super::escape::{write_json, Escaping};
use super::sink::RandomAccessSink;
use crate::error::{Error, Result};
use serde::Serialize;
use std::io::{self, Seek, SeekFrom, Write};

const SEPARATOR: u8 = b',';

/// Writes one JSON array or object to a random-access sink
pub struct JsonFramer<'a, S: RandomAccessSink + ?Sized> {
    /// Destination, shared with nested framers by reborrowing
    sink: &'a mut S,
    /// Offset of the opening delimiter
    start: u64,
    /// `]` or `}`
    close: u8,
    /// String escaping for elements
    escaping: Escaping,
    /// Elements (or sections) written so far
    count: u64,
}

impl<'a, S: RandomAccessSink + ?Sized> JsonFramer<'a, S> {
    /// Open an array: writes `[`
    pub fn array(sink: &'a mut S, escaping: Escaping) -> Result<Self> {
        Self::open(sink, b'[', b']', escaping)
    }

    /// Open an object of named sections: writes `{`
    pub fn object(sink: &'a mut S) -> Result<Self> {
        Self::open(sink, b'{', b'}', Escaping::Standard)
    }

    fn open(sink: &'a mut S, open: u8, close: u8, escaping: Escaping) -> Result<Self> {
        let start = sink.stream_position().map_err(sink_io)?;
        sink.write_all(&[open]).map_err(sink_io)?;
        Ok(Self {
            sink,
            start,
            close,
            escaping,
            count: 0,
        })
    }

    /// Number of elements or sections written
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Append one element followed by a separator
    pub fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        write_json(&mut *self.sink, value, self.escaping).map_err(sink_json)?;
        self.sink.write_all(&[SEPARATOR]).map_err(sink_io)?;
        self.count += 1;
        Ok(())
    }

    /// Drain a fallible record sequence into the container
    ///
    /// Stops at the first error; the container stays open until `finish`.
    pub fn write_all<I, T>(&mut self, records: I) -> Result<u64>
    where
        I: IntoIterator<Item = Result<T>>,
        T: Serialize,
    {
        let before = self.count;
        for record in records {
            self.write(&record?)?;
        }
        Ok(self.count - before)
    }

    /// Write `"name":[...],` where the array is filled by `fill`
    ///
    /// Returns the number of elements written into the section.
    pub fn section<F>(&mut self, name: &str, escaping: Escaping, fill: F) -> Result<u64>
    where
        F: FnOnce(&mut JsonFramer<'_, S>) -> Result<()>,
    {
        write_json(&mut *self.sink, name, Escaping::Standard).map_err(sink_json)?;
        self.sink.write_all(b":").map_err(sink_io)?;

        let mut nested = JsonFramer::array(&mut *self.sink, escaping)?;
        let filled = fill(&mut nested);
        let written = nested.finish()?;

        // The separator goes in even on error so the outer finish stays aligned
        self.sink.write_all(&[SEPARATOR]).map_err(sink_io)?;
        self.count += 1;
        filled?;
        Ok(written)
    }

    /// Close the container, returning the element count
    pub fn finish(self) -> Result<u64> {
        let end = self.sink.stream_position().map_err(sink_io)?;

        // More than the opening delimiter means the last byte is a separator
        let close_at = if end > self.start + 1 { end - 1 } else { end };

        self.sink
            .seek(SeekFrom::Start(close_at))
            .map_err(sink_io)?;
        self.sink.write_all(&[self.close]).map_err(sink_io)?;
        self.sink.truncate(close_at + 1).map_err(sink_io)?;
        self.sink.flush().map_err(sink_io)?;

        Ok(self.count)
    }
}

/// Open an array, let `fill` write elements, then finish it
///
/// The array is closed even when `fill` fails, so the elements written
/// before the error form valid JSON. The error is still returned.
pub fn with_json_array<S, F>(sink: &mut S, escaping: Escaping, fill: F) -> Result<u64>
where
    S: RandomAccessSink + ?Sized,
    F: FnOnce(&mut JsonFramer<'_, S>) -> Result<()>,
{
    let mut framer = JsonFramer::array(sink, escaping)?;
    let filled = fill(&mut framer);
    close_after(filled, framer)
}

/// Open an object, let `fill` write sections, then finish it
pub fn with_json_object<S, F>(sink: &mut S, fill: F) -> Result<u64>
where
    S: RandomAccessSink + ?Sized,
    F: FnOnce(&mut JsonFramer<'_, S>) -> Result<()>,
{
    let mut framer = JsonFramer::object(sink)?;
    let filled = fill(&mut framer);
    close_after(filled, framer)
}

/// Finish the container whether or not filling it succeeded
///
/// A fill error wins over any error from closing.
fn close_after<S>(filled: Result<()>, framer: JsonFramer<'_, S>) -> Result<u64>
where
    S: RandomAccessSink + ?Sized,
{
    match filled {
        Ok(()) => framer.finish(),
        Err(e) => {
            if let Err(close_err) = framer.finish() {
                tracing::warn!(error = %close_err, "Failed to close partial output");
            }
            Err(e)
        }
    }
}

fn sink_io(e: io::Error) -> Error {
    Error::sink_write(e.to_string())
}

fn sink_json(e: serde_json::Error) -> Error {
    Error::sink_write(format!("Failed to serialize element: {e}"))
}
