//! Output module
//!
//! Streams normalized records into a JSON container on disk.
//!
//! # Overview
//!
//! This module provides:
//! - `RandomAccessSink` - the seek-and-truncate capability the framer needs
//! - `BufferedSink` - adapter for append-only destinations
//! - `JsonFramer` - incremental array/object writer that never buffers elements
//! - ASCII-only escaping used for delimited-text values

mod escape;
mod framer;
mod sink;

pub use escape::{to_json_string, write_json, AsciiFormatter, Escaping};
pub use framer::{with_json_array, with_json_object, JsonFramer};
pub use sink::{BufferedSink, RandomAccessSink};

#[cfg(test)]
mod tests;
