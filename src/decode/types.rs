//! Reader types and traits
//!
//! Defines the core source reader abstraction.

use crate::error::Result;
use crate::output::Escaping;
use crate::types::Record;

/// A finite, non-restartable sequence of records read from one source
///
/// Readers yield `Err` at most once; after an error the sequence ends.
pub trait RecordReader: Iterator<Item = Result<Record>> {
    /// Escaping the framer should apply to this reader's string values
    fn escaping(&self) -> Escaping {
        Escaping::Standard
    }
}
