//! Engine types
//!
//! Result types for transform runs.

use crate::types::ContentType;
use serde::Serialize;

/// Outcome of one transform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformSummary {
    /// Content type that selected the reader
    pub content_type: ContentType,
    /// Records written; `None` for a verbatim copy
    pub records: Option<u64>,
    /// Size of the output
    pub bytes_written: u64,
    /// Wall time of the run
    pub elapsed_ms: u64,
}
