//! Common types used throughout tabnorm
//!
//! This module contains shared type definitions and type aliases
//! used across the readers, the output framer and the dispatcher.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// One normalized row: field name to value, in insertion order
pub type Record = serde_json::Map<String, JsonValue>;

// ============================================================================
// Content Type
// ============================================================================

/// MIME string for delimited text
pub const MIME_CSV: &str = "text/csv";
/// MIME string for a JSON document
pub const MIME_JSON: &str = "application/json";
/// MIME string for line-delimited JSON
pub const MIME_JSONL: &str = "application/x-ndjson";
/// MIME string for legacy and modern spreadsheets
pub const MIME_EXCEL: &str = "application/vnd.ms-excel";
/// MIME string for OOXML spreadsheets
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// Tag used for parquet files
pub const MIME_PARQUET: &str = "parquet";

/// Kind of input file, resolved once per transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Comma separated text with a header row
    DelimitedText,
    /// A JSON document, copied verbatim
    JsonDocument,
    /// One JSON value per line
    JsonLines,
    /// Parquet
    ColumnarBinary,
    /// xls / xlsx / ods workbook
    Spreadsheet,
    /// Nothing matched
    Unknown,
}

impl ContentType {
    /// Canonical MIME-style string for this content type
    pub fn mime(self) -> &'static str {
        match self {
            ContentType::DelimitedText => MIME_CSV,
            ContentType::JsonDocument => MIME_JSON,
            ContentType::JsonLines => MIME_JSONL,
            ContentType::ColumnarBinary => MIME_PARQUET,
            ContentType::Spreadsheet => MIME_EXCEL,
            ContentType::Unknown => "",
        }
    }

    /// Map a declared MIME-style string to a content type
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            MIME_CSV => ContentType::DelimitedText,
            MIME_JSON => ContentType::JsonDocument,
            MIME_JSONL | "application/jsonl" | "application/jsonlines" => ContentType::JsonLines,
            MIME_EXCEL | MIME_XLSX => ContentType::Spreadsheet,
            MIME_PARQUET | "application/vnd.apache.parquet" => ContentType::ColumnarBinary,
            _ => ContentType::Unknown,
        }
    }

    /// Infer a content type from a file name's extension
    pub fn from_extension(file_name: impl AsRef<Path>) -> Self {
        let ext = file_name
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("csv") => ContentType::DelimitedText,
            Some("json") => ContentType::JsonDocument,
            Some("jsonl" | "ndjson") => ContentType::JsonLines,
            Some("xls" | "xlsx") => ContentType::Spreadsheet,
            Some("parquet") => ContentType::ColumnarBinary,
            _ => ContentType::Unknown,
        }
    }

    /// Whether a reader exists for this content type
    pub fn is_supported(self) -> bool {
        self != ContentType::Unknown
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Unknown => write!(f, "unknown"),
            other => write!(f, "{}", other.mime()),
        }
    }
}

// ============================================================================
// Short Row Policy
// ============================================================================

/// What to do with a delimited-text row whose field count differs from the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortRowPolicy {
    /// Fail with a schema mismatch error
    #[default]
    Reject,
    /// Keep only the fields present, ignore extras
    Truncate,
}
