// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # tabnorm
//!
//! Streaming normalization of tabular files into JSON, plus connection
//! string resolution for SQL databases.
//!
//! ## Features
//!
//! - **Delimited text**: CSV with a header row, one object per row
//! - **JSON**: copied through verbatim
//! - **JSON lines**: one object per line, framed into an array
//! - **Parquet**: read page by page, native JSON value types
//! - **Spreadsheets**: xls/xlsx workbooks, one array per sheet
//! - **Connection strings**: postgres, mysql, sqlite, oracle, sqlserver, clickhouse
//!
//! Output is written incrementally and framed in place, so neither the
//! input nor the output is ever held in memory whole.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tabnorm::{Transformer, TransformConfig, Result};
//!
//! fn main() -> Result<()> {
//!     let transformer = Transformer::new(TransformConfig::default());
//!     let summary = transformer.transform_path("sales.parquet", None, "sales.json")?;
//!     println!("{} records", summary.records.unwrap_or(0));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Transformer                         │
//! │   resolve_content_type() → ContentType → reader          │
//! └──────────────────────────────────────────────────────────┘
//!                             │
//! ┌──────────┬──────────┬─────┴─────┬──────────┬────────────┐
//! │  CSV     │  JSON    │  JSONL    │ Parquet  │ Spreadsheet│
//! └──────────┴──────────┴─────┬─────┴──────────┴────────────┘
//!                             │ Record
//! ┌───────────────────────────┴──────────────────────────────┐
//! │        JsonFramer over a RandomAccessSink                │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Transform settings
pub mod config;

/// JSON output framing and escaping
pub mod output;

/// Source readers (CSV, JSON, JSON lines, Parquet, spreadsheets)
pub mod decode;

/// Format dispatch
pub mod engine;

/// Database connection string resolution
pub mod database;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{CsvOptions, TransformConfig};
pub use database::{resolve, ConnectionDescriptor, ResolvedConnection, Vendor};
pub use engine::{resolve_content_type, TransformSummary, Transformer};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
