//! Error types for tabnorm
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for tabnorm
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Dispatch Errors
    // ============================================================================
    #[error("Unsupported type: {message}")]
    UnsupportedType { message: String },

    // ============================================================================
    // Source Errors
    // ============================================================================
    #[error("Failed to read source: {message}")]
    SourceRead { message: String },

    #[error("Row {row} has {found} fields, header has {expected}")]
    SchemaMismatch {
        row: u64,
        expected: usize,
        found: usize,
    },

    // ============================================================================
    // Sink Errors
    // ============================================================================
    #[error("Failed to write output: {message}")]
    SinkWrite { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognized content type or vendor tag
    UnsupportedType,
    /// Malformed input or I/O failure while reading
    SourceRead,
    /// I/O failure while writing, including seek/truncate
    SinkWrite,
    /// A row disagrees with its header
    SchemaMismatch,
    /// Anything else (configuration, CLI glue)
    Other,
}

impl Error {
    /// Create an unsupported content type error
    pub fn unsupported_content_type(content_type: impl AsRef<str>) -> Self {
        let content_type = content_type.as_ref();
        let message = if content_type.is_empty() {
            "content type could not be determined".to_string()
        } else {
            format!("content type '{content_type}'")
        };
        Self::UnsupportedType { message }
    }

    /// Create an unsupported vendor error
    pub fn unsupported_vendor(vendor: impl AsRef<str>) -> Self {
        Self::UnsupportedType {
            message: format!("database vendor '{}'", vendor.as_ref()),
        }
    }

    /// Create a source read error
    pub fn source_read(message: impl Into<String>) -> Self {
        Self::SourceRead {
            message: message.into(),
        }
    }

    /// Create a sink write error
    pub fn sink_write(message: impl Into<String>) -> Self {
        Self::SinkWrite {
            message: message.into(),
        }
    }

    /// Create a schema mismatch error
    pub fn schema_mismatch(row: u64, expected: usize, found: usize) -> Self {
        Self::SchemaMismatch {
            row,
            expected,
            found,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            Error::SourceRead { .. } => ErrorKind::SourceRead,
            Error::SinkWrite { .. } => ErrorKind::SinkWrite,
            Error::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
            _ => ErrorKind::Other,
        }
    }
}

/// Result type alias for tabnorm
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
