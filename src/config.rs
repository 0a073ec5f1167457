//! Configuration types for transforms
//!
//! A `TransformConfig` is built once at startup (from defaults, a YAML/JSON
//! file, or CLI flags) and handed to every transform. Nothing in the
//! readers consults process-wide state.

use crate::error::{Error, Result};
use crate::types::ShortRowPolicy;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::Path;

/// Rows fetched per columnar page
pub const DEFAULT_PAGE_SIZE: usize = 1000;

// ============================================================================
// Transform Config
// ============================================================================

/// Settings shared by all readers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Rows per columnar page
    pub page_size: usize,

    /// Worker threads used to decode one columnar page
    pub parallelism: usize,

    /// Delimited-text rows that disagree with the header
    pub short_rows: ShortRowPolicy,

    /// Delimited-text options
    pub csv: CsvOptions,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            parallelism: default_parallelism(),
            short_rows: ShortRowPolicy::default(),
            csv: CsvOptions::default(),
        }
    }
}

/// Two workers per available core
pub fn default_parallelism() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get) * 2
}

impl TransformConfig {
    /// Create a config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from YAML (JSON is valid YAML too)
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; `.json` files are parsed as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config '{}': {e}", path.display()))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            let config: Self = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::config("page_size must be greater than zero"));
        }
        if self.parallelism == 0 {
            return Err(Error::config("parallelism must be greater than zero"));
        }
        if !self.csv.delimiter.is_ascii() {
            return Err(Error::config(format!(
                "csv delimiter must be a single ASCII character, got '{}'",
                self.csv.delimiter
            )));
        }
        Ok(())
    }

    /// Set the columnar page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the decode parallelism
    #[must_use]
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Set the short row policy
    #[must_use]
    pub fn with_short_rows(mut self, policy: ShortRowPolicy) -> Self {
        self.short_rows = policy;
        self
    }

    /// Set the delimited-text delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.csv.delimiter = delimiter;
        self
    }
}

// ============================================================================
// CSV Options
// ============================================================================

/// Delimited-text reader options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field delimiter
    pub delimiter: char,

    /// Trim whitespace around fields
    pub trim: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            trim: false,
        }
    }
}

impl CsvOptions {
    /// Delimiter as the single byte the csv crate wants
    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.delimiter as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TransformConfig::default();
        assert_eq!(config.page_size, 1000);
        assert!(config.parallelism >= 2);
        assert_eq!(config.short_rows, ShortRowPolicy::Reject);
        assert_eq!(config.csv.delimiter, ',');
        assert!(!config.csv.trim);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = TransformConfig::from_yaml_str(
            r"
page_size: 250
short_rows: truncate
csv:
  delimiter: ';'
",
        )
        .unwrap();

        assert_eq!(config.page_size, 250);
        assert_eq!(config.short_rows, ShortRowPolicy::Truncate);
        assert_eq!(config.csv.delimiter, ';');
        assert_eq!(config.parallelism, default_parallelism());
    }

    #[test]
    fn test_from_yaml_rejects_zero_page_size() {
        let err = TransformConfig::from_yaml_str("page_size: 0").unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_validate_rejects_non_ascii_delimiter() {
        let config = TransformConfig::new().with_delimiter('§');
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"parallelism": 3, "csv": {{"trim": true}}}}"#).unwrap();

        let config = TransformConfig::from_file(file.path()).unwrap();
        assert_eq!(config.parallelism, 3);
        assert!(config.csv.trim);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_from_missing_file() {
        let err = TransformConfig::from_file("/nonexistent/tabnorm.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_builders() {
        let config = TransformConfig::new()
            .with_page_size(10)
            .with_parallelism(1)
            .with_short_rows(ShortRowPolicy::Truncate)
            .with_delimiter('\t');
        assert_eq!(config.page_size, 10);
        assert_eq!(config.parallelism, 1);
        assert_eq!(config.short_rows, ShortRowPolicy::Truncate);
        assert_eq!(config.csv.delimiter_byte(), b'\t');
    }
}
