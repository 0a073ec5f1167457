//! Format dispatch module
//!
//! Picks a source reader for a content type and drives it into the output
//! framer.
//!
//! # Overview
//!
//! The engine module provides:
//! - `resolve_content_type` - declared type first, then the file extension
//! - `Transformer` - runs one reader/framer pairing per call
//! - `TransformSummary` - what a run produced

mod types;

pub use types::TransformSummary;

use crate::config::TransformConfig;
use crate::decode::{
    copy_document, open_workbook, write_workbook, ColumnarReader, DelimitedReader,
    JsonLinesReader, LoadedWorkbook, RecordReader,
};
use crate::error::{Error, Result};
use crate::output::{with_json_array, RandomAccessSink};
use crate::types::ContentType;
use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, Write};
use std::path::Path;
use std::time::Instant;

/// Resolve the content type for a file
///
/// A non-empty `declared` type wins unconditionally. Otherwise the file
/// extension decides. Anything unrecognized is an error; nothing is guessed.
pub fn resolve_content_type(
    file_name: impl AsRef<Path>,
    declared: Option<&str>,
) -> Result<ContentType> {
    if let Some(declared) = declared.map(str::trim).filter(|d| !d.is_empty()) {
        return match ContentType::from_mime(declared) {
            ContentType::Unknown => Err(Error::unsupported_content_type(declared)),
            content_type => Ok(content_type),
        };
    }

    let file_name = file_name.as_ref();
    match ContentType::from_extension(file_name) {
        ContentType::Unknown => {
            let ext = file_name
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            Err(Error::unsupported_content_type(ext))
        }
        content_type => Ok(content_type),
    }
}

/// An opened input, ready to be read by its reader
enum Source {
    Delimited(File),
    Document(File),
    Lines(File),
    Columnar(File),
    Spreadsheet(LoadedWorkbook),
}

/// Runs transforms with a fixed configuration
///
/// Each call owns its input and output handles; calls share nothing
/// mutable and may run concurrently on different files.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    config: TransformConfig,
}

impl Transformer {
    /// Create a transformer
    pub fn new(config: TransformConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Resolve the content type of `input`, then transform it into `output`
    pub fn transform_path(
        &self,
        input: impl AsRef<Path>,
        declared: Option<&str>,
        output: impl AsRef<Path>,
    ) -> Result<TransformSummary> {
        let input = input.as_ref();
        let content_type = resolve_content_type(input, declared)?;
        self.transform_file(input, content_type, output)
    }

    /// Transform `input` into a freshly created (or truncated) `output` file
    ///
    /// The input is opened first, so a missing or unreadable input leaves
    /// any existing output untouched. An output that resolves to the input
    /// file itself is rejected. On a mid-stream error the partial
    /// output stays on disk.
    pub fn transform_file(
        &self,
        input: impl AsRef<Path>,
        content_type: ContentType,
        output: impl AsRef<Path>,
    ) -> Result<TransformSummary> {
        let (input, output) = (input.as_ref(), output.as_ref());
        let started = Instant::now();

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            content_type = %content_type,
            "Starting transform"
        );

        if same_file(input, output) {
            return Err(Error::config(format!(
                "Output '{}' is the input file; it would be truncated before it is read",
                output.display()
            )));
        }

        let source = self.open_source(input, content_type)?;

        let file = File::create(output).map_err(|e| {
            Error::sink_write(format!(
                "Failed to create output '{}': {e}",
                output.display()
            ))
        })?;
        let mut sink = BufWriter::new(file);

        let records = self.run(source, &mut sink)?;

        sink.flush()
            .map_err(|e| Error::sink_write(e.to_string()))?;
        let bytes_written = sink
            .stream_position()
            .map_err(|e| Error::sink_write(e.to_string()))?;

        let summary = TransformSummary {
            content_type,
            records,
            bytes_written,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        tracing::info!(
            records = ?summary.records,
            bytes = summary.bytes_written,
            elapsed_ms = summary.elapsed_ms,
            "Finished transform"
        );

        Ok(summary)
    }

    /// Transform `input` into any random-access sink
    ///
    /// Returns the record count, or `None` for a verbatim JSON copy.
    pub fn transform_to<S>(
        &self,
        input: impl AsRef<Path>,
        content_type: ContentType,
        sink: &mut S,
    ) -> Result<Option<u64>>
    where
        S: RandomAccessSink + ?Sized,
    {
        let source = self.open_source(input.as_ref(), content_type)?;
        self.run(source, sink)
    }

    fn open_source(&self, path: &Path, content_type: ContentType) -> Result<Source> {
        let open = || {
            File::open(path).map_err(|e| {
                Error::source_read(format!("Failed to open '{}': {e}", path.display()))
            })
        };

        match content_type {
            ContentType::DelimitedText => Ok(Source::Delimited(open()?)),
            ContentType::JsonDocument => Ok(Source::Document(open()?)),
            ContentType::JsonLines => Ok(Source::Lines(open()?)),
            ContentType::ColumnarBinary => Ok(Source::Columnar(open()?)),
            ContentType::Spreadsheet => Ok(Source::Spreadsheet(open_workbook(path)?)),
            ContentType::Unknown => Err(Error::unsupported_content_type("")),
        }
    }

    fn run<S>(&self, source: Source, sink: &mut S) -> Result<Option<u64>>
    where
        S: RandomAccessSink + ?Sized,
    {
        let records = match source {
            Source::Delimited(file) => {
                let reader = DelimitedReader::new(
                    BufReader::new(file),
                    &self.config.csv,
                    self.config.short_rows,
                )?;
                write_records(reader, sink)?
            }
            Source::Document(mut file) => {
                copy_document(&mut file, sink)?;
                return Ok(None);
            }
            Source::Lines(file) => write_records(JsonLinesReader::new(BufReader::new(file)), sink)?,
            Source::Columnar(file) => write_records(ColumnarReader::new(file, &self.config)?, sink)?,
            Source::Spreadsheet(mut workbook) => write_workbook(&mut workbook, sink)?,
        };
        Ok(Some(records))
    }
}

/// Whether two paths name the same existing file
fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Frame every record of `reader` into a top-level array on `sink`
pub fn write_records<R, S>(reader: R, sink: &mut S) -> Result<u64>
where
    R: RecordReader,
    S: RandomAccessSink + ?Sized,
{
    let escaping = reader.escaping();
    with_json_array(sink, escaping, |w| {
        w.write_all(reader)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests;
