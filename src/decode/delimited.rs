//! Delimited-text reader
//!
//! The first row names the fields; every later row is zipped against it.

use super::types::RecordReader;
use crate::config::CsvOptions;
use crate::error::{Error, Result};
use crate::output::Escaping;
use crate::types::{JsonValue, Record, ShortRowPolicy};
use csv::{StringRecord, Trim};
use std::io::Read;

/// Reads CSV rows as string-valued records
pub struct DelimitedReader<R: Read> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    policy: ShortRowPolicy,
    row: StringRecord,
    rows_read: u64,
    done: bool,
}

impl<R: Read> DelimitedReader<R> {
    /// Read the header row and prepare for data rows
    ///
    /// An empty input has no header and yields no records.
    pub fn new(input: R, options: &CsvOptions, policy: ShortRowPolicy) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter_byte())
            .has_headers(true)
            .flexible(true)
            .trim(if options.trim { Trim::All } else { Trim::None })
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|e| Error::source_read(format!("Failed to read CSV header: {e}")))?
            .iter()
            .map(String::from)
            .collect();

        Ok(Self {
            reader,
            headers,
            policy,
            row: StringRecord::new(),
            rows_read: 0,
            done: false,
        })
    }

    /// Field names from the header row
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn build_record(&self) -> Result<Record> {
        if self.row.len() != self.headers.len() && self.policy == ShortRowPolicy::Reject {
            let line = self
                .row
                .position()
                .map_or(self.rows_read + 1, csv::Position::line);
            return Err(Error::schema_mismatch(
                line,
                self.headers.len(),
                self.row.len(),
            ));
        }

        // zip stops at the shorter side: missing fields are omitted, extras dropped
        let mut record = Record::new();
        for (name, value) in self.headers.iter().zip(self.row.iter()) {
            record.insert(name.clone(), JsonValue::String(value.to_string()));
        }
        Ok(record)
    }
}

impl<R: Read> Iterator for DelimitedReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.read_record(&mut self.row) {
            Ok(true) => {
                self.rows_read += 1;
                let record = self.build_record();
                if record.is_err() {
                    self.done = true;
                }
                Some(record)
            }
            Ok(false) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(Error::source_read(format!("Failed to parse CSV: {e}"))))
            }
        }
    }
}

impl<R: Read> RecordReader for DelimitedReader<R> {
    fn escaping(&self) -> Escaping {
        Escaping::Ascii
    }
}
