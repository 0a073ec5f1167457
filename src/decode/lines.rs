//! JSON Lines reader
//!
//! One JSON object per line; blank lines are skipped.

use super::types::RecordReader;
use crate::error::{Error, Result};
use crate::types::{JsonValue, Record};
use std::io::{BufRead, Lines};

/// Reads newline-delimited JSON objects
pub struct JsonLinesReader<R: BufRead> {
    lines: Lines<R>,
    line_num: u64,
    done: bool,
}

impl<R: BufRead> JsonLinesReader<R> {
    /// Create a reader over buffered input
    pub fn new(input: R) -> Self {
        Self {
            lines: input.lines(),
            line_num: 0,
            done: false,
        }
    }

    fn parse(&self, line: &str) -> Result<Record> {
        let value: JsonValue = serde_json::from_str(line).map_err(|e| {
            Error::source_read(format!(
                "Failed to parse JSONL at line {}: {e}",
                self.line_num
            ))
        })?;

        match value {
            JsonValue::Object(record) => Ok(record),
            other => Err(Error::source_read(format!(
                "Expected a JSON object at line {}, found {}",
                self.line_num,
                json_type_name(&other)
            ))),
        }
    }
}

impl<R: BufRead> Iterator for JsonLinesReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(Error::source_read(format!(
                        "Failed to read line {}: {e}",
                        self.line_num + 1
                    ))));
                }
            };
            self.line_num += 1;

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let record = self.parse(line);
            if record.is_err() {
                self.done = true;
            }
            return Some(record);
        }
    }
}

impl<R: BufRead> RecordReader for JsonLinesReader<R> {}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
