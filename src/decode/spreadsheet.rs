//! Spreadsheet reader
//!
//! Each sheet's first row is its header. A workbook with one sheet becomes
//! a plain array of records; with several sheets it becomes an object
//! keyed by sheet name, one array per sheet.
//!
//! Cells are rendered as strings. Trailing empty cells of a row are
//! dropped, and date cells come out as `YYYY-MM-DD` (or
//! `YYYY-MM-DD HH:MM:SS` when they carry a time of day) rather than in the
//! workbook's display format.

use super::types::RecordReader;
use crate::error::{Error, Result};
use crate::output::{with_json_array, with_json_object, Escaping, RandomAccessSink};
use crate::types::{JsonValue, Record};
use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Sheet rows with every cell rendered as a string
pub type SheetRows = Vec<Vec<String>>;

/// Source of named sheets
pub trait Workbook {
    /// Sheet names in workbook order
    fn sheet_list(&self) -> Vec<String>;

    /// All rows of one sheet, header first
    fn sheet_rows(&mut self, sheet: &str) -> Result<SheetRows>;
}

impl<RS: Read + Seek> Workbook for Sheets<RS> {
    fn sheet_list(&self) -> Vec<String> {
        self.sheet_names()
    }

    fn sheet_rows(&mut self, sheet: &str) -> Result<SheetRows> {
        let range = self
            .worksheet_range(sheet)
            .map_err(|e| Error::source_read(format!("Failed to read sheet '{sheet}': {e}")))?;

        Ok(range
            .rows()
            .map(|row| {
                let used = row
                    .iter()
                    .rposition(|cell| !matches!(cell, Data::Empty))
                    .map_or(0, |last| last + 1);
                row[..used].iter().map(cell_to_string).collect()
            })
            .collect())
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().map_or_else(
            || cell.to_string(),
            |dt| {
                let text = dt.to_string();
                match text.strip_suffix(" 00:00:00") {
                    Some(date) => date.to_string(),
                    None => text,
                }
            },
        ),
        other => other.to_string(),
    }
}

/// Workbook loaded fully into memory
pub type LoadedWorkbook = Sheets<Cursor<Vec<u8>>>;

/// Open an xls/xlsx/xlsb/ods file
///
/// The format is detected from the file's content, not its name, so a
/// workbook stored under any extension opens.
pub fn open_workbook(path: impl AsRef<Path>) -> Result<LoadedWorkbook> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| Error::source_read(format!("Failed to open '{}': {e}", path.display())))?;

    open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| {
        Error::source_read(format!(
            "Failed to open workbook '{}': {e}",
            path.display()
        ))
    })
}

/// Workbook held in memory, for callers that already have the cells
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, SheetRows)>,
}

impl MemoryWorkbook {
    /// Create an empty workbook
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet
    #[must_use]
    pub fn with_sheet<C: Into<String>>(
        mut self,
        name: impl Into<String>,
        rows: Vec<Vec<C>>,
    ) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        self.sheets.push((name.into(), rows));
        self
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_list(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn sheet_rows(&mut self, sheet: &str) -> Result<SheetRows> {
        self.sheets
            .iter()
            .find(|(name, _)| name == sheet)
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| Error::source_read(format!("Sheet '{sheet}' not found")))
    }
}

// ============================================================================
// Sheet records
// ============================================================================

/// Records of one sheet, keyed by header position
pub struct SheetRecords {
    header: Vec<String>,
    rows: std::vec::IntoIter<Vec<String>>,
}

impl SheetRecords {
    /// Split off the header row; an empty sheet yields nothing
    pub fn new(rows: SheetRows) -> Self {
        let mut rows = rows.into_iter();
        let header = rows.next().unwrap_or_default();
        Self { header, rows }
    }
}

impl Iterator for SheetRecords {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;

        // Cells past the last header column have no name and are dropped
        let mut record = Record::new();
        for (name, cell) in self.header.iter().zip(row) {
            record.insert(name.clone(), JsonValue::String(cell));
        }
        Some(Ok(record))
    }
}

impl RecordReader for SheetRecords {}

/// Write a whole workbook to `sink`, returning the total record count
pub fn write_workbook<W, S>(workbook: &mut W, sink: &mut S) -> Result<u64>
where
    W: Workbook + ?Sized,
    S: RandomAccessSink + ?Sized,
{
    let sheets = workbook.sheet_list();

    // Single sheet files are flattened into just the array
    if let [only] = sheets.as_slice() {
        let rows = workbook.sheet_rows(only)?;
        tracing::debug!(sheet = %only, rows = rows.len(), "Writing single sheet");
        return with_json_array(sink, Escaping::Standard, |w| {
            w.write_all(SheetRecords::new(rows))?;
            Ok(())
        });
    }

    let mut total = 0;
    with_json_object(sink, |obj| {
        for name in &sheets {
            let rows = workbook.sheet_rows(name)?;
            tracing::debug!(sheet = %name, rows = rows.len(), "Writing sheet");
            total += obj.section(name, Escaping::Standard, |w| {
                w.write_all(SheetRecords::new(rows))?;
                Ok(())
            })?;
        }
        Ok(())
    })?;

    Ok(total)
}
