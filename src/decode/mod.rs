//! Source reader module
//!
//! Supports: CSV, JSON (pass-through), JSON Lines, Parquet, spreadsheets
//!
//! # Overview
//!
//! Each reader turns one input into a lazy, non-restartable sequence of
//! records. Records are handed to the output framer as they are produced;
//! no reader holds the whole output in memory. The JSON document reader is
//! the exception to the record model: it copies bytes straight through.

mod arrow_value;
mod columnar;
mod delimited;
mod document;
mod lines;
mod spreadsheet;
mod types;

pub use arrow_value::{array_value_to_json, batch_to_records, row_to_record};
pub use columnar::{ColumnarReader, ParquetInput};
pub use delimited::DelimitedReader;
pub use document::copy_document;
pub use lines::JsonLinesReader;
pub use spreadsheet::{
    open_workbook, write_workbook, LoadedWorkbook, MemoryWorkbook, SheetRecords, SheetRows, Workbook,
};
pub use types::RecordReader;
