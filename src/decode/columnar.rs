//! Paginated Parquet reader
//!
//! File metadata is read once up front. Rows are then fetched one page at
//! a time: skip to the running offset, read up to `page_size` rows, emit
//! them, advance the offset. A short page marks the end of the data.

use super::arrow_value::batch_to_records;
use super::types::RecordReader;
use crate::config::TransformConfig;
use crate::error::{Error, Result};
use crate::types::Record;
use bytes::Bytes;
use parquet::arrow::arrow_reader::{
    ArrowReaderMetadata, ArrowReaderOptions, ParquetRecordBatchReaderBuilder,
};
use parquet::file::reader::ChunkReader;
use std::fs::File;
use std::io;

/// A Parquet source that can hand out an independent handle per page
pub trait ParquetInput: ChunkReader + Sized + 'static {
    /// Another handle onto the same bytes
    fn duplicate(&self) -> io::Result<Self>;
}

impl ParquetInput for File {
    fn duplicate(&self) -> io::Result<Self> {
        self.try_clone()
    }
}

impl ParquetInput for Bytes {
    fn duplicate(&self) -> io::Result<Self> {
        Ok(self.clone())
    }
}

/// Reads Parquet rows page by page
pub struct ColumnarReader<T: ParquetInput> {
    input: T,
    metadata: ArrowReaderMetadata,
    page_size: usize,
    parallelism: usize,
    offset: usize,
    pages_read: u64,
    pending: std::vec::IntoIter<Result<Record>>,
    exhausted: bool,
}

impl<T: ParquetInput> ColumnarReader<T> {
    /// Load file metadata and prepare the first page
    pub fn new(input: T, config: &TransformConfig) -> Result<Self> {
        if config.page_size == 0 {
            return Err(Error::config("page_size must be greater than zero"));
        }

        let metadata = ArrowReaderMetadata::load(&input, ArrowReaderOptions::new())
            .map_err(|e| Error::source_read(format!("Failed to read Parquet metadata: {e}")))?;

        tracing::debug!(
            rows = metadata.metadata().file_metadata().num_rows(),
            columns = metadata.schema().fields().len(),
            page_size = config.page_size,
            "Opened Parquet source"
        );

        Ok(Self {
            input,
            metadata,
            page_size: config.page_size,
            parallelism: config.parallelism.max(1),
            offset: 0,
            pages_read: 0,
            pending: Vec::new().into_iter(),
            exhausted: false,
        })
    }

    /// Row count declared in the file footer
    pub fn total_rows(&self) -> u64 {
        u64::try_from(self.metadata.metadata().file_metadata().num_rows()).unwrap_or(0)
    }

    /// Field names, in schema order
    pub fn columns(&self) -> Vec<String> {
        self.metadata
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Pages fetched so far
    pub fn pages_read(&self) -> u64 {
        self.pages_read
    }

    fn fetch_page(&mut self) -> Result<Vec<Result<Record>>> {
        let handle = self
            .input
            .duplicate()
            .map_err(|e| Error::source_read(format!("Failed to reopen Parquet source: {e}")))?;

        let reader = ParquetRecordBatchReaderBuilder::new_with_metadata(handle, self.metadata.clone())
            .with_offset(self.offset)
            .with_limit(self.page_size)
            .with_batch_size(self.page_size)
            .build()
            .map_err(|e| Error::source_read(format!("Failed to open Parquet page: {e}")))?;

        let mut records = Vec::with_capacity(self.page_size);
        let mut rows = 0;
        for batch in reader {
            let batch = batch
                .map_err(|e| Error::source_read(format!("Failed to decode Parquet page: {e}")))?;
            rows += batch.num_rows();
            records.extend(batch_to_records(&batch, self.parallelism));
        }

        tracing::debug!(offset = self.offset, rows, "Fetched Parquet page");

        self.pages_read += 1;
        self.offset += self.page_size;
        if rows < self.page_size {
            self.exhausted = true;
        }

        Ok(records)
    }
}

impl<T: ParquetInput> Iterator for ColumnarReader<T> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.next() {
                if record.is_err() {
                    self.exhausted = true;
                    self.pending = Vec::new().into_iter();
                }
                return Some(record);
            }

            if self.exhausted {
                return None;
            }

            match self.fetch_page() {
                Ok(records) => self.pending = records.into_iter(),
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<T: ParquetInput> RecordReader for ColumnarReader<T> {}
