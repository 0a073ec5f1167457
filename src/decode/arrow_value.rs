//! Arrow to JSON conversion
//!
//! Turns rows of an Arrow `RecordBatch` into records whose values keep
//! their native JSON types. Types without a natural JSON form (dates,
//! timestamps, decimals, binary) are rendered with Arrow's display
//! formatter.

use crate::error::{Error, Result};
use crate::types::{JsonValue, Record};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type, UInt32Type, UInt64Type,
    UInt8Type,
};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use serde_json::Number;

/// Below this many rows per worker a page is decoded on the calling thread
const MIN_ROWS_PER_WORKER: usize = 256;

/// Convert every row of `batch`, splitting the work across up to `parallelism` threads
///
/// Results come back in row order. Each element is the outcome for one row,
/// so a caller that stops at the first `Err` observes exactly what a
/// sequential decode would.
pub fn batch_to_records(batch: &RecordBatch, parallelism: usize) -> Vec<Result<Record>> {
    let rows = batch.num_rows();
    let workers = parallelism.min(rows / MIN_ROWS_PER_WORKER).max(1);

    if workers == 1 {
        return (0..rows).map(|row| row_to_record(batch, row)).collect();
    }

    let chunk = rows.div_ceil(workers);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..rows)
            .step_by(chunk)
            .map(|start| {
                let end = (start + chunk).min(rows);
                scope.spawn(move || {
                    (start..end)
                        .map(|row| row_to_record(batch, row))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    vec![Err(Error::source_read("Parquet decode worker panicked"))]
                })
            })
            .collect()
    })
}

/// Convert one row of a batch into a record keyed by column name
pub fn row_to_record(batch: &RecordBatch, row: usize) -> Result<Record> {
    let schema = batch.schema();
    let mut record = Record::new();

    for (field, column) in schema.fields().iter().zip(batch.columns()) {
        let value = array_value_to_json(column.as_ref(), row)?;
        record.insert(field.name().clone(), value);
    }

    Ok(record)
}

/// Convert a single array element to JSON
pub fn array_value_to_json(array: &dyn Array, row: usize) -> Result<JsonValue> {
    if array.is_null(row) {
        return Ok(JsonValue::Null);
    }

    let value = match array.data_type() {
        DataType::Null => JsonValue::Null,
        DataType::Boolean => JsonValue::Bool(array.as_boolean().value(row)),

        DataType::Int8 => array.as_primitive::<Int8Type>().value(row).into(),
        DataType::Int16 => array.as_primitive::<Int16Type>().value(row).into(),
        DataType::Int32 => array.as_primitive::<Int32Type>().value(row).into(),
        DataType::Int64 => array.as_primitive::<Int64Type>().value(row).into(),
        DataType::UInt8 => array.as_primitive::<UInt8Type>().value(row).into(),
        DataType::UInt16 => array.as_primitive::<UInt16Type>().value(row).into(),
        DataType::UInt32 => array.as_primitive::<UInt32Type>().value(row).into(),
        DataType::UInt64 => array.as_primitive::<UInt64Type>().value(row).into(),

        DataType::Float32 => {
            let arr = array.as_primitive::<arrow::datatypes::Float32Type>();
            float_to_json(f64::from(arr.value(row)))
        }
        DataType::Float64 => {
            let arr = array.as_primitive::<arrow::datatypes::Float64Type>();
            float_to_json(arr.value(row))
        }

        DataType::Utf8 => JsonValue::String(array.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => JsonValue::String(array.as_string::<i64>().value(row).to_string()),
        DataType::Utf8View => JsonValue::String(array.as_string_view().value(row).to_string()),

        DataType::List(_) => list_to_json(array.as_list::<i32>().value(row).as_ref())?,
        DataType::LargeList(_) => list_to_json(array.as_list::<i64>().value(row).as_ref())?,

        DataType::Struct(_) => {
            let arr = array.as_struct();
            let mut obj = Record::new();
            for (field, column) in arr.fields().iter().zip(arr.columns()) {
                obj.insert(
                    field.name().clone(),
                    array_value_to_json(column.as_ref(), row)?,
                );
            }
            JsonValue::Object(obj)
        }

        _ => JsonValue::String(display_value(array, row)?),
    };

    Ok(value)
}

fn list_to_json(values: &dyn Array) -> Result<JsonValue> {
    let items = (0..values.len())
        .map(|i| array_value_to_json(values, i))
        .collect::<Result<Vec<_>>>()?;
    Ok(JsonValue::Array(items))
}

/// NaN and infinities have no JSON form
fn float_to_json(value: f64) -> JsonValue {
    Number::from_f64(value).map_or(JsonValue::Null, JsonValue::Number)
}

fn display_value(array: &dyn Array, row: usize) -> Result<String> {
    let formatter = ArrayFormatter::try_new(array, &FormatOptions::default()).map_err(|e| {
        Error::source_read(format!(
            "Cannot render {} value as JSON: {e}",
            array.data_type()
        ))
    })?;
    Ok(formatter.value(row).to_string())
}
