//! Tests for engine module

use super::*;
use crate::error::ErrorKind;
use crate::types::ShortRowPolicy;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::io::Cursor;
use tempfile::TempDir;
use test_case::test_case;

fn write_input(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================================
// Content Type Resolution Tests
// ============================================================================

#[test_case("data.csv", None, ContentType::DelimitedText ; "csv extension")]
#[test_case("data.JSON", None, ContentType::JsonDocument ; "upper case json")]
#[test_case("data.xlsx", None, ContentType::Spreadsheet ; "xlsx extension")]
#[test_case("data.parquet", None, ContentType::ColumnarBinary ; "parquet extension")]
#[test_case("data.jsonl", None, ContentType::JsonLines ; "jsonl extension")]
#[test_case("data.csv", Some("parquet"), ContentType::ColumnarBinary ; "declared wins")]
#[test_case("data", Some("text/csv"), ContentType::DelimitedText ; "declared without extension")]
#[test_case("data.csv", Some("  "), ContentType::DelimitedText ; "blank declared ignored")]
fn test_resolve_content_type(name: &str, declared: Option<&str>, expected: ContentType) {
    assert_eq!(resolve_content_type(name, declared).unwrap(), expected);
}

#[test]
fn test_resolve_unknown_extension() {
    let err = resolve_content_type("notes.txt", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    assert!(err.to_string().contains(".txt"));
}

#[test]
fn test_resolve_no_extension() {
    let err = resolve_content_type("README", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
}

#[test]
fn test_resolve_unknown_declared_does_not_fall_back() {
    let err = resolve_content_type("data.csv", Some("text/plain")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
    assert!(err.to_string().contains("text/plain"));
}

// ============================================================================
// Transform Tests
// ============================================================================

#[test]
fn test_transform_csv() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.csv", "name,city\nAna,Zürich\nBo,Oslo\n");
    let output = dir.path().join("out.json");

    let summary = Transformer::default()
        .transform_file(&input, ContentType::DelimitedText, &output)
        .unwrap();

    assert_eq!(summary.content_type, ContentType::DelimitedText);
    assert_eq!(summary.records, Some(2));
    assert_eq!(summary.bytes_written, fs::metadata(&output).unwrap().len());

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.is_ascii());
    assert!(text.contains(r"Z\u00fcrich"));
    assert_eq!(
        read_json(&output),
        json!([{"name": "Ana", "city": "Zürich"}, {"name": "Bo", "city": "Oslo"}])
    );
}

#[test]
fn test_transform_csv_header_only() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.csv", "a,b\n");
    let output = dir.path().join("out.json");

    let summary = Transformer::default()
        .transform_file(&input, ContentType::DelimitedText, &output)
        .unwrap();

    assert_eq!(summary.records, Some(0));
    assert_eq!(fs::read_to_string(&output).unwrap(), "[]");
}

#[test]
fn test_transform_csv_short_row_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.csv", "a,b\n1,2\n3\n");
    let output = dir.path().join("out.json");

    let err = Transformer::default()
        .transform_file(&input, ContentType::DelimitedText, &output)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);

    // Rows before the bad one are kept in a closed array
    assert_eq!(read_json(&output), json!([{"a": "1", "b": "2"}]));
}

#[test]
fn test_transform_csv_short_row_truncated() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.csv", "a,b\n1,2\n3\n");
    let output = dir.path().join("out.json");

    let config = TransformConfig::default().with_short_rows(ShortRowPolicy::Truncate);
    Transformer::new(config)
        .transform_file(&input, ContentType::DelimitedText, &output)
        .unwrap();

    assert_eq!(read_json(&output), json!([{"a": "1", "b": "2"}, {"a": "3"}]));
}

#[test]
fn test_transform_json_is_verbatim() {
    let dir = TempDir::new().unwrap();
    let body = "{ \"keep\" :  [1, 2],\n  \"spacing\": true }\n";
    let input = write_input(&dir, "in.json", body);
    let output = dir.path().join("out.json");

    let summary = Transformer::default()
        .transform_file(&input, ContentType::JsonDocument, &output)
        .unwrap();

    assert_eq!(summary.records, None);
    assert_eq!(summary.bytes_written, body.len() as u64);
    assert_eq!(fs::read_to_string(&output).unwrap(), body);
}

#[test]
fn test_transform_jsonl() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.jsonl", "{\"a\":1}\n\n{\"a\":2}\n");
    let output = dir.path().join("out.json");

    let summary = Transformer::default()
        .transform_path(&input, None, &output)
        .unwrap();

    assert_eq!(summary.content_type, ContentType::JsonLines);
    assert_eq!(summary.records, Some(2));
    assert_eq!(read_json(&output), json!([{"a": 1}, {"a": 2}]));
}

#[test]
fn test_transform_truncates_existing_output() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.csv", "a\n1\n");
    let output = write_input(&dir, "out.json", &"x".repeat(256));

    Transformer::default()
        .transform_file(&input, ContentType::DelimitedText, &output)
        .unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap(), r#"[{"a":"1"}]"#);
}

#[test]
fn test_missing_input_leaves_output_untouched() {
    let dir = TempDir::new().unwrap();
    let output = write_input(&dir, "out.json", "previous");

    let err = Transformer::default()
        .transform_file(dir.path().join("missing.csv"), ContentType::DelimitedText, &output)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SourceRead);
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
}

#[test]
fn test_unknown_content_type_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.csv", "a\n1\n");

    let err = Transformer::default()
        .transform_file(&input, ContentType::Unknown, dir.path().join("out.json"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedType);
}

#[test]
fn test_transform_to_memory_sink() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.csv", "k\nv\n");
    let mut sink = Cursor::new(Vec::new());

    let records = Transformer::default()
        .transform_to(&input, ContentType::DelimitedText, &mut sink)
        .unwrap();

    assert_eq!(records, Some(1));
    assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), r#"[{"k":"v"}]"#);
}

#[test]
fn test_write_records_uses_reader_escaping() {
    let reader = DelimitedReader::new(
        "h\né\n".as_bytes(),
        &crate::config::CsvOptions::default(),
        ShortRowPolicy::Reject,
    )
    .unwrap();
    let mut sink = Cursor::new(Vec::new());

    let count = write_records(reader, &mut sink).unwrap();

    assert_eq!(count, 1);
    assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), r#"[{"h":"\u00e9"}]"#);
}

#[test]
fn test_output_same_as_input_rejected() {
    let dir = TempDir::new().unwrap();
    let body = "[{\"keep\": true}]";
    let input = write_input(&dir, "a.json", body);

    // A different spelling of the same path
    let output = dir.path().join(".").join("a.json");

    let err = Transformer::default()
        .transform_path(&input, None, &output)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Other);
    assert!(err.to_string().contains("is the input file"));
    assert_eq!(fs::read_to_string(&input).unwrap(), body);
}

#[test]
fn test_output_same_as_csv_input_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "rows.csv", "a\n1\n");

    assert!(Transformer::default()
        .transform_file(&input, ContentType::DelimitedText, &input)
        .is_err());
    assert_eq!(fs::read_to_string(&input).unwrap(), "a\n1\n");
}
