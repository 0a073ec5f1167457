//! Tests for output module

use super::*;
use crate::error::{Error, ErrorKind, Result};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::{Cursor, Seek, SeekFrom, Write};

fn output(cursor: Cursor<Vec<u8>>) -> String {
    String::from_utf8(cursor.into_inner()).unwrap()
}

// ============================================================================
// Escaping Tests
// ============================================================================

#[test]
fn test_ascii_escaping_bmp() {
    let s = to_json_string("café", Escaping::Ascii).unwrap();
    assert_eq!(s, r#""caf\u00e9""#);
}

#[test]
fn test_ascii_escaping_surrogate_pair() {
    let s = to_json_string("a😀b", Escaping::Ascii).unwrap();
    assert_eq!(s, r#""a\ud83d\ude00b""#);

    // Still parses back to the original text
    let back: String = serde_json::from_str(&s).unwrap();
    assert_eq!(back, "a😀b");
}

#[test]
fn test_ascii_escaping_keeps_standard_escapes() {
    let s = to_json_string("say \"hi\"\n", Escaping::Ascii).unwrap();
    assert_eq!(s, r#""say \"hi\"\n""#);
}

#[test]
fn test_standard_escaping_passes_utf8() {
    let s = to_json_string("日本", Escaping::Standard).unwrap();
    assert_eq!(s, "\"日本\"");
}

#[test]
fn test_ascii_escaping_object_is_ascii_only() {
    let value = json!({"名前": "Zoë", "n": 1});
    let s = to_json_string(&value, Escaping::Ascii).unwrap();
    assert!(s.is_ascii());
    let back: Value = serde_json::from_str(&s).unwrap();
    assert_eq!(back, value);
}

// ============================================================================
// Framer Tests
// ============================================================================

#[test]
fn test_empty_array() {
    let mut sink = Cursor::new(Vec::new());
    let count = with_json_array(&mut sink, Escaping::Standard, |_| Ok(())).unwrap();
    assert_eq!(count, 0);
    assert_eq!(output(sink), "[]");
}

#[test]
fn test_single_element_array() {
    let mut sink = Cursor::new(Vec::new());
    with_json_array(&mut sink, Escaping::Standard, |w| w.write(&json!({"a": 1}))).unwrap();
    assert_eq!(output(sink), r#"[{"a":1}]"#);
}

#[test]
fn test_many_elements_array() {
    let mut sink = Cursor::new(Vec::new());
    let count = with_json_array(&mut sink, Escaping::Standard, |w| {
        for i in 0..5 {
            w.write(&json!({ "i": i }))?;
        }
        Ok(())
    })
    .unwrap();

    assert_eq!(count, 5);
    let text = output(sink);
    assert!(!text.contains(",]"));
    let parsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 5);
    assert_eq!(parsed[4]["i"], 4);
}

#[test]
fn test_write_all_stops_on_first_error() {
    let mut sink = Cursor::new(Vec::new());
    let records: Vec<Result<Value>> = vec![
        Ok(json!(1)),
        Err(Error::source_read("boom")),
        Ok(json!(3)),
    ];

    let mut framer = JsonFramer::array(&mut sink, Escaping::Standard).unwrap();
    let err = framer.write_all(records).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SourceRead);
    assert_eq!(framer.count(), 1);
}

#[test]
fn test_array_closed_after_fill_error() {
    let mut sink = Cursor::new(Vec::new());
    let records: Vec<Result<Value>> = vec![
        Ok(json!({"a": 1})),
        Ok(json!({"a": 2})),
        Err(Error::schema_mismatch(4, 2, 1)),
    ];

    let err = with_json_array(&mut sink, Escaping::Standard, |w| {
        w.write_all(records)?;
        Ok(())
    })
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
    assert_eq!(output(sink), r#"[{"a":1},{"a":2}]"#);
}

#[test]
fn test_framer_truncates_stale_bytes() {
    // A reused buffer with leftover content past the new end
    let mut sink = Cursor::new(b"XXXXXXXXXXXXXXXXXXXXXXXX".to_vec());
    with_json_array(&mut sink, Escaping::Standard, |w| w.write(&json!(7))).unwrap();
    assert_eq!(output(sink), "[7]");
}

#[test]
fn test_framer_at_nonzero_offset() {
    let mut sink = Cursor::new(Vec::new());
    sink.write_all(b"prefix:").unwrap();
    with_json_array(&mut sink, Escaping::Standard, |_| Ok(())).unwrap();
    assert_eq!(output(sink), "prefix:[]");
}

// ============================================================================
// Object Mode Tests
// ============================================================================

#[test]
fn test_empty_object() {
    let mut sink = Cursor::new(Vec::new());
    let count = with_json_object(&mut sink, |_| Ok(())).unwrap();
    assert_eq!(count, 0);
    assert_eq!(output(sink), "{}");
}

#[test]
fn test_object_sections() {
    let mut sink = Cursor::new(Vec::new());
    let count = with_json_object(&mut sink, |obj| {
        obj.section("S1", Escaping::Standard, |w| w.write(&json!({"a": "1"})))?;
        obj.section("S2", Escaping::Standard, |w| w.write(&json!({"a": "2"})))?;
        Ok(())
    })
    .unwrap();

    assert_eq!(count, 2);
    assert_eq!(output(sink), r#"{"S1":[{"a":"1"}],"S2":[{"a":"2"}]}"#);
}

#[test]
fn test_object_with_empty_section() {
    let mut sink = Cursor::new(Vec::new());
    with_json_object(&mut sink, |obj| {
        obj.section("empty", Escaping::Standard, |_| Ok(()))?;
        obj.section("full", Escaping::Standard, |w| w.write(&json!(1)))?;
        Ok(())
    })
    .unwrap();

    assert_eq!(output(sink), r#"{"empty":[],"full":[1]}"#);
}

#[test]
fn test_object_closed_after_section_error() {
    let mut sink = Cursor::new(Vec::new());
    let err = with_json_object(&mut sink, |obj| {
        obj.section("ok", Escaping::Standard, |w| w.write(&json!(1)))?;
        obj.section("bad", Escaping::Standard, |w| {
            w.write(&json!(2))?;
            Err(Error::source_read("sheet unreadable"))
        })?;
        obj.section("never", Escaping::Standard, |w| w.write(&json!(3)))?;
        Ok(())
    })
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SourceRead);
    assert_eq!(output(sink), r#"{"ok":[1],"bad":[2]}"#);
}

#[test]
fn test_section_name_quotes_escaped() {
    let mut sink = Cursor::new(Vec::new());
    with_json_object(&mut sink, |obj| {
        obj.section(r#"my "sheet""#, Escaping::Standard, |_| Ok(()))?;
        Ok(())
    })
    .unwrap();

    let parsed: Value = serde_json::from_str(&output(sink)).unwrap();
    assert_eq!(parsed, json!({"my \"sheet\"": []}));
}

// ============================================================================
// Sink Tests
// ============================================================================

#[test]
fn test_cursor_truncate_clamps_position() {
    let mut sink = Cursor::new(b"abcdef".to_vec());
    sink.seek(SeekFrom::End(0)).unwrap();
    sink.truncate(3).unwrap();
    assert_eq!(sink.position(), 3);
    assert_eq!(sink.get_ref(), b"abc");
}

#[test]
fn test_buffered_sink_flushes_on_finish() {
    let mut sink = BufferedSink::new(Vec::new());
    with_json_array(&mut sink, Escaping::Standard, |w| {
        w.write(&json!("x"))?;
        w.write(&json!("y"))
    })
    .unwrap();

    assert_eq!(sink.buffered_len(), 9);
    let inner = sink.finish().unwrap();
    assert_eq!(String::from_utf8(inner).unwrap(), r#"["x","y"]"#);
}

#[test]
fn test_file_sink() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let mut file = std::io::BufWriter::new(std::fs::File::create(&path).unwrap());

    with_json_array(&mut file, Escaping::Standard, |w| {
        w.write(&json!({"k": "v"}))?;
        w.write(&json!({"k": "w"}))
    })
    .unwrap();
    drop(file);

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, r#"[{"k":"v"},{"k":"w"}]"#);
}
