//! ASCII-only JSON string escaping
//!
//! Delimited-text values are written with every non-ASCII code point as a
//! `\uXXXX` escape. Code points outside the BMP become a UTF-16 surrogate
//! pair, so the output stays valid JSON.

use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter};
use std::io::{self, Write};

/// How string contents are escaped when a value is serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Escaping {
    /// serde_json's standard escaping, UTF-8 passes through
    #[default]
    Standard,
    /// Standard escaping plus `\uXXXX` for every non-ASCII code point
    Ascii,
}

/// Compact formatter that escapes all non-ASCII characters
#[derive(Debug, Clone, Copy, Default)]
pub struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        let bytes = fragment.as_bytes();
        let mut start = 0;

        for (idx, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            if start < idx {
                writer.write_all(&bytes[start..idx])?;
            }
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = idx + ch.len_utf8();
        }

        if start < bytes.len() {
            writer.write_all(&bytes[start..])?;
        }
        Ok(())
    }
}

/// Serialize `value` as compact JSON with the chosen escaping
pub fn write_json<W, T>(writer: &mut W, value: &T, escaping: Escaping) -> serde_json::Result<()>
where
    W: ?Sized + Write,
    T: ?Sized + Serialize,
{
    match escaping {
        Escaping::Standard => {
            let mut ser = serde_json::Serializer::with_formatter(writer, CompactFormatter);
            value.serialize(&mut ser)
        }
        Escaping::Ascii => {
            let mut ser = serde_json::Serializer::with_formatter(writer, AsciiFormatter);
            value.serialize(&mut ser)
        }
    }
}

/// Render `value` to a `String` with the chosen escaping
pub fn to_json_string<T>(value: &T, escaping: Escaping) -> serde_json::Result<String>
where
    T: ?Sized + Serialize,
{
    let mut buf = Vec::new();
    write_json(&mut buf, value, escaping)?;
    // Both formatters only emit valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
