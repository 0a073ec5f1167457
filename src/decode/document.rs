//! JSON document pass-through
//!
//! A JSON document already is the desired output, so its bytes are copied
//! to the sink untouched. Nothing is parsed or validated here.

use crate::error::{Error, Result};
use std::io::{ErrorKind, Read, Write};

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Copy `input` to `sink` byte for byte, returning the number of bytes copied
pub fn copy_document<R, W>(input: &mut R, sink: &mut W) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    // Not io::copy: read and write failures map to different error kinds
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut copied = 0u64;

    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::source_read(format!("Failed to read document: {e}"))),
        };

        sink.write_all(&buf[..n])
            .map_err(|e| Error::sink_write(e.to_string()))?;
        copied += n as u64;
    }

    sink.flush().map_err(|e| Error::sink_write(e.to_string()))?;
    Ok(copied)
}
