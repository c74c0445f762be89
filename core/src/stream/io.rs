// ## 📂 File: `src/stream/io.rs`
// ## Input normalization and the pull-to-`Read` bridge

use std::io::{self, Read};
use std::path::PathBuf;

use bytes::Bytes;

use crate::types::StreamError;

/// Canonical input abstraction.
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

impl From<Vec<u8>> for InputSource {
    fn from(v: Vec<u8>) -> Self {
        InputSource::Memory(v)
    }
}

/// Normalize an input source into a boxed reader.
pub fn open_input(src: InputSource) -> Result<Box<dyn Read + Send>, StreamError> {
    let reader: Box<dyn Read + Send> = match src {
        InputSource::Reader(r) => r,
        InputSource::File(p) => Box::new(std::fs::File::open(p)?),
        InputSource::Memory(b) => Box::new(io::Cursor::new(b)),
    };
    Ok(reader)
}

/// Surface a stream error through `io::Read`.
///
/// Source I/O errors pass through unchanged; everything else becomes
/// `InvalidData` carrying the original error.
pub(crate) fn into_io_error(e: StreamError) -> io::Error {
    match e {
        StreamError::Io(inner) => inner,
        other => io::Error::new(io::ErrorKind::InvalidData, other),
    }
}

/// Fill `buf` from `pending`, pulling a new chunk through `next` when it
/// runs dry. Returns 0 only at the end of the stream.
pub(crate) fn read_from_chunks<F>(pending: &mut Bytes, buf: &mut [u8], mut next: F) -> io::Result<usize>
where
    F: FnMut() -> Result<Option<Bytes>, StreamError>,
{
    if buf.is_empty() {
        return Ok(0);
    }
    loop {
        if !pending.is_empty() {
            let n = pending.len().min(buf.len());
            buf[..n].copy_from_slice(&pending.split_to(n));
            return Ok(n);
        }
        match next() {
            Ok(Some(chunk)) => *pending = chunk,
            Ok(None) => return Ok(0),
            Err(e) => return Err(into_io_error(e)),
        }
    }
}
