// ## 📂 File: `src/utils.rs`

//! Diagnostics helpers and big-endian read helpers shared by the codecs.

use std::fmt;
use std::io::{self, Read};

use num_enum::TryFromPrimitive;

/// Render a raw wire id as its enum variant name, or hex when unknown.
pub fn enum_name_or_hex<T>(raw: &T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(*raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// Printable form of an identifier: quoted when ASCII, hex otherwise.
pub fn fmt_bytes(b: &[u8]) -> String {
    if b.iter().all(|&c| c.is_ascii_graphic() || c == b' ') {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}

/// Read exactly `len` bytes into a fresh buffer.
///
/// Allocation grows with the bytes actually delivered, so a forged length
/// prefix on a short stream fails with `UnexpectedEof` instead of reserving
/// the declared size up front.
pub fn read_vec<R: Read>(r: &mut R, len: usize) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(len.min(64 * 1024));
    let got = r.by_ref().take(len as u64).read_to_end(&mut out)?;
    if got != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, got {}", len, got),
        ));
    }
    Ok(out)
}

/// Read a `u16`-length-prefixed byte field.
pub fn read_u16_prefixed<R: Read>(r: &mut R) -> io::Result<Vec<u8>> {
    use byteorder::{BigEndian, ReadBytesExt};
    let len = r.read_u16::<BigEndian>()? as usize;
    read_vec(r, len)
}

/// Read up to `want` bytes, stopping early only at end of input.
pub fn read_up_to<R: Read>(r: &mut R, buf: &mut Vec<u8>, want: usize) -> io::Result<usize> {
    let start = buf.len();
    r.by_ref().take(want as u64).read_to_end(buf)?;
    Ok(buf.len() - start)
}

/// True when the reader has no bytes left.
pub fn is_exhausted<R: Read>(r: &mut R) -> io::Result<bool> {
    let mut probe = [0u8; 1];
    loop {
        match r.read(&mut probe) {
            Ok(0) => return Ok(true),
            Ok(_) => return Ok(false),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Reader adapter that records every byte it hands out.
///
/// Used to capture the exact header and frame bytes consumed from a source,
/// which feed the header auth AAD and the trailer digest.
pub struct TeeReader<'a, R: Read> {
    inner: &'a mut R,
    recorded: Vec<u8>,
}

impl<'a, R: Read> TeeReader<'a, R> {
    pub fn new(inner: &'a mut R) -> Self {
        Self { inner, recorded: Vec::new() }
    }

    pub fn into_recorded(self) -> Vec<u8> {
        self.recorded
    }
}

impl<R: Read> Read for TeeReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.recorded.extend_from_slice(&buf[..n]);
        Ok(n)
    }
}
