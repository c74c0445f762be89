// ## 📂 File: `src/headers/context.rs`

//! headers/context.rs
//! Encryption-context codec.
//!
//! ```text
//! count (u16) | { key_len (u16) | key | val_len (u16) | val }*
//! ```
//!
//! Pairs are written in key order. An empty context serializes to zero
//! bytes, not to a zero count. The same bytes are the AAD for raw AES
//! key wrapping.

use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};

use crate::constants::MAX_BYTE_ARRAY_SIZE;
use crate::headers::types::{EncryptionContext, HeaderError};
use crate::utils::read_u16_prefixed;

const MAX_FIELD: usize = MAX_BYTE_ARRAY_SIZE as usize;

/// Append a u16-length-prefixed field, enforcing the 16-bit bound.
pub(crate) fn put_u16_prefixed(out: &mut Vec<u8>, field: &'static str, bytes: &[u8]) -> Result<(), HeaderError> {
    if bytes.len() > MAX_FIELD {
        return Err(HeaderError::FieldTooLong { field, len: bytes.len(), max: MAX_FIELD });
    }
    out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
    out.extend_from_slice(bytes);
    Ok(())
}

/// Serialize a context; empty context → empty bytes.
pub fn serialize_context(ctx: &EncryptionContext) -> Result<Vec<u8>, HeaderError> {
    if ctx.is_empty() {
        return Ok(Vec::new());
    }
    if ctx.len() > MAX_FIELD {
        return Err(HeaderError::TooManyEntries { field: "encryption context", count: ctx.len(), max: MAX_FIELD });
    }

    let mut out = Vec::with_capacity(2 + ctx.iter().map(|(k, v)| 4 + k.len() + v.len()).sum::<usize>());
    out.extend_from_slice(&(ctx.len() as u16).to_be_bytes());
    for (k, v) in ctx {
        put_u16_prefixed(&mut out, "encryption context key", k.as_bytes())?;
        put_u16_prefixed(&mut out, "encryption context value", v.as_bytes())?;
    }

    if out.len() > MAX_FIELD {
        return Err(HeaderError::FieldTooLong { field: "encryption context", len: out.len(), max: MAX_FIELD });
    }
    Ok(out)
}

/// Parse a serialized context; the whole buffer must be consumed.
pub fn deserialize_context(buf: &[u8]) -> Result<EncryptionContext, HeaderError> {
    let mut ctx = EncryptionContext::new();
    if buf.is_empty() {
        return Ok(ctx);
    }

    let mut cur = Cursor::new(buf);
    let count = cur.read_u16::<BigEndian>()?;
    if count == 0 {
        return Err(HeaderError::EmptyContextWithLength { declared: buf.len() });
    }

    for _ in 0..count {
        let key = String::from_utf8(read_u16_prefixed(&mut cur)?).map_err(|_| HeaderError::InvalidUtf8)?;
        let val = String::from_utf8(read_u16_prefixed(&mut cur)?).map_err(|_| HeaderError::InvalidUtf8)?;
        if ctx.contains_key(&key) {
            return Err(HeaderError::DuplicateContextKey(key));
        }
        ctx.insert(key, val);
    }

    let parsed = cur.position() as usize;
    if parsed != buf.len() {
        return Err(HeaderError::ContextLengthMismatch { declared: buf.len(), parsed });
    }
    Ok(ctx)
}
