// ## 📂 File: `src/headers/encode.rs`
//! src/headers/encode.rs
//!
//! Header encoding.
//!
//! Field order:
//! ```text
//! version | type | suite_id | message_id
//! | aad_len | context
//! | edk_count | { provider_id | key_info | encrypted_key }*
//! | content_type | reserved (4, zero) | iv_len | frame_length
//! ```
//! followed by the auth section `header_iv | header_auth_tag`.

use byteorder::{BigEndian, WriteBytesExt};

use crate::constants::MAX_BYTE_ARRAY_SIZE;
use crate::headers::context::{put_u16_prefixed, serialize_context};
use crate::headers::types::{HeaderError, MessageHeader};

/// Serialize every header field that precedes the auth section.
///
/// These bytes are the AAD of the header auth tag and the first input of
/// the trailer digest.
pub fn encode_header_body(h: &MessageHeader) -> Result<Vec<u8>, HeaderError> {
    let max = MAX_BYTE_ARRAY_SIZE as usize;
    if h.encrypted_data_keys.is_empty() {
        return Err(HeaderError::NoEncryptedDataKeys);
    }
    if h.encrypted_data_keys.len() > max {
        return Err(HeaderError::TooManyEntries {
            field: "encrypted data keys",
            count: h.encrypted_data_keys.len(),
            max,
        });
    }

    let context = serialize_context(&h.encryption_context)?;
    let mut out = Vec::with_capacity(64 + context.len());

    out.push(h.version);
    out.push(h.object_type);
    out.write_u16::<BigEndian>(h.suite.id.as_u16())?;
    out.extend_from_slice(&h.message_id);

    // context length is bounded by serialize_context
    out.write_u16::<BigEndian>(context.len() as u16)?;
    out.extend_from_slice(&context);

    out.write_u16::<BigEndian>(h.encrypted_data_keys.len() as u16)?;
    for edk in &h.encrypted_data_keys {
        put_u16_prefixed(&mut out, "provider id", edk.provider_id.as_bytes())?;
        put_u16_prefixed(&mut out, "key info", &edk.key_id)?;
        put_u16_prefixed(&mut out, "encrypted data key", &edk.encrypted_key)?;
    }

    out.push(h.content_type as u8);
    out.extend_from_slice(&[0u8; 4]);
    out.push(h.suite.iv_len as u8);
    out.write_u32::<BigEndian>(h.frame_length)?;

    Ok(out)
}

/// Serialize the auth section.
#[inline]
pub fn encode_header_auth(h: &MessageHeader) -> Vec<u8> {
    let mut out = Vec::with_capacity(h.header_iv.len() + h.header_auth_tag.len());
    out.extend_from_slice(&h.header_iv);
    out.extend_from_slice(&h.header_auth_tag);
    out
}

/// Full header bytes, body then auth section.
pub fn encode_header(h: &MessageHeader) -> Result<Vec<u8>, HeaderError> {
    let mut out = encode_header_body(h)?;
    out.extend_from_slice(&encode_header_auth(h));
    Ok(out)
}
