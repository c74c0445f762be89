// ## 📂 File: `src/headers/decode.rs`
//! src/headers/decode.rs
//!
//! Header decoding.
//!
//! Design notes:
//! - Reads field by field from any `Read`, so only header bytes are consumed
//!   and the body stays in the source.
//! - Every length prefix is bounded by its 16-bit field before the bytes are read.
//! - The result is an `UnauthenticatedHeader`: the suite, message id,
//!   context and data keys are visible to the key manager (they are needed
//!   to derive the key that checks the tag) but the `MessageHeader` itself is
//!   released only by `authenticate`.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::constants::{MESSAGE_ID_LEN, MAX_FRAME_SIZE, OBJECT_TYPE_CUSTOMER_AE_DATA, SERIALIZATION_VERSION};
use crate::crypto::{AeadImpl, CryptoError};
use crate::headers::auth::verify_header_auth;
use crate::headers::context::deserialize_context;
use crate::headers::types::{ContentType, EncryptionContext, HeaderError, MessageHeader};
use crate::providers::EncryptedDataKey;
use crate::suites::{resolve, AlgorithmSuite};
use crate::utils::{read_u16_prefixed, read_vec, TeeReader};

/// A parsed header whose auth tag has not been checked yet.
#[derive(Debug)]
pub struct UnauthenticatedHeader {
    header: MessageHeader,
    body_bytes: Vec<u8>,
}

impl UnauthenticatedHeader {
    pub fn suite(&self) -> &'static AlgorithmSuite {
        self.header.suite
    }

    pub fn message_id(&self) -> &[u8; MESSAGE_ID_LEN] {
        &self.header.message_id
    }

    pub fn encryption_context(&self) -> &EncryptionContext {
        &self.header.encryption_context
    }

    pub fn encrypted_data_keys(&self) -> &[EncryptedDataKey] {
        &self.header.encrypted_data_keys
    }

    /// Length of the serialized header including its auth section.
    pub fn encoded_len(&self) -> usize {
        self.body_bytes.len() + self.header.header_iv.len() + self.header.header_auth_tag.len()
    }

    /// Check the auth tag under `aead`. On success returns the header and
    /// its exact wire bytes (body plus auth section).
    pub fn authenticate(self, aead: &AeadImpl) -> Result<(MessageHeader, Vec<u8>), CryptoError> {
        verify_header_auth(aead, &self.body_bytes, &self.header.header_iv, &self.header.header_auth_tag)?;
        let mut wire = self.body_bytes;
        wire.extend_from_slice(&self.header.header_iv);
        wire.extend_from_slice(&self.header.header_auth_tag);
        Ok((self.header, wire))
    }
}

/// Parse one header, including its auth section, from `r`.
///
/// `max_encrypted_data_keys` bounds the number of wrapped keys accepted.
pub fn decode_header<R: Read>(
    r: &mut R,
    max_encrypted_data_keys: Option<usize>,
) -> Result<UnauthenticatedHeader, HeaderError> {
    let mut tee = TeeReader::new(r);

    let version = tee.read_u8()?;
    if version != SERIALIZATION_VERSION {
        return Err(HeaderError::UnsupportedVersion(version));
    }
    let object_type = tee.read_u8()?;
    if object_type != OBJECT_TYPE_CUSTOMER_AE_DATA {
        return Err(HeaderError::UnsupportedType(object_type));
    }

    let suite = resolve(tee.read_u16::<BigEndian>()?)?;

    let mut message_id = [0u8; MESSAGE_ID_LEN];
    tee.read_exact(&mut message_id)?;

    let aad_len = tee.read_u16::<BigEndian>()? as usize;
    let context_bytes = read_vec(&mut tee, aad_len)?;
    let encryption_context = deserialize_context(&context_bytes)?;

    let edk_count = tee.read_u16::<BigEndian>()? as usize;
    if edk_count == 0 {
        return Err(HeaderError::NoEncryptedDataKeys);
    }
    if let Some(max) = max_encrypted_data_keys {
        if edk_count > max {
            return Err(HeaderError::TooManyEncryptedDataKeys { have: edk_count, max });
        }
    }
    let mut encrypted_data_keys = Vec::with_capacity(edk_count.min(16));
    for _ in 0..edk_count {
        let provider_id = String::from_utf8(read_u16_prefixed(&mut tee)?).map_err(|_| HeaderError::InvalidUtf8)?;
        let key_id = read_u16_prefixed(&mut tee)?;
        let encrypted_key = read_u16_prefixed(&mut tee)?;
        encrypted_data_keys.push(EncryptedDataKey { provider_id, key_id, encrypted_key });
    }

    let raw_content_type = tee.read_u8()?;
    let content_type = ContentType::try_from(raw_content_type)
        .map_err(|_| HeaderError::UnknownContentType { raw: raw_content_type })?;

    let mut reserved = [0u8; 4];
    tee.read_exact(&mut reserved)?;
    if reserved != [0u8; 4] {
        return Err(HeaderError::ReservedNonZero(reserved));
    }

    let iv_len = tee.read_u8()?;
    if iv_len as usize != suite.iv_len {
        return Err(HeaderError::IvLenMismatch { have: iv_len, need: suite.iv_len });
    }

    let frame_length = tee.read_u32::<BigEndian>()?;
    let frame_ok = match content_type {
        ContentType::Framed => frame_length != 0 && u64::from(frame_length) <= MAX_FRAME_SIZE,
        ContentType::NonFramed => frame_length == 0,
    };
    if !frame_ok {
        return Err(HeaderError::InvalidFrameLength { content_type, frame_length });
    }

    let body_bytes = tee.into_recorded();

    let header_iv = read_vec(r, suite.iv_len)?;
    let header_auth_tag = read_vec(r, suite.tag_len)?;

    Ok(UnauthenticatedHeader {
        header: MessageHeader {
            version,
            object_type,
            suite,
            message_id,
            encryption_context,
            encrypted_data_keys,
            content_type,
            frame_length,
            header_iv,
            header_auth_tag,
        },
        body_bytes,
    })
}
