// ## 📂 File: `src/headers/types.rs`

//! headers/types.rs
//! Message header and its typed views.
//!
//! - All multi-byte integers are big-endian on the wire.
//! - The header is variable length: the encryption context and the wrapped
//!   data keys are length-prefixed.
//! - Fields are immutable once a header has been emitted or authenticated.

use std::collections::BTreeMap;
use std::io;

use num_enum::TryFromPrimitive;

use crate::constants::{content_type_ids, MESSAGE_ID_LEN, OBJECT_TYPE_CUSTOMER_AE_DATA, SERIALIZATION_VERSION};
use crate::providers::EncryptedDataKey;
use crate::suites::{AlgorithmSuite, SuiteError};
use crate::utils::enum_name_or_hex;

/// Non-secret key/value metadata bound into the header auth tag.
/// Sorted by key, which is also the serialization order.
pub type EncryptionContext = BTreeMap<String, String>;

/// Body layout.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum ContentType {
    NonFramed = content_type_ids::NON_FRAMED,
    Framed    = content_type_ids::FRAMED,
}

impl ContentType {
    /// Framed for any non-zero frame length.
    pub fn for_frame_length(frame_length: u32) -> Self {
        if frame_length == 0 { ContentType::NonFramed } else { ContentType::Framed }
    }
}

/// Parsed or constructed message header.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageHeader {
    pub version: u8,
    pub object_type: u8,
    pub suite: &'static AlgorithmSuite,
    pub message_id: [u8; MESSAGE_ID_LEN],
    pub encryption_context: EncryptionContext,
    pub encrypted_data_keys: Vec<EncryptedDataKey>,
    pub content_type: ContentType,
    /// 0 for NonFramed content.
    pub frame_length: u32,
    /// IV of the header auth section (all zeros when written by this crate).
    pub header_iv: Vec<u8>,
    pub header_auth_tag: Vec<u8>,
}

impl MessageHeader {
    /// Header with an empty auth section, ready for `encode_header_body`.
    pub fn new(
        suite: &'static AlgorithmSuite,
        message_id: [u8; MESSAGE_ID_LEN],
        encryption_context: EncryptionContext,
        encrypted_data_keys: Vec<EncryptedDataKey>,
        frame_length: u32,
    ) -> Self {
        Self {
            version: SERIALIZATION_VERSION,
            object_type: OBJECT_TYPE_CUSTOMER_AE_DATA,
            suite,
            message_id,
            encryption_context,
            encrypted_data_keys,
            content_type: ContentType::for_frame_length(frame_length),
            frame_length,
            header_iv: Vec::new(),
            header_auth_tag: Vec::new(),
        }
    }

    #[inline]
    pub fn is_framed(&self) -> bool {
        self.content_type == ContentType::Framed
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    #[error("unsupported serialization version: 0x{0:02x}")]
    UnsupportedVersion(u8),

    #[error("unsupported object type: 0x{0:02x}")]
    UnsupportedType(u8),

    #[error(transparent)]
    Suite(#[from] SuiteError),

    #[error("unknown content type: {}", enum_name_or_hex::<ContentType>(.raw))]
    UnknownContentType { raw: u8 },

    #[error("reserved bytes must be zero, got 0x{}", hex::encode(.0))]
    ReservedNonZero([u8; 4]),

    #[error("header IV length {have} does not match suite IV length {need}")]
    IvLenMismatch { have: u8, need: usize },

    #[error("invalid frame length {frame_length} for {content_type:?} content")]
    InvalidFrameLength { content_type: ContentType, frame_length: u32 },

    #[error("message carries no encrypted data keys")]
    NoEncryptedDataKeys,

    #[error("message carries {have} encrypted data keys, limit is {max}")]
    TooManyEncryptedDataKeys { have: usize, max: usize },

    #[error("duplicate encryption context key: {0}")]
    DuplicateContextKey(String),

    #[error("encryption context entry is not valid UTF-8")]
    InvalidUtf8,

    #[error("encryption context length mismatch: declared {declared}, parsed {parsed}")]
    ContextLengthMismatch { declared: usize, parsed: usize },

    #[error("encryption context declares {declared} bytes but no entries")]
    EmptyContextWithLength { declared: usize },

    #[error("{field} is {len} bytes, limit is {max}")]
    FieldTooLong { field: &'static str, len: usize, max: usize },

    #[error("{field} has {count} entries, limit is {max}")]
    TooManyEntries { field: &'static str, count: usize, max: usize },

    #[error("header I/O: {0}")]
    Io(#[from] io::Error),
}
