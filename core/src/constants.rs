//! Process-wide numeric limits, defaults and wire identifiers.
//!
//! Everything here is `const`: one immutable table, shared by every stream.

/// Maximum number of frames in one message (sequence number is a u32).
pub const MAX_FRAME_COUNT: u64 = (1 << 32) - 1;

/// Maximum frame length in bytes.
pub const MAX_FRAME_SIZE: u64 = (1 << 31) - 1;

/// Maximum NonFramed body length in bytes.
/// Reserves room for IV/tag overhead within GCM's addressable limit.
pub const MAX_SINGLE_BLOCK_SIZE: u64 = (1 << 36) - 32;

/// Maximum length of any u16-length-prefixed field.
pub const MAX_BYTE_ARRAY_SIZE: u64 = (1 << 16) - 1;

/// Default frame length used when the caller does not pick one.
pub const DEFAULT_FRAME_LENGTH: u32 = 4096;

/// Serialization version and object type written at offset 0..2.
pub const SERIALIZATION_VERSION: u8 = 0x01;
pub const OBJECT_TYPE_CUSTOMER_AE_DATA: u8 = 0x80;

/// Message id length in bytes.
pub const MESSAGE_ID_LEN: usize = 16;

/// Marker written in place of a sequence number to announce the final frame.
pub const SEQUENCE_NUMBER_END: u32 = 0xFFFF_FFFF;

/// Content type identifiers (mirrored in headers).
pub mod content_type_ids {
    pub const NON_FRAMED: u8 = 0x01;
    pub const FRAMED: u8     = 0x02;
}

/// Body AAD content strings.
pub mod body_aad {
    pub const FRAME: &[u8]        = b"AWSKMSEncryptionClient Frame";
    pub const FINAL_FRAME: &[u8]  = b"AWSKMSEncryptionClient Final Frame";
    pub const SINGLE_BLOCK: &[u8] = b"AWSKMSEncryptionClient Single Block";
}

/// Reserved encryption-context key carrying the trailer verification key.
pub const ENCODED_SIGNER_KEY: &str = "aws-crypto-public-key";

/// Suite identifiers (mirrored in headers).
pub mod suite_ids {
    pub const AES_128_GCM_IV12_TAG16: u16                      = 0x0014;
    pub const AES_192_GCM_IV12_TAG16: u16                      = 0x0046;
    pub const AES_256_GCM_IV12_TAG16: u16                      = 0x0078;
    pub const AES_128_GCM_IV12_TAG16_HKDF_SHA256: u16          = 0x0114;
    pub const AES_192_GCM_IV12_TAG16_HKDF_SHA256: u16          = 0x0146;
    pub const AES_256_GCM_IV12_TAG16_HKDF_SHA256: u16          = 0x0178;
    pub const AES_128_GCM_IV12_TAG16_HKDF_SHA256_ECDSA_P256: u16 = 0x0214;
    pub const AES_192_GCM_IV12_TAG16_HKDF_SHA384_ECDSA_P384: u16 = 0x0346;
    pub const AES_256_GCM_IV12_TAG16_HKDF_SHA384_ECDSA_P384: u16 = 0x0378;
}

/// Default suite for new messages.
pub const DEFAULT_SUITE_ID: u16 = suite_ids::AES_256_GCM_IV12_TAG16_HKDF_SHA384_ECDSA_P384;

/// Provider ids of the bundled master-key backends.
pub mod provider_ids {
    pub const KMS: &str = "aws-kms";
}
