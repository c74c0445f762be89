// ## 📂 File: `src/crypto/types.rs`

use crate::constants::body_aad;

/// Width of the sequence number folded into the tail of every body IV.
pub const SEQ_LEN: usize = 4;

/// Which body AAD content string a sealed unit binds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BodyAadContent {
    Frame,
    FinalFrame,
    SingleBlock,
}

impl BodyAadContent {
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            BodyAadContent::Frame => body_aad::FRAME,
            BodyAadContent::FinalFrame => body_aad::FINAL_FRAME,
            BodyAadContent::SingleBlock => body_aad::SINGLE_BLOCK,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// Key length does not match the cipher.
    #[error("invalid key length: expected={expected}, actual={actual}")]
    InvalidKeyLen { expected: usize, actual: usize },

    /// IV length does not match the suite.
    #[error("invalid IV length: expected={expected}, actual={actual}")]
    InvalidIvLen { expected: usize, actual: usize },

    /// Input shorter than one authentication tag.
    #[error("ciphertext too short: {len} < {tag_len}")]
    CiphertextTooShort { len: usize, tag_len: usize },

    /// AEAD tag mismatch (authentication failure).
    #[error("AEAD tag mismatch")]
    TagMismatch,

    #[error("HKDF expand failed for {0} output bytes")]
    Kdf(usize),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("signature mismatch")]
    SignatureMismatch,

    /// Formatted runtime error with context.
    #[error("crypto failure: {0}")]
    Failure(String),
}
