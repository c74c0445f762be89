// ## 📂 File: `src/crypto/nonce.rs`

//! crypto/nonce.rs
//! Deterministic body IVs.
//!
//! The IV for sequence number `n` is `(iv_len - 4)` zero bytes followed by
//! `n` as a big-endian u32. Sequence numbers never repeat inside a message
//! and the content key is unique per message, so (key, IV) pairs never repeat.

use crate::crypto::types::{CryptoError, SEQ_LEN};

/// IV for one body unit.
#[inline]
pub fn frame_iv(iv_len: usize, sequence_number: u32) -> Result<Vec<u8>, CryptoError> {
    if iv_len < SEQ_LEN {
        return Err(CryptoError::InvalidIvLen { expected: SEQ_LEN, actual: iv_len });
    }
    let mut iv = vec![0u8; iv_len];
    iv[iv_len - SEQ_LEN..].copy_from_slice(&sequence_number.to_be_bytes());
    Ok(iv)
}

/// IV used for the header authentication tag (all zeros).
#[inline]
pub fn header_auth_iv(iv_len: usize) -> Vec<u8> {
    vec![0u8; iv_len]
}
