// ## 📂 File: `src/headers/auth.rs`

//! headers/auth.rs
//! Header authentication: an AES-GCM tag over an empty plaintext, with the
//! serialized header body as AAD, under the derived content key and an
//! all-zero IV.

use crate::crypto::{header_auth_iv, AeadImpl, CryptoError};
use crate::headers::types::MessageHeader;

/// Compute and store the auth section of `header` from its serialized body.
pub fn sign_header(aead: &AeadImpl, header: &mut MessageHeader, body_bytes: &[u8]) -> Result<(), CryptoError> {
    let iv = header_auth_iv(header.suite.iv_len);
    let tag = aead.seal(&iv, body_bytes, &[])?;
    header.header_iv = iv;
    header.header_auth_tag = tag;
    Ok(())
}

/// Verify a header auth section; `TagMismatch` on any difference.
pub fn verify_header_auth(aead: &AeadImpl, body_bytes: &[u8], iv: &[u8], tag: &[u8]) -> Result<(), CryptoError> {
    let plaintext = aead.open(iv, body_bytes, tag)?;
    if !plaintext.is_empty() {
        return Err(CryptoError::TagMismatch);
    }
    Ok(())
}
