// ## 📂 File: `src/crypto/aead.rs`

//! src/crypto/aead.rs
//! AES-GCM interface for the three content key sizes.
//!
//! Design notes:
//! - All suites use a 12-byte IV and a 16-byte tag.
//! - Output of `seal` is `ciphertext || tag`, which is exactly the wire order
//!   of every body unit and of the header auth section.
//! - Empty plaintext is legal: the header auth tag and an empty final frame
//!   are both tags over zero bytes.
//! - Tag verification fails closed (no partial plaintext).

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};

use crate::crypto::types::CryptoError;
use crate::suites::{AlgorithmSuite, EncryptionAlg};

/// AES-192-GCM with the standard 96-bit nonce.
pub type Aes192Gcm = AesGcm<Aes192, U12>;

const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Cipher instance selected by the suite's encryption algorithm.
#[derive(Clone)]
pub enum AeadImpl {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl AeadImpl {
    /// Build the cipher for `alg` from raw key bytes.
    pub fn new(alg: EncryptionAlg, key: &[u8]) -> Result<Self, CryptoError> {
        let expected = match alg {
            EncryptionAlg::Aes128Gcm => 16,
            EncryptionAlg::Aes192Gcm => 24,
            EncryptionAlg::Aes256Gcm => 32,
        };
        if key.len() != expected {
            return Err(CryptoError::InvalidKeyLen { expected, actual: key.len() });
        }
        let bad_len = |_| CryptoError::InvalidKeyLen { expected, actual: key.len() };
        Ok(match alg {
            EncryptionAlg::Aes128Gcm => Self::Aes128(Aes128Gcm::new_from_slice(key).map_err(bad_len)?),
            EncryptionAlg::Aes192Gcm => Self::Aes192(Aes192Gcm::new_from_slice(key).map_err(bad_len)?),
            EncryptionAlg::Aes256Gcm => Self::Aes256(Aes256Gcm::new_from_slice(key).map_err(bad_len)?),
        })
    }

    /// Cipher for a suite's content key.
    pub fn for_suite(suite: &AlgorithmSuite, key: &[u8]) -> Result<Self, CryptoError> {
        Self::new(suite.encryption, key)
    }

    /// Encrypt `plaintext`; returns `ciphertext || tag`.
    pub fn seal(&self, iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_iv(iv)?;
        let payload = Payload { msg: plaintext, aad };
        let nonce = Nonce::from_slice(iv);
        let out = match self {
            AeadImpl::Aes128(c) => c.encrypt(nonce, payload),
            AeadImpl::Aes192(c) => c.encrypt(nonce, payload),
            AeadImpl::Aes256(c) => c.encrypt(nonce, payload),
        };
        out.map_err(|_| CryptoError::Failure("AES-GCM seal failed".into()))
    }

    /// Decrypt and authenticate `ciphertext || tag`.
    pub fn open(&self, iv: &[u8], aad: &[u8], ciphertext_and_tag: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_iv(iv)?;
        if ciphertext_and_tag.len() < TAG_LEN {
            return Err(CryptoError::CiphertextTooShort {
                len: ciphertext_and_tag.len(),
                tag_len: TAG_LEN,
            });
        }
        let payload = Payload { msg: ciphertext_and_tag, aad };
        let nonce = Nonce::from_slice(iv);
        let out = match self {
            AeadImpl::Aes128(c) => c.decrypt(nonce, payload),
            AeadImpl::Aes192(c) => c.decrypt(nonce, payload),
            AeadImpl::Aes256(c) => c.decrypt(nonce, payload),
        };
        out.map_err(|_| CryptoError::TagMismatch)
    }
}

#[inline]
fn check_iv(iv: &[u8]) -> Result<(), CryptoError> {
    if iv.len() != IV_LEN {
        return Err(CryptoError::InvalidIvLen { expected: IV_LEN, actual: iv.len() });
    }
    Ok(())
}
