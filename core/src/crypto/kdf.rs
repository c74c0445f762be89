// ## src/crypto/kdf.rs

//! crypto/kdf.rs
//! Content-key derivation from the data key.
//!
//! - Identity suites use the data key directly.
//! - HKDF suites run HKDF(salt = none, ikm = data key,
//!   info = suite_id BE || message_id) and expand to the data key length.
//!
//! Binding `message_id` into `info` gives every message its own content key
//! even if a data key were ever reused.

use hkdf::Hkdf;
use sha2::{Sha256, Sha384};
use zeroize::Zeroizing;

use crate::crypto::types::CryptoError;
use crate::suites::{AlgorithmSuite, KdfAlg};

/// HKDF `info` for a message: suite id (big-endian) followed by the message id.
#[inline]
pub fn kdf_info(suite: &AlgorithmSuite, message_id: &[u8]) -> Vec<u8> {
    let mut info = Vec::with_capacity(2 + message_id.len());
    info.extend_from_slice(&suite.id.as_u16().to_be_bytes());
    info.extend_from_slice(message_id);
    info
}

/// Derive the per-message content key.
///
/// Errors:
/// - `InvalidKeyLen` when the data key does not match the suite.
/// - `Kdf` if HKDF refuses the output length.
pub fn derive_content_key(
    suite: &AlgorithmSuite,
    data_key: &[u8],
    message_id: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if data_key.len() != suite.data_key_len {
        return Err(CryptoError::InvalidKeyLen {
            expected: suite.data_key_len,
            actual: data_key.len(),
        });
    }

    let mut key = Zeroizing::new(vec![0u8; suite.data_key_len]);
    match suite.kdf {
        KdfAlg::Identity => key.copy_from_slice(data_key),
        KdfAlg::HkdfSha256 => {
            let info = kdf_info(suite, message_id);
            Hkdf::<Sha256>::new(None, data_key)
                .expand(&info, &mut key)
                .map_err(|_| CryptoError::Kdf(suite.data_key_len))?;
        }
        KdfAlg::HkdfSha384 => {
            let info = kdf_info(suite, message_id);
            Hkdf::<Sha384>::new(None, data_key)
                .expand(&info, &mut key)
                .map_err(|_| CryptoError::Kdf(suite.data_key_len))?;
        }
    }
    Ok(key)
}
