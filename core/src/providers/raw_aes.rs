// ## 📂 File: `src/providers/raw_aes.rs`

//! providers/raw_aes.rs
//! Local AES-GCM wrapping key.
//!
//! ```text
//! key_info      = key_id | tag_len_bits (u32 BE) | iv_len (u32 BE) | iv
//! encrypted_key = wrapped data key | tag
//! AAD           = serialized encryption context
//! ```

use rand::RngCore;
use tracing::trace;
use zeroize::Zeroizing;

use crate::crypto::AeadImpl;
use crate::headers::{serialize_context, EncryptionContext};
use crate::providers::types::{DataKey, EncryptedDataKey, MasterKey, ProviderError};
use crate::suites::{AlgorithmSuite, EncryptionAlg};

const WRAP_IV_LEN: usize = 12;
const WRAP_TAG_LEN: usize = 16;

pub struct RawAesMasterKey {
    provider_id: String,
    key_id: Vec<u8>,
    wrapping_key: Zeroizing<Vec<u8>>,
    alg: EncryptionAlg,
}

impl RawAesMasterKey {
    /// `wrapping_key` must be 16, 24 or 32 bytes.
    pub fn new(
        provider_id: impl Into<String>,
        key_id: impl Into<Vec<u8>>,
        wrapping_key: &[u8],
    ) -> Result<Self, ProviderError> {
        let alg = match wrapping_key.len() {
            16 => EncryptionAlg::Aes128Gcm,
            24 => EncryptionAlg::Aes192Gcm,
            32 => EncryptionAlg::Aes256Gcm,
            n => return Err(ProviderError::InvalidKey(format!("raw AES wrapping key must be 16, 24 or 32 bytes, got {}", n))),
        };
        Ok(Self {
            provider_id: provider_id.into(),
            key_id: key_id.into(),
            wrapping_key: Zeroizing::new(wrapping_key.to_vec()),
            alg,
        })
    }

    fn cipher(&self) -> Result<AeadImpl, ProviderError> {
        AeadImpl::new(self.alg, &self.wrapping_key).map_err(|e| ProviderError::InvalidKey(e.to_string()))
    }

    fn key_info(&self, iv: &[u8]) -> Vec<u8> {
        let mut info = Vec::with_capacity(self.key_id.len() + 8 + iv.len());
        info.extend_from_slice(&self.key_id);
        info.extend_from_slice(&((WRAP_TAG_LEN * 8) as u32).to_be_bytes());
        info.extend_from_slice(&(iv.len() as u32).to_be_bytes());
        info.extend_from_slice(iv);
        info
    }

    /// Split key info into the wrapping IV, checking prefix and declared sizes.
    fn parse_key_info<'a>(&self, info: &'a [u8]) -> Option<&'a [u8]> {
        let rest = info.strip_prefix(self.key_id.as_slice())?;
        if rest.len() != 8 + WRAP_IV_LEN {
            return None;
        }
        let tag_bits = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]);
        let iv_len = u32::from_be_bytes([rest[4], rest[5], rest[6], rest[7]]);
        if tag_bits as usize != WRAP_TAG_LEN * 8 || iv_len as usize != WRAP_IV_LEN {
            return None;
        }
        Some(&rest[8..])
    }
}

impl MasterKey for RawAesMasterKey {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn key_id(&self) -> &[u8] {
        &self.key_id
    }

    fn owns_data_key(&self, edk: &EncryptedDataKey) -> bool {
        edk.provider_id == self.provider_id && self.parse_key_info(&edk.key_id).is_some()
    }

    fn encrypt_data_key(
        &self,
        data_key: &DataKey,
        _suite: &AlgorithmSuite,
        ctx: &EncryptionContext,
    ) -> Result<EncryptedDataKey, ProviderError> {
        let aad = serialize_context(ctx).map_err(|e| ProviderError::wrap_failed(&self.provider_id, e.to_string()))?;
        let mut iv = [0u8; WRAP_IV_LEN];
        rand::thread_rng().fill_bytes(&mut iv);

        let encrypted_key = self
            .cipher()?
            .seal(&iv, &aad, data_key.as_bytes())
            .map_err(|e| ProviderError::wrap_failed(&self.provider_id, e.to_string()))?;

        trace!(provider_id = %self.provider_id, "raw AES wrapped data key");
        Ok(EncryptedDataKey {
            provider_id: self.provider_id.clone(),
            key_id: self.key_info(&iv),
            encrypted_key,
        })
    }

    fn decrypt_data_key(
        &self,
        edk: &EncryptedDataKey,
        suite: &AlgorithmSuite,
        ctx: &EncryptionContext,
    ) -> Result<DataKey, ProviderError> {
        let iv = self
            .parse_key_info(&edk.key_id)
            .ok_or_else(|| ProviderError::unwrap_failed(&self.provider_id, "key info does not match this key"))?;
        let aad = serialize_context(ctx).map_err(|e| ProviderError::unwrap_failed(&self.provider_id, e.to_string()))?;

        let plaintext = self
            .cipher()?
            .open(iv, &aad, &edk.encrypted_key)
            .map_err(|e| ProviderError::unwrap_failed(&self.provider_id, e.to_string()))?;
        let data_key = DataKey::new(plaintext);

        if data_key.len() != suite.data_key_len {
            return Err(ProviderError::unwrap_failed(
                &self.provider_id,
                format!("unwrapped {} bytes, suite needs {}", data_key.len(), suite.data_key_len),
            ));
        }
        Ok(data_key)
    }
}
