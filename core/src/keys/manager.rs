// ## 📂 File: `src/keys/manager.rs`

//! keys/manager.rs
//! Per-message key custody.
//!
//! Encrypt: one `generate_data_key` on the primary key, then one
//! `encrypt_data_key` per remaining key; any failure aborts.
//! Decrypt: walk the header's records in order, resolve each against the
//! provider and stop at the first successful unwrap; unwrap failures are
//! logged and skipped.
//!
//! The data key, the derived content key and the cipher keyed with it live
//! only here and are dropped by `purge` or on drop.

use std::fmt;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::constants::MESSAGE_ID_LEN;
use crate::crypto::{derive_content_key, AeadImpl, CryptoError};
use crate::headers::EncryptionContext;
use crate::providers::{DataKey, EncryptedDataKey, MasterKeyProvider, ProviderError};
use crate::suites::AlgorithmSuite;
use crate::types::StreamError;

pub struct KeyManager {
    data_key: Option<DataKey>,
    content_key: Option<Zeroizing<Vec<u8>>>,
    aead: Option<AeadImpl>,
}

impl KeyManager {
    /// Generate and wrap a data key for a new message.
    ///
    /// Returns the manager and the wrapped records in configuration order.
    pub fn for_encryption(
        provider: &dyn MasterKeyProvider,
        suite: &'static AlgorithmSuite,
        message_id: &[u8; MESSAGE_ID_LEN],
        ctx: &EncryptionContext,
    ) -> Result<(Self, Vec<EncryptedDataKey>), StreamError> {
        let keys = provider.master_keys_for_encryption()?;
        let (primary, rest) = keys.split_first().ok_or(ProviderError::NoMasterKeys)?;

        let (data_key, first) = primary
            .generate_data_key(suite, ctx)
            .map_err(|e| StreamError::MasterKeyProvider(e.to_string()))?;
        if data_key.len() != suite.data_key_len {
            return Err(ProviderError::DataKeyLength { expected: suite.data_key_len, actual: data_key.len() }.into());
        }
        debug!(provider_id = primary.provider_id(), "data key generated");

        let mut edks = Vec::with_capacity(keys.len());
        edks.push(first);
        for key in rest {
            // wrap failures are fatal: no partially wrapped message
            let edk = key
                .encrypt_data_key(&data_key, suite, ctx)
                .map_err(|e| StreamError::MasterKeyProvider(e.to_string()))?;
            debug!(provider_id = key.provider_id(), "data key wrapped");
            edks.push(edk);
        }

        let manager = Self::with_data_key(suite, data_key, message_id)?;
        Ok((manager, edks))
    }

    /// Recover the data key from the first record any configured key can unwrap.
    pub fn for_decryption(
        provider: &dyn MasterKeyProvider,
        suite: &'static AlgorithmSuite,
        message_id: &[u8; MESSAGE_ID_LEN],
        ctx: &EncryptionContext,
        edks: &[EncryptedDataKey],
    ) -> Result<Self, StreamError> {
        for (idx, edk) in edks.iter().enumerate() {
            let Some(key) = provider.resolve(edk) else {
                continue;
            };
            match key.decrypt_data_key(edk, suite, ctx) {
                Ok(data_key) if data_key.len() == suite.data_key_len => {
                    debug!(provider_id = %edk.provider_id, record = idx, "data key unwrapped");
                    return Self::with_data_key(suite, data_key, message_id);
                }
                Ok(data_key) => {
                    warn!(
                        provider_id = %edk.provider_id,
                        record = idx,
                        len = data_key.len(),
                        "unwrapped data key has wrong length, trying next record"
                    );
                }
                Err(e @ ProviderError::KeyUnwrap { .. }) => {
                    warn!(provider_id = %edk.provider_id, record = idx, error = %e, "unwrap failed, trying next record");
                }
                Err(e) => return Err(StreamError::MasterKeyProvider(e.to_string())),
            }
        }
        Err(ProviderError::NoDecryptableKey { attempted: edks.len() }.into())
    }

    fn with_data_key(
        suite: &'static AlgorithmSuite,
        data_key: DataKey,
        message_id: &[u8; MESSAGE_ID_LEN],
    ) -> Result<Self, StreamError> {
        let content_key = derive_content_key(suite, data_key.as_bytes(), message_id)?;
        let aead = AeadImpl::for_suite(suite, &content_key)?;
        Ok(Self { data_key: Some(data_key), content_key: Some(content_key), aead: Some(aead) })
    }

    /// Cipher keyed with the content key; fails once purged.
    pub fn aead(&self) -> Result<&AeadImpl, CryptoError> {
        self.aead
            .as_ref()
            .ok_or_else(|| CryptoError::Failure("content key already purged".into()))
    }

    /// Drop the cipher and zero both keys. Idempotent.
    pub fn purge(&mut self) {
        self.aead = None;
        self.data_key = None;
        self.content_key = None;
    }

    pub fn is_purged(&self) -> bool {
        self.aead.is_none() && self.data_key.is_none() && self.content_key.is_none()
    }
}

impl fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyManager").field("purged", &self.is_purged()).finish_non_exhaustive()
    }
}

impl Drop for KeyManager {
    fn drop(&mut self) {
        self.purge();
    }
}
