// ## 📂 File: `src/providers/types.rs`

//! providers/types.rs
//! Master-key capability contract and the records it produces.

use std::fmt;
use std::sync::Arc;

use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::headers::EncryptionContext;
use crate::suites::AlgorithmSuite;
use crate::utils::fmt_bytes;

/// One wrapped copy of the data key, as carried in the header.
///
/// `key_id` is the provider-specific key info field; for raw AES keys it
/// also carries the wrapping IV.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EncryptedDataKey {
    pub provider_id: String,
    pub key_id: Vec<u8>,
    pub encrypted_key: Vec<u8>,
}

impl fmt::Debug for EncryptedDataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedDataKey")
            .field("provider_id", &self.provider_id)
            .field("key_id", &fmt_bytes(&self.key_id))
            .field("encrypted_key_len", &self.encrypted_key.len())
            .finish()
    }
}

/// Plaintext data key. Zeroed on drop, never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DataKey {
    bytes: Vec<u8>,
}

impl DataKey {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Fresh random key of `len` bytes.
    pub fn generate(len: usize) -> Self {
        let mut bytes = vec![0u8; len];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataKey([REDACTED; {}])", self.bytes.len())
    }
}

/// One key-wrapping backend instance.
///
/// Every wrap and unwrap receives the message's encryption context; backends
/// that support it bind the context as AAD.
pub trait MasterKey: Send + Sync {
    fn provider_id(&self) -> &str;

    fn key_id(&self) -> &[u8];

    /// Whether `edk` was produced by this key.
    fn owns_data_key(&self, edk: &EncryptedDataKey) -> bool {
        edk.provider_id == self.provider_id() && edk.key_id == self.key_id()
    }

    /// Generate a data key for `suite` and wrap it.
    fn generate_data_key(
        &self,
        suite: &AlgorithmSuite,
        ctx: &EncryptionContext,
    ) -> Result<(DataKey, EncryptedDataKey), ProviderError> {
        let data_key = DataKey::generate(suite.data_key_len);
        let edk = self.encrypt_data_key(&data_key, suite, ctx)?;
        Ok((data_key, edk))
    }

    /// Wrap an existing data key.
    fn encrypt_data_key(
        &self,
        data_key: &DataKey,
        suite: &AlgorithmSuite,
        ctx: &EncryptionContext,
    ) -> Result<EncryptedDataKey, ProviderError>;

    /// Unwrap `edk`. Fails with `ProviderError::KeyUnwrap` when this backend
    /// cannot or will not recover the key.
    fn decrypt_data_key(
        &self,
        edk: &EncryptedDataKey,
        suite: &AlgorithmSuite,
        ctx: &EncryptionContext,
    ) -> Result<DataKey, ProviderError>;
}

/// Aggregate of master keys.
pub trait MasterKeyProvider: Send + Sync {
    /// Keys used to encrypt one message: primary first, then configuration order.
    fn master_keys_for_encryption(&self) -> Result<Vec<Arc<dyn MasterKey>>, ProviderError>;

    /// Map a wrapped key record back to a usable key, if this provider has one.
    fn resolve(&self, edk: &EncryptedDataKey) -> Option<Arc<dyn MasterKey>>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// A single unwrap attempt failed; the key manager moves on to the next record.
    #[error("{provider_id} could not unwrap data key: {reason}")]
    KeyUnwrap { provider_id: String, reason: String },

    #[error("{provider_id} could not wrap data key: {reason}")]
    KeyWrap { provider_id: String, reason: String },

    #[error("{provider_id} could not generate data key: {reason}")]
    Generate { provider_id: String, reason: String },

    #[error("data key length mismatch: expected={expected}, actual={actual}")]
    DataKeyLength { expected: usize, actual: usize },

    #[error("invalid master key: {0}")]
    InvalidKey(String),

    #[error("no master keys configured for encryption")]
    NoMasterKeys,

    #[error("no master key could decrypt any of {attempted} encrypted data keys")]
    NoDecryptableKey { attempted: usize },
}

impl ProviderError {
    pub(crate) fn unwrap_failed(provider_id: &str, reason: impl Into<String>) -> Self {
        ProviderError::KeyUnwrap { provider_id: provider_id.to_string(), reason: reason.into() }
    }

    pub(crate) fn wrap_failed(provider_id: &str, reason: impl Into<String>) -> Self {
        ProviderError::KeyWrap { provider_id: provider_id.to_string(), reason: reason.into() }
    }
}
