// ## 📂 File: `src/providers/kms.rs`

//! providers/kms.rs
//! Remote key-management backend.
//!
//! The transport is external: callers plug a `KmsClient` implementation in.
//! Every call carries the encryption context, which the service binds into
//! its own ciphertext blob.

use std::sync::Arc;

use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::constants::provider_ids;
use crate::headers::EncryptionContext;
use crate::providers::types::{DataKey, EncryptedDataKey, MasterKey, MasterKeyProvider, ProviderError};
use crate::suites::AlgorithmSuite;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct KmsError(pub String);

pub struct GenerateDataKeyResponse {
    pub plaintext: Zeroizing<Vec<u8>>,
    pub ciphertext_blob: Vec<u8>,
    /// Canonical id of the key that produced the blob.
    pub key_id: String,
}

pub struct EncryptResponse {
    pub ciphertext_blob: Vec<u8>,
    pub key_id: String,
}

pub struct DecryptResponse {
    pub plaintext: Zeroizing<Vec<u8>>,
    pub key_id: String,
}

/// Service boundary. Implementations own timeouts and retries; any error
/// they return is final for that call.
pub trait KmsClient: Send + Sync {
    fn generate_data_key(
        &self,
        key_id: &str,
        number_of_bytes: usize,
        ctx: &EncryptionContext,
        grant_tokens: &[String],
    ) -> Result<GenerateDataKeyResponse, KmsError>;

    fn encrypt(
        &self,
        key_id: &str,
        plaintext: &[u8],
        ctx: &EncryptionContext,
        grant_tokens: &[String],
    ) -> Result<EncryptResponse, KmsError>;

    fn decrypt(
        &self,
        ciphertext_blob: &[u8],
        ctx: &EncryptionContext,
        grant_tokens: &[String],
    ) -> Result<DecryptResponse, KmsError>;
}

pub struct KmsMasterKey {
    key_id: String,
    client: Arc<dyn KmsClient>,
    grant_tokens: Vec<String>,
}

impl KmsMasterKey {
    pub fn new(key_id: impl Into<String>, client: Arc<dyn KmsClient>) -> Self {
        Self { key_id: key_id.into(), client, grant_tokens: Vec::new() }
    }

    pub fn with_grant_tokens(mut self, grant_tokens: Vec<String>) -> Self {
        self.grant_tokens = grant_tokens;
        self
    }
}

impl MasterKey for KmsMasterKey {
    fn provider_id(&self) -> &str {
        provider_ids::KMS
    }

    fn key_id(&self) -> &[u8] {
        self.key_id.as_bytes()
    }

    fn generate_data_key(
        &self,
        suite: &AlgorithmSuite,
        ctx: &EncryptionContext,
    ) -> Result<(DataKey, EncryptedDataKey), ProviderError> {
        let resp = self
            .client
            .generate_data_key(&self.key_id, suite.data_key_len, ctx, &self.grant_tokens)
            .map_err(|e| ProviderError::Generate { provider_id: provider_ids::KMS.to_string(), reason: e.to_string() })?;

        if resp.plaintext.len() != suite.data_key_len {
            return Err(ProviderError::DataKeyLength { expected: suite.data_key_len, actual: resp.plaintext.len() });
        }
        debug!(key_id = %resp.key_id, "kms generated data key");
        Ok((
            DataKey::new(resp.plaintext.to_vec()),
            EncryptedDataKey {
                provider_id: provider_ids::KMS.to_string(),
                key_id: resp.key_id.into_bytes(),
                encrypted_key: resp.ciphertext_blob,
            },
        ))
    }

    fn encrypt_data_key(
        &self,
        data_key: &DataKey,
        _suite: &AlgorithmSuite,
        ctx: &EncryptionContext,
    ) -> Result<EncryptedDataKey, ProviderError> {
        let resp = self
            .client
            .encrypt(&self.key_id, data_key.as_bytes(), ctx, &self.grant_tokens)
            .map_err(|e| ProviderError::wrap_failed(provider_ids::KMS, e.to_string()))?;

        trace!(key_id = %resp.key_id, "kms wrapped data key");
        Ok(EncryptedDataKey {
            provider_id: provider_ids::KMS.to_string(),
            key_id: resp.key_id.into_bytes(),
            encrypted_key: resp.ciphertext_blob,
        })
    }

    fn decrypt_data_key(
        &self,
        edk: &EncryptedDataKey,
        suite: &AlgorithmSuite,
        ctx: &EncryptionContext,
    ) -> Result<DataKey, ProviderError> {
        let resp = self
            .client
            .decrypt(&edk.encrypted_key, ctx, &self.grant_tokens)
            .map_err(|e| ProviderError::unwrap_failed(provider_ids::KMS, e.to_string()))?;

        if resp.key_id.as_bytes() != self.key_id.as_bytes() {
            return Err(ProviderError::unwrap_failed(
                provider_ids::KMS,
                format!("service decrypted with {}, expected {}", resp.key_id, self.key_id),
            ));
        }
        if resp.plaintext.len() != suite.data_key_len {
            return Err(ProviderError::unwrap_failed(
                provider_ids::KMS,
                format!("unwrapped {} bytes, suite needs {}", resp.plaintext.len(), suite.data_key_len),
            ));
        }
        Ok(DataKey::new(resp.plaintext.to_vec()))
    }
}

/// KMS keys for encryption, and KMS records for decryption.
///
/// In strict mode (the default) only records naming a configured key id are
/// resolved. Discovery mode resolves any `aws-kms` record.
pub struct KmsMasterKeyProvider {
    client: Arc<dyn KmsClient>,
    key_ids: Vec<String>,
    discovery: bool,
    grant_tokens: Vec<String>,
}

impl KmsMasterKeyProvider {
    pub fn new(client: Arc<dyn KmsClient>, key_ids: Vec<String>) -> Self {
        Self { client, key_ids, discovery: false, grant_tokens: Vec::new() }
    }

    /// Decrypt-only provider that resolves any KMS record.
    pub fn discovery(client: Arc<dyn KmsClient>) -> Self {
        Self { client, key_ids: Vec::new(), discovery: true, grant_tokens: Vec::new() }
    }

    pub fn with_discovery(mut self, discovery: bool) -> Self {
        self.discovery = discovery;
        self
    }

    pub fn with_grant_tokens(mut self, grant_tokens: Vec<String>) -> Self {
        self.grant_tokens = grant_tokens;
        self
    }

    fn key(&self, key_id: &str) -> Arc<dyn MasterKey> {
        Arc::new(KmsMasterKey::new(key_id, self.client.clone()).with_grant_tokens(self.grant_tokens.clone()))
    }
}

impl MasterKeyProvider for KmsMasterKeyProvider {
    fn master_keys_for_encryption(&self) -> Result<Vec<Arc<dyn MasterKey>>, ProviderError> {
        if self.key_ids.is_empty() {
            return Err(ProviderError::NoMasterKeys);
        }
        Ok(self.key_ids.iter().map(|id| self.key(id)).collect())
    }

    fn resolve(&self, edk: &EncryptedDataKey) -> Option<Arc<dyn MasterKey>> {
        if edk.provider_id != provider_ids::KMS {
            return None;
        }
        let key_id = std::str::from_utf8(&edk.key_id).ok()?;
        if self.discovery || self.key_ids.iter().any(|k| k == key_id) {
            Some(self.key(key_id))
        } else {
            None
        }
    }
}
