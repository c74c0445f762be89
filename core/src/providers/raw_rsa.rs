// ## 📂 File: `src/providers/raw_rsa.rs`

//! providers/raw_rsa.rs
//! Local RSA wrapping key.
//!
//! - `key_info` is the bare key id.
//! - PKCS#1 v1.5, OAEP-SHA1 and OAEP-SHA256 paddings.
//! - A key built from a public key alone can wrap but not unwrap.
//! - RSA cannot bind AAD, so the encryption context is not used.

use rand::rngs::OsRng;
use rsa::{Oaep, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use sha2::Sha256;
use tracing::trace;

use crate::headers::EncryptionContext;
use crate::providers::types::{DataKey, EncryptedDataKey, MasterKey, ProviderError};
use crate::suites::AlgorithmSuite;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RsaPadding {
    Pkcs1v15,
    OaepSha1,
    OaepSha256,
}

pub struct RawRsaMasterKey {
    provider_id: String,
    key_id: Vec<u8>,
    padding: RsaPadding,
    public_key: RsaPublicKey,
    private_key: Option<RsaPrivateKey>,
}

impl RawRsaMasterKey {
    /// Key able to wrap and unwrap.
    pub fn from_private_key(
        provider_id: impl Into<String>,
        key_id: impl Into<Vec<u8>>,
        private_key: RsaPrivateKey,
        padding: RsaPadding,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            key_id: key_id.into(),
            padding,
            public_key: private_key.to_public_key(),
            private_key: Some(private_key),
        }
    }

    /// Wrap-only key.
    pub fn from_public_key(
        provider_id: impl Into<String>,
        key_id: impl Into<Vec<u8>>,
        public_key: RsaPublicKey,
        padding: RsaPadding,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            key_id: key_id.into(),
            padding,
            public_key,
            private_key: None,
        }
    }

    pub fn padding(&self) -> RsaPadding {
        self.padding
    }
}

impl MasterKey for RawRsaMasterKey {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn key_id(&self) -> &[u8] {
        &self.key_id
    }

    fn encrypt_data_key(
        &self,
        data_key: &DataKey,
        _suite: &AlgorithmSuite,
        _ctx: &EncryptionContext,
    ) -> Result<EncryptedDataKey, ProviderError> {
        let mut rng = OsRng;
        let msg = data_key.as_bytes();
        let wrapped = match self.padding {
            RsaPadding::Pkcs1v15 => self.public_key.encrypt(&mut rng, Pkcs1v15Encrypt, msg),
            RsaPadding::OaepSha1 => self.public_key.encrypt(&mut rng, Oaep::new::<Sha1>(), msg),
            RsaPadding::OaepSha256 => self.public_key.encrypt(&mut rng, Oaep::new::<Sha256>(), msg),
        }
        .map_err(|e| ProviderError::wrap_failed(&self.provider_id, e.to_string()))?;

        trace!(provider_id = %self.provider_id, padding = ?self.padding, "raw RSA wrapped data key");
        Ok(EncryptedDataKey {
            provider_id: self.provider_id.clone(),
            key_id: self.key_id.clone(),
            encrypted_key: wrapped,
        })
    }

    fn decrypt_data_key(
        &self,
        edk: &EncryptedDataKey,
        suite: &AlgorithmSuite,
        _ctx: &EncryptionContext,
    ) -> Result<DataKey, ProviderError> {
        let private_key = self
            .private_key
            .as_ref()
            .ok_or_else(|| ProviderError::unwrap_failed(&self.provider_id, "public key cannot unwrap"))?;

        let ct = edk.encrypted_key.as_slice();
        let plaintext = match self.padding {
            RsaPadding::Pkcs1v15 => private_key.decrypt(Pkcs1v15Encrypt, ct),
            RsaPadding::OaepSha1 => private_key.decrypt(Oaep::new::<Sha1>(), ct),
            RsaPadding::OaepSha256 => private_key.decrypt(Oaep::new::<Sha256>(), ct),
        }
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
