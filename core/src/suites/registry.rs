// ## src/suites/registry.rs

//! suites/registry.rs
//! Static suite table and lookup.

use crate::suites::types::{
    AlgorithmSuite, EncryptionAlg, HashAlg, KdfAlg, SigningAlg, SuiteError, SuiteId,
};

const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;

static SUITES: [AlgorithmSuite; 9] = [
    AlgorithmSuite {
        id: SuiteId::Aes128GcmIv12Tag16,
        encryption: EncryptionAlg::Aes128Gcm,
        data_key_len: 16, iv_len: IV_LEN, tag_len: TAG_LEN,
        kdf: KdfAlg::Identity, signing: None, hash: None,
    },
    AlgorithmSuite {
        id: SuiteId::Aes192GcmIv12Tag16,
        encryption: EncryptionAlg::Aes192Gcm,
        data_key_len: 24, iv_len: IV_LEN, tag_len: TAG_LEN,
        kdf: KdfAlg::Identity, signing: None, hash: None,
    },
    AlgorithmSuite {
        id: SuiteId::Aes256GcmIv12Tag16,
        encryption: EncryptionAlg::Aes256Gcm,
        data_key_len: 32, iv_len: IV_LEN, tag_len: TAG_LEN,
        kdf: KdfAlg::Identity, signing: None, hash: None,
    },
    AlgorithmSuite {
        id: SuiteId::Aes128GcmIv12Tag16HkdfSha256,
        encryption: EncryptionAlg::Aes128Gcm,
        data_key_len: 16, iv_len: IV_LEN, tag_len: TAG_LEN,
        kdf: KdfAlg::HkdfSha256, signing: None, hash: Some(HashAlg::Sha256),
    },
    AlgorithmSuite {
        id: SuiteId::Aes192GcmIv12Tag16HkdfSha256,
        encryption: EncryptionAlg::Aes192Gcm,
        data_key_len: 24, iv_len: IV_LEN, tag_len: TAG_LEN,
        kdf: KdfAlg::HkdfSha256, signing: None, hash: Some(HashAlg::Sha256),
    },
    AlgorithmSuite {
        id: SuiteId::Aes256GcmIv12Tag16HkdfSha256,
        encryption: EncryptionAlg::Aes256Gcm,
        data_key_len: 32, iv_len: IV_LEN, tag_len: TAG_LEN,
        kdf: KdfAlg::HkdfSha256, signing: None, hash: Some(HashAlg::Sha256),
    },
    AlgorithmSuite {
        id: SuiteId::Aes128GcmIv12Tag16HkdfSha256EcdsaP256,
        encryption: EncryptionAlg::Aes128Gcm,
        data_key_len: 16, iv_len: IV_LEN, tag_len: TAG_LEN,
        kdf: KdfAlg::HkdfSha256, signing: Some(SigningAlg::EcdsaP256Sha256), hash: Some(HashAlg::Sha256),
    },
    AlgorithmSuite {
        id: SuiteId::Aes192GcmIv12Tag16HkdfSha384EcdsaP384,
        encryption: EncryptionAlg::Aes192Gcm,
        data_key_len: 24, iv_len: IV_LEN, tag_len: TAG_LEN,
        kdf: KdfAlg::HkdfSha384, signing: Some(SigningAlg::EcdsaP384Sha384), hash: Some(HashAlg::Sha384),
    },
    AlgorithmSuite {
        id: SuiteId::Aes256GcmIv12Tag16HkdfSha384EcdsaP384,
        encryption: EncryptionAlg::Aes256Gcm,
        data_key_len: 32, iv_len: IV_LEN, tag_len: TAG_LEN,
        kdf: KdfAlg::HkdfSha384, signing: Some(SigningAlg::EcdsaP384Sha384), hash: Some(HashAlg::Sha384),
    },
];

/// Resolve a wire suite id to its descriptor.
///
/// Fails with `SuiteError::Unsupported` for ids outside the table.
pub fn resolve(id: u16) -> Result<&'static AlgorithmSuite, SuiteError> {
    SUITES
        .iter()
        .find(|s| s.id as u16 == id)
        .ok_or(SuiteError::Unsupported { raw: id })
}

/// All registered suites, in id order.
pub fn all_suites() -> &'static [AlgorithmSuite] {
    &SUITES
}

impl SuiteId {
    /// Descriptor for a typed id. Infallible: every variant is registered.
    pub fn suite(self) -> &'static AlgorithmSuite {
        // SUITES is indexed in the same order as SuiteId::ALL.
        let idx = SuiteId::ALL.iter().position(|s| *s == self).unwrap_or(0);
        &SUITES[idx]
    }
}
