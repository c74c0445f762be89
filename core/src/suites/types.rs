// ## 📂 File: `src/suites/types.rs`

use std::fmt;
use std::str::FromStr;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::constants::suite_ids;
use crate::utils::enum_name_or_hex;

/// Registered suite identifiers.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
pub enum SuiteId {
    #[serde(rename = "AES_128_GCM_IV12_TAG16")]
    Aes128GcmIv12Tag16 = suite_ids::AES_128_GCM_IV12_TAG16,
    #[serde(rename = "AES_192_GCM_IV12_TAG16")]
    Aes192GcmIv12Tag16 = suite_ids::AES_192_GCM_IV12_TAG16,
    #[serde(rename = "AES_256_GCM_IV12_TAG16")]
    Aes256GcmIv12Tag16 = suite_ids::AES_256_GCM_IV12_TAG16,
    #[serde(rename = "AES_128_GCM_IV12_TAG16_HKDF_SHA256")]
    Aes128GcmIv12Tag16HkdfSha256 = suite_ids::AES_128_GCM_IV12_TAG16_HKDF_SHA256,
    #[serde(rename = "AES_192_GCM_IV12_TAG16_HKDF_SHA256")]
    Aes192GcmIv12Tag16HkdfSha256 = suite_ids::AES_192_GCM_IV12_TAG16_HKDF_SHA256,
    #[serde(rename = "AES_256_GCM_IV12_TAG16_HKDF_SHA256")]
    Aes256GcmIv12Tag16HkdfSha256 = suite_ids::AES_256_GCM_IV12_TAG16_HKDF_SHA256,
    #[serde(rename = "AES_128_GCM_IV12_TAG16_HKDF_SHA256_ECDSA_P256")]
    Aes128GcmIv12Tag16HkdfSha256EcdsaP256 = suite_ids::AES_128_GCM_IV12_TAG16_HKDF_SHA256_ECDSA_P256,
    #[serde(rename = "AES_192_GCM_IV12_TAG16_HKDF_SHA384_ECDSA_P384")]
    Aes192GcmIv12Tag16HkdfSha384EcdsaP384 = suite_ids::AES_192_GCM_IV12_TAG16_HKDF_SHA384_ECDSA_P384,
    #[serde(rename = "AES_256_GCM_IV12_TAG16_HKDF_SHA384_ECDSA_P384")]
    Aes256GcmIv12Tag16HkdfSha384EcdsaP384 = suite_ids::AES_256_GCM_IV12_TAG16_HKDF_SHA384_ECDSA_P384,
}

impl SuiteId {
    pub const ALL: [SuiteId; 9] = [
        SuiteId::Aes128GcmIv12Tag16,
        SuiteId::Aes192GcmIv12Tag16,
        SuiteId::Aes256GcmIv12Tag16,
        SuiteId::Aes128GcmIv12Tag16HkdfSha256,
        SuiteId::Aes192GcmIv12Tag16HkdfSha256,
        SuiteId::Aes256GcmIv12Tag16HkdfSha256,
        SuiteId::Aes128GcmIv12Tag16HkdfSha256EcdsaP256,
        SuiteId::Aes192GcmIv12Tag16HkdfSha384EcdsaP384,
        SuiteId::Aes256GcmIv12Tag16HkdfSha384EcdsaP384,
    ];

    #[inline]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Canonical upper-case name, e.g. `AES_256_GCM_IV12_TAG16_HKDF_SHA384_ECDSA_P384`.
    pub const fn name(self) -> &'static str {
        match self {
            SuiteId::Aes128GcmIv12Tag16 => "AES_128_GCM_IV12_TAG16",
            SuiteId::Aes192GcmIv12Tag16 => "AES_192_GCM_IV12_TAG16",
            SuiteId::Aes256GcmIv12Tag16 => "AES_256_GCM_IV12_TAG16",
            SuiteId::Aes128GcmIv12Tag16HkdfSha256 => "AES_128_GCM_IV12_TAG16_HKDF_SHA256",
            SuiteId::Aes192GcmIv12Tag16HkdfSha256 => "AES_192_GCM_IV12_TAG16_HKDF_SHA256",
            SuiteId::Aes256GcmIv12Tag16HkdfSha256 => "AES_256_GCM_IV12_TAG16_HKDF_SHA256",
            SuiteId::Aes128GcmIv12Tag16HkdfSha256EcdsaP256 => "AES_128_GCM_IV12_TAG16_HKDF_SHA256_ECDSA_P256",
            SuiteId::Aes192GcmIv12Tag16HkdfSha384EcdsaP384 => "AES_192_GCM_IV12_TAG16_HKDF_SHA384_ECDSA_P384",
            SuiteId::Aes256GcmIv12Tag16HkdfSha384EcdsaP384 => "AES_256_GCM_IV12_TAG16_HKDF_SHA384_ECDSA_P384",
        }
    }
}

impl fmt::Display for SuiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SuiteId {
    type Err = SuiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SuiteId::ALL
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SuiteError::UnknownName(s.to_string()))
    }
}

impl Default for SuiteId {
    fn default() -> Self {
        SuiteId::Aes256GcmIv12Tag16HkdfSha384EcdsaP384
    }
}

/// Content cipher.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EncryptionAlg {
    Aes128Gcm,
    Aes192Gcm,
    Aes256Gcm,
}

/// Content-key derivation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KdfAlg {
    /// Data key is used directly as the content key.
    Identity,
    HkdfSha256,
    HkdfSha384,
}

/// Hash used by the KDF and/or the trailer digest.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HashAlg {
    Sha256,
    Sha384,
}

/// Trailer signature scheme.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SigningAlg {
    EcdsaP256Sha256,
    EcdsaP384Sha384,
}

impl SigningAlg {
    pub const fn hash(self) -> HashAlg {
        match self {
            SigningAlg::EcdsaP256Sha256 => HashAlg::Sha256,
            SigningAlg::EcdsaP384Sha384 => HashAlg::Sha384,
        }
    }
}

/// Immutable suite descriptor. Looked up once per message.
#[derive(Debug, PartialEq, Eq)]
pub struct AlgorithmSuite {
    pub id: SuiteId,
    pub encryption: EncryptionAlg,
    pub data_key_len: usize,
    pub iv_len: usize,
    pub tag_len: usize,
    pub kdf: KdfAlg,
    pub signing: Option<SigningAlg>,
    pub hash: Option<HashAlg>,
}

impl AlgorithmSuite {
    #[inline]
    pub fn is_signing(&self) -> bool {
        self.signing.is_some()
    }

    /// Length of the header authentication section (IV + tag).
    #[inline]
    pub fn header_auth_len(&self) -> usize {
        self.iv_len + self.tag_len
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    #[error("unsupported algorithm suite: {}", enum_name_or_hex::<SuiteId>(.raw))]
    Unsupported { raw: u16 },

    #[error("unknown algorithm suite name: {0}")]
    UnknownName(String),
}
