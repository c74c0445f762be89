//! providers/mod.rs
//! Master key provider protocol and the bundled backends.
//!
//! - `MasterKey`: one wrapping key (raw AES, raw RSA, remote KMS).
//! - `MasterKeyProvider`: the set of keys used for one message, and the
//!   lookup from a header record back to a key on decrypt.

pub mod types;
pub mod raw_aes;
pub mod raw_rsa;
pub mod kms;
pub mod static_provider;

pub use types::*;
pub use raw_aes::RawAesMasterKey;
pub use raw_rsa::{RawRsaMasterKey, RsaPadding};
pub use kms::{DecryptResponse, EncryptResponse, GenerateDataKeyResponse, KmsClient, KmsError, KmsMasterKey, KmsMasterKeyProvider};
pub use static_provider::StaticMasterKeyProvider;
