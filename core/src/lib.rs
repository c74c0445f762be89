//! envelope-core
//!
//! Pure Rust streaming envelope encryption.
//! Messages carry their own algorithm suite, encryption context and wrapped
//! data keys in an authenticated header, followed by AES-GCM frames and an
//! optional ECDSA trailer.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

// Building blocks
pub mod suites;
pub mod crypto;
pub mod providers;
pub mod keys;
pub mod headers;
pub mod telemetry;

// Stream layer
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::headers::{EncryptionContext, MessageHeader};
    pub use crate::providers::{
        EncryptedDataKey, KmsMasterKeyProvider, MasterKey, MasterKeyProvider, RawAesMasterKey, RawRsaMasterKey,
        RsaPadding, StaticMasterKeyProvider,
    };
    pub use crate::stream::{
        decrypt, encrypt, stream, DecryptorConfig, EncryptOptions, EncryptorConfig, MessageStream, StreamDecryptor,
        StreamEncryptor, StreamMode,
    };
    pub use crate::suites::SuiteId;
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::StreamError;
}
