// ## 📂 File: `src/types.rs`

use std::io;

use crate::crypto::CryptoError;
use crate::headers::HeaderError;
use crate::providers::ProviderError;
use crate::stream::config::ConfigError;
use crate::stream::framing::FrameError;
use crate::suites::SuiteError;

/// Unified stream error.
///
/// Module errors convert through `From` so `?` works across layers. Tag
/// failures are not converted generically: call sites map
/// `CryptoError::TagMismatch` to `HeaderAuthentication` or
/// `CiphertextAuthentication` depending on what was being opened.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("{0}")]
    UnsupportedSuite(SuiteError),

    /// No configured backend could wrap or unwrap the data key.
    #[error("master key provider error: {0}")]
    MasterKeyProvider(String),

    /// One backend failed to unwrap one record.
    #[error("key unwrap failed: {0}")]
    KeyUnwrap(String),

    #[error("header authentication failed")]
    HeaderAuthentication,

    #[error("ciphertext authentication failed at sequence number {sequence_number}")]
    CiphertextAuthentication { sequence_number: u32 },

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("size limit exceeded: {0}")]
    SizeLimitExceeded(String),

    #[error("trailer signature verification failed")]
    SignatureVerification,

    #[error("I/O error: {0}")]
    Io(#[source] io::Error),

    #[error("invalid configuration: {0}")]
    Config(ConfigError),

    #[error("crypto error: {0}")]
    Crypto(CryptoError),
}

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> Self {
        // A short read inside the message is a structural violation, not a transport fault.
        if e.kind() == io::ErrorKind::UnexpectedEof {
            StreamError::MalformedMessage(format!("truncated message: {}", e))
        } else {
            StreamError::Io(e)
        }
    }
}

impl From<SuiteError> for StreamError {
    fn from(e: SuiteError) -> Self {
        StreamError::UnsupportedSuite(e)
    }
}

impl From<CryptoError> for StreamError {
    fn from(e: CryptoError) -> Self {
        StreamError::Crypto(e)
    }
}

impl From<HeaderError> for StreamError {
    fn from(e: HeaderError) -> Self {
        match e {
            HeaderError::Suite(s) => StreamError::UnsupportedSuite(s),
            HeaderError::Io(io) => StreamError::from(io),
            HeaderError::FieldTooLong { .. } | HeaderError::TooManyEntries { .. } => {
                StreamError::SizeLimitExceeded(e.to_string())
            }
            other => StreamError::MalformedMessage(other.to_string()),
        }
    }
}

impl From<FrameError> for StreamError {
    fn from(e: FrameError) -> Self {
        match e {
            FrameError::Io(io) => StreamError::from(io),
            FrameError::FrameCountExceeded | FrameError::SingleBlockTooLarge { .. } => {
                StreamError::SizeLimitExceeded(e.to_string())
            }
            other => StreamError::MalformedMessage(other.to_string()),
        }
    }
}

impl From<ProviderError> for StreamError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::KeyUnwrap { .. } => StreamError::KeyUnwrap(e.to_string()),
            other => StreamError::MasterKeyProvider(other.to_string()),
        }
    }
}

impl From<ConfigError> for StreamError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::FrameLengthTooLarge { .. }
            | ConfigError::SourceTooLarge { .. }
            | ConfigError::TooManyFrames { .. } => StreamError::SizeLimitExceeded(e.to_string()),
            other => StreamError::Config(other),
        }
    }
}

impl StreamError {
    /// True for the errors raised by a failed AEAD tag or signature check.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            StreamError::HeaderAuthentication
                | StreamError::CiphertextAuthentication { .. }
                | StreamError::SignatureVerification
        )
    }
}
