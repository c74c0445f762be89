// ## 📂 File: `src/stream/config.rs`

//! Stream configuration.
//!
//! Encryptor and decryptor settings are built with a constructor plus
//! `with_*` setters and validated once, before any byte is produced.
//! `EncryptOptions` is the serializable subset of the encrypt settings.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_FRAME_LENGTH, ENCODED_SIGNER_KEY, MAX_FRAME_COUNT, MAX_FRAME_SIZE, MAX_SINGLE_BLOCK_SIZE,
};
use crate::headers::EncryptionContext;
use crate::providers::MasterKeyProvider;
use crate::suites::SuiteId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("frame length {have} exceeds maximum {max}")]
    FrameLengthTooLarge { have: u64, max: u64 },

    #[error("source length {have} exceeds the NonFramed maximum {max}")]
    SourceTooLarge { have: u64, max: u64 },

    #[error("source length needs {frames} frames, maximum is {max}")]
    TooManyFrames { frames: u64, max: u64 },

    #[error("encryption context key `{0}` is reserved")]
    ReservedContextKey(String),

    #[error("max_encrypted_data_keys must be at least 1")]
    ZeroEncryptedDataKeyLimit,

    #[error("unknown stream mode `{0}`")]
    UnknownMode(String),

    #[error("encrypt options given for a decrypt stream")]
    EncryptOptionsOnDecrypt,

    #[error("stream already failed")]
    StreamFailed,

    #[error("options JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for one encrypted message.
#[derive(Clone)]
pub struct EncryptorConfig {
    provider: Arc<dyn MasterKeyProvider>,
    pub encryption_context: EncryptionContext,
    pub suite: SuiteId,
    /// 0 selects a NonFramed body.
    pub frame_length: u32,
    /// Declared plaintext length, checked against the body limits up front.
    pub source_length: Option<u64>,
}

impl fmt::Debug for EncryptorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptorConfig")
            .field("encryption_context", &self.encryption_context)
            .field("suite", &self.suite)
            .field("frame_length", &self.frame_length)
            .field("source_length", &self.source_length)
            .finish_non_exhaustive()
    }
}

impl EncryptorConfig {
    pub fn new(provider: Arc<dyn MasterKeyProvider>) -> Self {
        Self {
            provider,
            encryption_context: EncryptionContext::new(),
            suite: SuiteId::default(),
            frame_length: DEFAULT_FRAME_LENGTH,
            source_length: None,
        }
    }

    /// Apply the fields present in `options` on top of the defaults.
    pub fn from_options(provider: Arc<dyn MasterKeyProvider>, options: EncryptOptions) -> Self {
        let mut cfg = Self::new(provider).with_encryption_context(options.encryption_context);
        if let Some(suite) = options.algorithm {
            cfg.suite = suite;
        }
        if let Some(frame_length) = options.frame_length {
            cfg.frame_length = frame_length;
        }
        cfg.source_length = options.source_length;
        cfg
    }

    pub fn with_encryption_context(mut self, ctx: EncryptionContext) -> Self {
        self.encryption_context = ctx;
        self
    }

    pub fn with_algorithm(mut self, suite: SuiteId) -> Self {
        self.suite = suite;
        self
    }

    pub fn with_frame_length(mut self, frame_length: u32) -> Self {
        self.frame_length = frame_length;
        self
    }

    pub fn with_source_length(mut self, source_length: u64) -> Self {
        self.source_length = Some(source_length);
        self
    }

    pub fn provider(&self) -> &Arc<dyn MasterKeyProvider> {
        &self.provider
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_length as u64 > MAX_FRAME_SIZE {
            return Err(ConfigError::FrameLengthTooLarge { have: self.frame_length as u64, max: MAX_FRAME_SIZE });
        }
        if self.encryption_context.contains_key(ENCODED_SIGNER_KEY) {
            return Err(ConfigError::ReservedContextKey(ENCODED_SIGNER_KEY.into()));
        }
        if let Some(len) = self.source_length {
            if self.frame_length == 0 {
                if len > MAX_SINGLE_BLOCK_SIZE {
                    return Err(ConfigError::SourceTooLarge { have: len, max: MAX_SINGLE_BLOCK_SIZE });
                }
            } else {
                // every full frame plus the (possibly empty) final frame
                let frames = len / self.frame_length as u64 + 1;
                if frames > MAX_FRAME_COUNT {
                    return Err(ConfigError::TooManyFrames { frames, max: MAX_FRAME_COUNT });
                }
            }
        }
        Ok(())
    }
}

/// Settings for decrypting messages.
#[derive(Clone)]
pub struct DecryptorConfig {
    provider: Arc<dyn MasterKeyProvider>,
    /// Upper bound on header data-key records; more is a malformed message.
    pub max_encrypted_data_keys: Option<usize>,
    /// Release plaintext of signing suites before the trailer verifies.
    pub unverified_release: bool,
}

impl fmt::Debug for DecryptorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptorConfig")
            .field("max_encrypted_data_keys", &self.max_encrypted_data_keys)
            .field("unverified_release", &self.unverified_release)
            .finish_non_exhaustive()
    }
}

impl DecryptorConfig {
    pub fn new(provider: Arc<dyn MasterKeyProvider>) -> Self {
        Self { provider, max_encrypted_data_keys: None, unverified_release: false }
    }

    pub fn with_max_encrypted_data_keys(mut self, max: usize) -> Self {
        self.max_encrypted_data_keys = Some(max);
        self
    }

    /// Hand out plaintext of signing suites as soon as each frame authenticates.
    ///
    /// The trailer is still verified at the end and a bad signature still
    /// fails the stream, but by then the caller already holds plaintext it
    /// must discard.
    pub fn with_unverified_release(mut self, on: bool) -> Self {
        self.unverified_release = on;
        self
    }

    pub fn provider(&self) -> &Arc<dyn MasterKeyProvider> {
        &self.provider
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_encrypted_data_keys == Some(0) {
            return Err(ConfigError::ZeroEncryptedDataKeyLimit);
        }
        Ok(())
    }
}

/// Serializable encrypt settings. Unknown fields are rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncryptOptions {
    pub encryption_context: EncryptionContext,
    pub algorithm: Option<SuiteId>,
    pub frame_length: Option<u32>,
    pub source_length: Option<u64>,
}

impl EncryptOptions {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Direction of a facade stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StreamMode {
    Encrypt,
    Decrypt,
}

impl FromStr for StreamMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "e" | "encrypt" => Ok(StreamMode::Encrypt),
            "d" | "decrypt" => Ok(StreamMode::Decrypt),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}
