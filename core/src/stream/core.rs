// ## 📂 File: `src/stream/core.rs`
// ## One-shot and mode-selected entry points

use std::io::{self, Read};
use std::sync::Arc;

use bytes::Bytes;

use crate::headers::MessageHeader;
use crate::providers::MasterKeyProvider;
use crate::stream::config::{ConfigError, DecryptorConfig, EncryptOptions, EncryptorConfig, StreamMode};
use crate::stream::decryptor::StreamDecryptor;
use crate::stream::encryptor::StreamEncryptor;
use crate::telemetry::TelemetrySnapshot;
use crate::types::StreamError;

/// Encrypt all of `source` into one message.
pub fn encrypt<R: Read>(config: EncryptorConfig, source: R) -> Result<(Vec<u8>, MessageHeader), StreamError> {
    let mut enc = StreamEncryptor::new(source, config)?;
    let header = enc.header().clone();
    let mut out = Vec::new();
    while let Some(chunk) = enc.next_chunk()? {
        out.extend_from_slice(&chunk);
    }
    Ok((out, header))
}

/// Decrypt one complete message.
///
/// Nothing is returned unless every frame authenticates and, for signing
/// suites, the trailer verifies.
pub fn decrypt<R: Read>(config: DecryptorConfig, source: R) -> Result<(Vec<u8>, MessageHeader), StreamError> {
    let mut dec = StreamDecryptor::new(source, config)?;
    let header = dec.header().clone();
    let mut out = Vec::new();
    while let Some(chunk) = dec.next_chunk()? {
        out.extend_from_slice(&chunk);
    }
    Ok((out, header))
}

/// Open an encrypting or decrypting stream over `source`.
///
/// `options` only applies to encryption; anything but the defaults on a
/// decrypt stream is rejected.
pub fn stream<R: Read>(
    mode: StreamMode,
    source: R,
    provider: Arc<dyn MasterKeyProvider>,
    options: EncryptOptions,
) -> Result<MessageStream<R>, StreamError> {
    match mode {
        StreamMode::Encrypt => {
            let config = EncryptorConfig::from_options(provider, options);
            Ok(MessageStream::Encrypt(StreamEncryptor::new(source, config)?))
        }
        StreamMode::Decrypt => {
            if !options.is_default() {
                return Err(ConfigError::EncryptOptionsOnDecrypt.into());
            }
            Ok(MessageStream::Decrypt(StreamDecryptor::new(source, DecryptorConfig::new(provider))?))
        }
    }
}

/// Either direction behind one type.
pub enum MessageStream<R: Read> {
    Encrypt(StreamEncryptor<R>),
    Decrypt(StreamDecryptor<R>),
}

impl<R: Read> MessageStream<R> {
    pub fn mode(&self) -> StreamMode {
        match self {
            MessageStream::Encrypt(_) => StreamMode::Encrypt,
            MessageStream::Decrypt(_) => StreamMode::Decrypt,
        }
    }

    pub fn header(&self) -> &MessageHeader {
        match self {
            MessageStream::Encrypt(s) => s.header(),
            MessageStream::Decrypt(s) => s.header(),
        }
    }

    pub fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        match self {
            MessageStream::Encrypt(s) => s.next_chunk(),
            MessageStream::Decrypt(s) => s.next_chunk(),
        }
    }

    pub fn close(self) -> Result<Bytes, StreamError> {
        match self {
            MessageStream::Encrypt(s) => s.close(),
            MessageStream::Decrypt(s) => s.close(),
        }
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        match self {
            MessageStream::Encrypt(s) => s.telemetry(),
            MessageStream::Decrypt(s) => s.telemetry(),
        }
    }
}

impl<R: Read> Iterator for MessageStream<R> {
    type Item = Result<Bytes, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            MessageStream::Encrypt(s) => s.next(),
            MessageStream::Decrypt(s) => s.next(),
        }
    }
}

impl<R: Read> Read for MessageStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            MessageStream::Encrypt(s) => s.read(buf),
            MessageStream::Decrypt(s) => s.read(buf),
        }
    }
}
