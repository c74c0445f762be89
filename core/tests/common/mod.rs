// Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use envelope_core::crypto::AeadImpl;
use envelope_core::headers::{serialize_context, EncryptionContext, MessageHeader};
use envelope_core::providers::{
    DataKey, DecryptResponse, EncryptResponse, EncryptedDataKey, GenerateDataKeyResponse, KmsClient, KmsError,
    MasterKey, MasterKeyProvider, ProviderError, RawAesMasterKey, StaticMasterKeyProvider,
};
use envelope_core::stream::{decrypt, encrypt, DecryptorConfig, EncryptorConfig};
use envelope_core::suites::{AlgorithmSuite, EncryptionAlg, SuiteId};
use envelope_core::types::StreamError;
use zeroize::Zeroizing;

pub const RAW_PROVIDER: &str = "raw-aes";

/// Deterministic, non-repeating-ish test bytes.
pub fn sample_plaintext(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i.wrapping_mul(31) % 251) as u8).collect()
}

pub fn ctx(pairs: &[(&str, &str)]) -> EncryptionContext {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

pub fn raw_aes_key(name: &str, fill: u8) -> Arc<dyn MasterKey> {
    Arc::new(RawAesMasterKey::new(RAW_PROVIDER, name.as_bytes().to_vec(), &[fill; 32]).unwrap())
}

pub fn provider_of(keys: Vec<Arc<dyn MasterKey>>) -> Arc<dyn MasterKeyProvider> {
    Arc::new(StaticMasterKeyProvider::new(keys))
}

pub fn raw_aes_provider(name: &str, fill: u8) -> Arc<dyn MasterKeyProvider> {
    provider_of(vec![raw_aes_key(name, fill)])
}

pub fn encrypt_with(
    provider: &Arc<dyn MasterKeyProvider>,
    suite: SuiteId,
    frame_length: u32,
    plaintext: &[u8],
    context: EncryptionContext,
) -> (Vec<u8>, MessageHeader) {
    let config = EncryptorConfig::new(provider.clone())
        .with_algorithm(suite)
        .with_frame_length(frame_length)
        .with_encryption_context(context);
    encrypt(config, plaintext).unwrap()
}

pub fn decrypt_with(
    provider: &Arc<dyn MasterKeyProvider>,
    message: &[u8],
) -> Result<(Vec<u8>, MessageHeader), StreamError> {
    decrypt(DecryptorConfig::new(provider.clone()), message)
}

/// Serialized header length, derived from a parsed header.
pub fn header_len(header: &MessageHeader) -> usize {
    envelope_core::headers::encode_header(header).unwrap().len()
}

// ---------------------------------------------------------------------------
// Master keys with scripted behavior
// ---------------------------------------------------------------------------

/// Wraps by XOR with a fixed pad; fails on demand.
pub struct ScriptedKey {
    pub id: String,
    pub pad: u8,
    pub fail_wrap: bool,
    pub fail_unwrap: bool,
    /// Length of generated data keys; `None` follows the suite.
    pub generate_len: Option<usize>,
    pub unwrap_calls: AtomicUsize,
}

impl ScriptedKey {
    pub fn new(id: &str, pad: u8) -> Self {
        Self {
            id: id.to_string(),
            pad,
            fail_wrap: false,
            fail_unwrap: false,
            generate_len: None,
            unwrap_calls: AtomicUsize::new(0),
        }
    }

    pub fn unwraps(&self) -> usize {
        self.unwrap_calls.load(Ordering::SeqCst)
    }
}

impl MasterKey for ScriptedKey {
    fn provider_id(&self) -> &str {
        "scripted"
    }

    fn key_id(&self) -> &[u8] {
        self.id.as_bytes()
    }

    fn generate_data_key(
        &self,
        suite: &AlgorithmSuite,
        ctx: &EncryptionContext,
    ) -> Result<(DataKey, EncryptedDataKey), ProviderError> {
        let data_key = DataKey::generate(self.generate_len.unwrap_or(suite.data_key_len));
        let edk = self.encrypt_data_key(&data_key, suite, ctx)?;
        Ok((data_key, edk))
    }

    fn encrypt_data_key(
        &self,
        data_key: &DataKey,
        _suite: &AlgorithmSuite,
        _ctx: &EncryptionContext,
    ) -> Result<EncryptedDataKey, ProviderError> {
        if self.fail_wrap {
            return Err(ProviderError::KeyWrap { provider_id: "scripted".into(), reason: "scripted failure".into() });
        }
        Ok(EncryptedDataKey {
            provider_id: "scripted".into(),
            key_id: self.id.as_bytes().to_vec(),
            encrypted_key: data_key.as_bytes().iter().map(|b| b ^ self.pad).collect(),
        })
    }

    fn decrypt_data_key(
        &self,
        edk: &EncryptedDataKey,
        _suite: &AlgorithmSuite,
        _ctx: &EncryptionContext,
    ) -> Result<DataKey, ProviderError> {
        self.unwrap_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_unwrap {
            return Err(ProviderError::KeyUnwrap { provider_id: "scripted".into(), reason: "scripted failure".into() });
        }
        Ok(DataKey::new(edk.encrypted_key.iter().map(|b| b ^ self.pad).collect()))
    }
}

// ---------------------------------------------------------------------------
// In-memory key-management service
// ---------------------------------------------------------------------------

/// Blob layout: `key_id_len u8 | key_id | iv (12) | ciphertext || tag`,
/// sealed under a per-key secret with the serialized context as AAD.
#[derive(Default)]
pub struct MockKms {
    secrets: BTreeMap<String, [u8; 32]>,
    pub generate_calls: AtomicUsize,
    pub encrypt_calls: AtomicUsize,
    pub decrypt_calls: AtomicUsize,
    /// Report this id instead of the real one on decrypt.
    pub lie_about_key_id: Option<String>,
}

impl MockKms {
    pub fn with_keys(ids: &[&str]) -> Self {
        let secrets = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.to_string(), [i as u8 + 0x40; 32]))
            .collect();
        Self { secrets, ..Default::default() }
    }

    fn seal(&self, key_id: &str, plaintext: &[u8], ctx: &EncryptionContext) -> Result<Vec<u8>, KmsError> {
        let secret = self.secrets.get(key_id).ok_or_else(|| KmsError(format!("unknown key {}", key_id)))?;
        let aead = AeadImpl::new(EncryptionAlg::Aes256Gcm, secret).map_err(|e| KmsError(e.to_string()))?;
        let aad = serialize_context(ctx).map_err(|e| KmsError(e.to_string()))?;
        let iv = [7u8; 12];
        let ct = aead.seal(&iv, &aad, plaintext).map_err(|e| KmsError(e.to_string()))?;

        let mut blob = vec![key_id.len() as u8];
        blob.extend_from_slice(key_id.as_bytes());
        blob.extend_from_slice(&iv);
        blob.extend_from_slice(&ct);
        Ok(blob)
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

impl KmsClient for MockKms {
    fn generate_data_key(
        &self,
        key_id: &str,
        number_of_bytes: usize,
        ctx: &EncryptionContext,
        _grant_tokens: &[String],
    ) -> Result<GenerateDataKeyResponse, KmsError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        let plaintext = Zeroizing::new(DataKey::generate(number_of_bytes).as_bytes().to_vec());
        let ciphertext_blob = self.seal(key_id, &plaintext, ctx)?;
        Ok(GenerateDataKeyResponse { plaintext, ciphertext_blob, key_id: key_id.to_string() })
    }

    fn encrypt(
        &self,
        key_id: &str,
        plaintext: &[u8],
        ctx: &EncryptionContext,
        _grant_tokens: &[String],
    ) -> Result<EncryptResponse, KmsError> {
        self.encrypt_calls.fetch_add(1, Ordering::SeqCst);
        let ciphertext_blob = self.seal(key_id, plaintext, ctx)?;
        Ok(EncryptResponse { ciphertext_blob, key_id: key_id.to_string() })
    }

    fn decrypt(
        &self,
        blob: &[u8],
        ctx: &EncryptionContext,
        _grant_tokens: &[String],
    ) -> Result<DecryptResponse, KmsError> {
        self.decrypt_calls.fetch_add(1, Ordering::SeqCst);
        let id_len = *blob.first().ok_or_else(|| KmsError("empty blob".into()))? as usize;
        if blob.len() < 1 + id_len + 12 {
            return Err(KmsError("short blob".into()));
        }
        let key_id = std::str::from_utf8(&blob[1..1 + id_len]).map_err(|e| KmsError(e.to_string()))?;
        let secret = self.secrets.get(key_id).ok_or_else(|| KmsError(format!("unknown key {}", key_id)))?;
        let aead = AeadImpl::new(EncryptionAlg::Aes256Gcm, secret).map_err(|e| KmsError(e.to_string()))?;
        let aad = serialize_context(ctx).map_err(|e| KmsError(e.to_string()))?;
        let iv = &blob[1 + id_len..1 + id_len + 12];
        let plaintext = aead
            .open(iv, &aad, &blob[1 + id_len + 12..])
            .map_err(|_| KmsError("access denied".into()))?;
        let reported = self.lie_about_key_id.clone().unwrap_or_else(|| key_id.to_string());
        Ok(DecryptResponse { plaintext: Zeroizing::new(plaintext), key_id: reported })
    }
}

// ---------------------------------------------------------------------------
// Hand-assembled messages
// ---------------------------------------------------------------------------

/// One body unit to assemble: sequence number, final flag, plaintext.
pub struct CraftedFrame {
    pub seq: u32,
    pub last: bool,
    pub plaintext: Vec<u8>,
}

/// Assemble an unsigned Framed message from arbitrary body units, using the
/// real codecs and a data key wrapped by `key`.
pub fn craft_message(key: &ScriptedKey, suite: SuiteId, frame_length: u32, frames: &[CraftedFrame]) -> Vec<u8> {
    use envelope_core::crypto::{body_aad, derive_content_key, frame_iv, BodyAadContent};
    use envelope_core::headers::{encode_header, sign_header};
    use envelope_core::stream::{framing::encode_frame, FrameRecord};

    let suite = suite.suite();
    assert!(!suite.is_signing(), "crafted messages carry no trailer");
    let ctx = EncryptionContext::new();
    let message_id = [0x5Au8; 16];
    let data_key = DataKey::new(vec![0x33; suite.data_key_len]);
    let edk = key.encrypt_data_key(&data_key, suite, &ctx).unwrap();

    let content_key = derive_content_key(suite, data_key.as_bytes(), &message_id).unwrap();
    let aead = AeadImpl::for_suite(suite, &content_key).unwrap();

    let mut header = MessageHeader::new(suite, message_id, ctx, vec![edk], frame_length);
    let body = envelope_core::headers::encode_header_body(&header).unwrap();
    sign_header(&aead, &mut header, &body).unwrap();
    let mut out = encode_header(&header).unwrap();

    for f in frames {
        let content = if f.last { BodyAadContent::FinalFrame } else { BodyAadContent::Frame };
        let iv = frame_iv(suite.iv_len, f.seq).unwrap();
        let aad = body_aad(&message_id, content, f.seq, f.plaintext.len() as u64);
        let ciphertext_and_tag = aead.seal(&iv, &aad, &f.plaintext).unwrap();
        let record = FrameRecord {
            sequence_number: f.seq,
            content,
            iv,
            content_len: f.plaintext.len() as u64,
            ciphertext_and_tag,
        };
        out.extend_from_slice(&encode_frame(&record, suite.tag_len).unwrap());
    }
    out
}
