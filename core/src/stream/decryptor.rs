// ## 📂 File: `src/stream/decryptor.rs`

//! stream/decryptor.rs
//! Pull-based message consumer.
//!
//! The header is parsed, its data key recovered and its auth tag verified
//! while the decryptor is constructed; no plaintext exists before that.
//! Body units are then opened one per pull, in strict sequence order.
//!
//! For signing suites plaintext is held back until the trailer signature
//! verifies, unless the configuration opts into unverified release.

use std::io::{self, Read};
use std::iter::FusedIterator;
use std::time::Instant;

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::crypto::{body_aad, frame_iv, CryptoError};
use crate::headers::{decode_header, MessageHeader};
use crate::keys::KeyManager;
use crate::stream::config::{ConfigError, DecryptorConfig};
use crate::stream::framing::{read_frame, read_single_block, FrameError, SequenceCounter};
use crate::stream::io::read_from_chunks;
use crate::stream::state::StreamState;
use crate::stream::trailer::TrailerVerifier;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;
use crate::utils::{is_exhausted, TeeReader};

pub struct StreamDecryptor<R: Read> {
    source: R,
    header: MessageHeader,
    keys: KeyManager,
    trailer: Option<TrailerVerifier>,
    state: StreamState,
    sequence: SequenceCounter,
    hold_until_verified: bool,
    held: Vec<u8>,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
    pending: Bytes,
}

impl<R: Read> StreamDecryptor<R> {
    /// Read and authenticate the header from `source`.
    ///
    /// Fails with `HeaderAuthentication` when the auth tag does not verify
    /// under the recovered data key.
    pub fn new(mut source: R, config: DecryptorConfig) -> Result<Self, StreamError> {
        config.validate()?;
        let mut timer = TelemetryTimer::new();

        let t = Instant::now();
        let parsed = decode_header(&mut source, config.max_encrypted_data_keys)?;
        timer.add_stage_time(Stage::Header, t.elapsed());
        let suite = parsed.suite();
        let edk_count = parsed.encrypted_data_keys().len();

        let t = Instant::now();
        let keys = KeyManager::for_decryption(
            config.provider().as_ref(),
            suite,
            parsed.message_id(),
            parsed.encryption_context(),
            parsed.encrypted_data_keys(),
        )?;
        timer.add_stage_time(Stage::KeyUnwrap, t.elapsed());

        let t = Instant::now();
        let (header, wire) = parsed.authenticate(keys.aead()?).map_err(|e| match e {
            CryptoError::TagMismatch => {
                warn!(suite = %suite.id, "header auth tag rejected");
                StreamError::HeaderAuthentication
            }
            other => other.into(),
        })?;
        timer.add_stage_time(Stage::Header, t.elapsed());

        let mut trailer = TrailerVerifier::for_header(&header)?;
        if let Some(verifier) = trailer.as_mut() {
            verifier.update(&wire);
        }
        let mut counters = TelemetryCounters::default();
        counters.add_header(wire.len(), edk_count);

        debug!(
            suite = %suite.id,
            message_id = %hex::encode(header.message_id),
            frame_length = header.frame_length,
            encrypted_data_keys = edk_count,
            "message header authenticated"
        );

        Ok(Self {
            source,
            hold_until_verified: trailer.is_some() && !config.unverified_release,
            header,
            keys,
            trailer,
            state: StreamState::Body,
            sequence: SequenceCounter::new(),
            held: Vec::new(),
            counters,
            timer,
            pending: Bytes::new(),
        })
    }

    /// The authenticated header.
    pub fn header(&self) -> &MessageHeader {
        &self.header
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// True once the data key, content key and cipher are gone.
    pub fn is_purged(&self) -> bool {
        self.keys.is_purged()
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }

    /// Next run of authenticated plaintext, or `None` once the message is
    /// complete and fully verified.
    pub fn next_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        match self.state {
            StreamState::Finalized => return Ok(None),
            StreamState::Failed => return Err(ConfigError::StreamFailed.into()),
            _ => {}
        }
        self.step().map_err(|e| {
            self.fail(&e);
            e
        })
    }

    /// Drain and verify the rest of the message, returning its plaintext.
    pub fn close(mut self) -> Result<Bytes, StreamError> {
        let mut out = std::mem::take(&mut self.pending).to_vec();
        while let Some(chunk) = self.next_chunk()? {
            out.extend_from_slice(&chunk);
        }
        Ok(Bytes::from(out))
    }

    fn step(&mut self) -> Result<Option<Bytes>, StreamError> {
        loop {
            match self.state {
                StreamState::Body => {
                    let plaintext = self.next_body_unit()?;
                    if self.hold_until_verified {
                        self.held.extend_from_slice(&plaintext);
                        continue;
                    }
                    if plaintext.is_empty() {
                        continue;
                    }
                    return Ok(Some(Bytes::from(plaintext)));
                }
                StreamState::VerifyingTrailer => {
                    self.verify_trailer()?;
                    let held = std::mem::take(&mut self.held);
                    return Ok((!held.is_empty()).then(|| Bytes::from(held)));
                }
                _ => return Ok(None),
            }
        }
    }

    /// Read, check and open the next body unit.
    fn next_body_unit(&mut self) -> Result<Vec<u8>, StreamError> {
        let suite = self.header.suite;
        let (record, wire) = {
            let mut tee = TeeReader::new(&mut self.source);
            let record = if self.header.is_framed() {
                read_frame(&mut tee, suite, self.header.frame_length)?
            } else {
                read_single_block(&mut tee, suite)?
            };
            (record, tee.into_recorded())
        };
        if let Some(verifier) = self.trailer.as_mut() {
            verifier.update(&wire);
        }

        let seq = record.sequence_number;
        self.sequence.check(seq, record.is_final())?;
        if record.iv != frame_iv(suite.iv_len, seq)? {
            return Err(FrameError::IvMismatch { sequence_number: seq }.into());
        }

        let aad = body_aad(&self.header.message_id, record.content, seq, record.content_len);
        let t = Instant::now();
        let plaintext = self.keys.aead()?.open(&record.iv, &aad, &record.ciphertext_and_tag).map_err(|e| match e {
            CryptoError::TagMismatch => {
                warn!(sequence_number = seq, "body auth tag rejected");
                StreamError::CiphertextAuthentication { sequence_number: seq }
            }
            other => other.into(),
        })?;
        self.timer.add_stage_time(Stage::Decrypt, t.elapsed());
        self.counters.add_frame(plaintext.len(), wire.len(), record.is_final());
        trace!(sequence_number = seq, final_frame = record.is_final(), "frame opened");

        if record.is_final() {
            if self.trailer.is_some() {
                self.state = StreamState::VerifyingTrailer;
            } else {
                self.ensure_exhausted()?;
                self.finalize();
            }
        }
        Ok(plaintext)
    }

    fn verify_trailer(&mut self) -> Result<(), StreamError> {
        let verifier = self
            .trailer
            .take()
            .ok_or_else(|| StreamError::MalformedMessage("trailer already consumed".into()))?;
        let t = Instant::now();
        let trailer_len = verifier.verify(&mut self.source)?;
        self.timer.add_stage_time(Stage::Verify, t.elapsed());
        self.counters.add_trailer(trailer_len);
        self.ensure_exhausted()?;
        self.finalize();
        Ok(())
    }

    fn ensure_exhausted(&mut self) -> Result<(), StreamError> {
        if !is_exhausted(&mut self.source)? {
            return Err(FrameError::TrailingBytes.into());
        }
        Ok(())
    }

    fn finalize(&mut self) {
        self.state = StreamState::Finalized;
        self.keys.purge();
        self.timer.finish();
        debug!(
            frames = self.counters.frames_body + self.counters.frames_final,
            plaintext_bytes = self.counters.bytes_plaintext,
            "message decrypted"
        );
    }

    fn fail(&mut self, e: &StreamError) {
        warn!(error = %e, "decrypt stream failed");
        self.state = StreamState::Failed;
        self.keys.purge();
        self.trailer = None;
        self.held.clear();
        self.timer.finish();
    }
}

impl<R: Read> Iterator for StreamDecryptor<R> {
    type Item = Result<Bytes, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state.is_terminal() {
            return None;
        }
        self.next_chunk().transpose()
    }
}

impl<R: Read> FusedIterator for StreamDecryptor<R> {}

impl<R: Read> Read for StreamDecryptor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut pending = std::mem::take(&mut self.pending);
        let res = read_from_chunks(&mut pending, buf, || self.next_chunk());
        self.pending = pending;
        res
    }
}
