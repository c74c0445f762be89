// ## 📂 File: `src/stream/encryptor.rs`

//! stream/encryptor.rs
//! Pull-based message producer.
//!
//! Output order: header (with auth section), body units in sequence order,
//! then the trailer for signing suites. Plaintext is read from the source
//! only as fast as chunks are pulled; at most one frame is buffered.
//!
//! A NonFramed body is read and bounded before the header is handed out, so
//! the first pull returns header, block and trailer together.

use std::io::{self, Read};
use std::iter::FusedIterator;
use std::time::Instant;

use bytes::Bytes;
use rand::RngCore;
use tracing::{debug, trace, warn};

use crate::constants::{ENCODED_SIGNER_KEY, MAX_SINGLE_BLOCK_SIZE, MESSAGE_ID_LEN};
use crate::crypto::{body_aad, frame_iv, BodyAadContent};
#[cfg(test)]
use crate::crypto::CryptoError;
use crate::headers::{encode_header_auth, encode_header_body, sign_header, MessageHeader};
use crate::keys::KeyManager;
use crate::stream::config::{ConfigError, EncryptorConfig};
use crate::stream::framing::{encode_frame, FrameError, FrameRecord, SequenceCounter};
use crate::stream::io::read_from_chunks;
use crate::stream::state::StreamState;
use crate::stream::trailer::TrailerSigner;
use crate::suites::AlgorithmSuite;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;
use crate::utils::read_up_to;

pub struct StreamEncryptor<R: Read> {
    source: R,
    header: MessageHeader,
    /// Encoded header, handed out by the first pull.
    header_bytes: Option<Bytes>,
    keys: KeyManager,
    trailer: Option<TrailerSigner>,
    state: StreamState,
    sequence: SequenceCounter,
    buffer: Vec<u8>,
    source_length: Option<u64>,
    block_limit: u64,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
    /// Leftover of a chunk partially consumed through `io::Read`.
    pending: Bytes,
}

impl<R: Read> StreamEncryptor<R> {
    /// Validate `config`, obtain and wrap a data key and build the header.
    ///
    /// Nothing is read from `source` yet; every configuration and provider
    /// error surfaces here, before any byte is produced.
    pub fn new(source: R, config: EncryptorConfig) -> Result<Self, StreamError> {
        config.validate()?;
        let mut timer = TelemetryTimer::new();
        let suite = config.suite.suite();

        let mut ctx = config.encryption_context.clone();
        let mut trailer = TrailerSigner::for_suite(suite);
        if let Some(signer) = trailer.as_ref() {
            ctx.insert(ENCODED_SIGNER_KEY.to_string(), signer.encoded_public_key());
        }

        let mut message_id = [0u8; MESSAGE_ID_LEN];
        rand::thread_rng().fill_bytes(&mut message_id);

        let t = Instant::now();
        let (keys, edks) = KeyManager::for_encryption(config.provider().as_ref(), suite, &message_id, &ctx)?;
        timer.add_stage_time(Stage::KeyWrap, t.elapsed());
        let edk_count = edks.len();

        let t = Instant::now();
        let mut header = MessageHeader::new(suite, message_id, ctx, edks, config.frame_length);
        let mut wire = encode_header_body(&header)?;
        sign_header(keys.aead()?, &mut header, &wire)?;
        wire.extend_from_slice(&encode_header_auth(&header));
        timer.add_stage_time(Stage::Header, t.elapsed());

        if let Some(signer) = trailer.as_mut() {
            signer.update(&wire);
        }
        let mut counters = TelemetryCounters::default();
        counters.add_header(wire.len(), edk_count);

        debug!(
            suite = %suite.id,
            message_id = %hex::encode(message_id),
            frame_length = config.frame_length,
            encrypted_data_keys = edk_count,
            "message header built"
        );

        Ok(Self {
            source,
            header,
            header_bytes: Some(Bytes::from(wire)),
            keys,
            trailer,
            state: StreamState::AwaitingHeader,
            sequence: SequenceCounter::new(),
            buffer: Vec::new(),
            source_length: config.source_length,
            block_limit: MAX_SINGLE_BLOCK_SIZE,
            counters,
            timer,
            pending: Bytes::new(),
        })
    }

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

    /// Next piece of the message, or `None` once the message is complete.
    ///
    /// Any error moves the stream to `Failed` and purges its keys; later
    /// calls keep failing.
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

    /// Drain the rest of the message and finish the stream.
    pub fn close(mut self) -> Result<Bytes, StreamError> {
        let mut out = std::mem::take(&mut self.pending).to_vec();
        while let Some(chunk) = self.next_chunk()? {
            out.extend_from_slice(&chunk);
        }
        Ok(Bytes::from(out))
    }

    fn step(&mut self) -> Result<Option<Bytes>, StreamError> {
        match self.state {
            StreamState::AwaitingHeader if self.header.is_framed() => {
                self.state = StreamState::Body;
                Ok(self.header_bytes.take())
            }
            StreamState::AwaitingHeader => {
                let block = self.single_block()?;
                let mut out = self.header_bytes.take().map(|h| h.to_vec()).unwrap_or_default();
                out.extend_from_slice(&block);
                Ok(Some(Bytes::from(out)))
            }
            StreamState::Body => self.next_frame().map(Some),
            _ => Ok(None),
        }
    }

    fn suite(&self) -> &'static AlgorithmSuite {
        self.header.suite
    }

    /// One regular frame, or the final frame (plus trailer) at end of input.
    fn next_frame(&mut self) -> Result<Bytes, StreamError> {
        let frame_length = self.header.frame_length as usize;
        if self.buffer.len() < frame_length {
            let want = frame_length - self.buffer.len();
            read_up_to(&mut self.source, &mut self.buffer, want)?;
        }

        if self.buffer.len() >= frame_length {
            let seq = self.sequence.take_regular()?;
            let plaintext: Vec<u8> = self.buffer.drain(..frame_length).collect();
            let wire = self.seal(BodyAadContent::Frame, seq, &plaintext)?;
            trace!(sequence_number = seq, "frame sealed");
            return Ok(Bytes::from(wire));
        }

        // short read: the source is exhausted
        let seq = self.sequence.take_final()?;
        let plaintext = std::mem::take(&mut self.buffer);
        let mut wire = self.seal(BodyAadContent::FinalFrame, seq, &plaintext)?;
        self.finish(&mut wire)?;
        Ok(Bytes::from(wire))
    }

    fn single_block(&mut self) -> Result<Bytes, StreamError> {
        let mut plaintext = Vec::new();
        let n = (&mut self.source).take(self.block_limit + 1).read_to_end(&mut plaintext)? as u64;
        if n > self.block_limit {
            return Err(FrameError::SingleBlockTooLarge { len: n }.into());
        }
        let seq = self.sequence.take_final()?;
        let mut wire = self.seal(BodyAadContent::SingleBlock, seq, &plaintext)?;
        self.finish(&mut wire)?;
        Ok(Bytes::from(wire))
    }

    fn seal(&mut self, content: BodyAadContent, seq: u32, plaintext: &[u8]) -> Result<Vec<u8>, StreamError> {
        let suite = self.suite();
        let iv = frame_iv(suite.iv_len, seq)?;
        let aad = body_aad(&self.header.message_id, content, seq, plaintext.len() as u64);

        let t = Instant::now();
        let ciphertext_and_tag = self.keys.aead()?.seal(&iv, &aad, plaintext)?;
        self.timer.add_stage_time(Stage::Encrypt, t.elapsed());

        let record = FrameRecord {
            sequence_number: seq,
            content,
            iv,
            content_len: plaintext.len() as u64,
            ciphertext_and_tag,
        };
        let wire = encode_frame(&record, suite.tag_len)?;
        if let Some(signer) = self.trailer.as_mut() {
            signer.update(&wire);
        }
        self.counters.add_frame(plaintext.len(), wire.len(), record.is_final());
        Ok(wire)
    }

    /// Append the trailer (if any) to the last body unit and finalize.
    fn finish(&mut self, wire: &mut Vec<u8>) -> Result<(), StreamError> {
        if let Some(signer) = self.trailer.take() {
            let t = Instant::now();
            let trailer = signer.finish()?;
            self.timer.add_stage_time(Stage::Sign, t.elapsed());
            self.counters.add_trailer(trailer.len());
            wire.extend_from_slice(&trailer);
        }

        if let Some(declared) = self.source_length {
            if declared != self.counters.bytes_plaintext {
                warn!(declared, actual = self.counters.bytes_plaintext, "declared source length differs from input");
            }
        }

        self.state = StreamState::Finalized;
        self.keys.purge();
        self.timer.finish();
        debug!(
            frames = self.counters.frames_body + self.counters.frames_final,
            plaintext_bytes = self.counters.bytes_plaintext,
            message_bytes = self.counters.message_bytes(),
            "message encrypted"
        );
        Ok(())
    }

    fn fail(&mut self, e: &StreamError) {
        warn!(error = %e, "encrypt stream failed");
        self.state = StreamState::Failed;
        self.keys.purge();
        self.trailer = None;
        self.buffer.clear();
        self.header_bytes = None;
        self.timer.finish();
    }
}

impl<R: Read> Iterator for StreamEncryptor<R> {
    type Item = Result<Bytes, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state.is_terminal() {
            return None;
        }
        self.next_chunk().transpose()
    }
}

impl<R: Read> FusedIterator for StreamEncryptor<R> {}

impl<R: Read> Read for StreamEncryptor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut pending = std::mem::take(&mut self.pending);
        let res = read_from_chunks(&mut pending, buf, || self.next_chunk());
        self.pending = pending;
        res
    }
}
