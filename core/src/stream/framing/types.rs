use std::io;

use crate::constants::MAX_FRAME_COUNT;
use crate::crypto::BodyAadContent;

/// One sealed body unit: a regular frame, the final frame, or the single
/// NonFramed block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRecord {
    pub sequence_number: u32,
    pub content: BodyAadContent,
    pub iv: Vec<u8>,
    /// Plaintext length of this unit (frame_length for regular frames).
    pub content_len: u64,
    /// `ciphertext || tag`.
    pub ciphertext_and_tag: Vec<u8>,
}

impl FrameRecord {
    #[inline]
    pub fn is_final(&self) -> bool {
        !matches!(self.content, BodyAadContent::Frame)
    }
}

/// Hands out body sequence numbers, starting at 1.
///
/// Regular frames stop one short of `MAX_FRAME_COUNT` so the last number is
/// always left for the final frame; `0xFFFF_FFFF` as a regular frame would
/// collide with the final-frame marker.
#[derive(Debug, Clone)]
pub(crate) struct SequenceCounter {
    next: u64,
}

impl SequenceCounter {
    pub(crate) fn new() -> Self {
        Self { next: 1 }
    }

    #[cfg(test)]
    fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub(crate) fn take_regular(&mut self) -> Result<u32, FrameError> {
        if self.next >= MAX_FRAME_COUNT {
            return Err(FrameError::FrameCountExceeded);
        }
        let n = self.next as u32;
        self.next += 1;
        Ok(n)
    }

    pub(crate) fn take_final(&mut self) -> Result<u32, FrameError> {
        if self.next > MAX_FRAME_COUNT {
            return Err(FrameError::FrameCountExceeded);
        }
        let n = self.next as u32;
        self.next += 1;
        Ok(n)
    }

    /// Decrypt side: the next unit must carry exactly the next number.
    pub(crate) fn check(&mut self, actual: u32, is_final: bool) -> Result<(), FrameError> {
        let expected = if is_final { self.take_final()? } else { self.take_regular()? };
        if actual != expected {
            return Err(FrameError::SequenceMismatch { expected, actual });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("frame sequence number {actual}, expected {expected}")]
    SequenceMismatch { expected: u32, actual: u32 },

    #[error("frame {sequence_number} carries an unexpected IV")]
    IvMismatch { sequence_number: u32 },

    #[error("final frame content length {content_len} exceeds frame length {frame_length}")]
    FinalFrameTooLong { content_len: u32, frame_length: u32 },

    #[error("{0} bytes of ciphertext do not match the declared content length")]
    LengthMismatch(usize),

    #[error("bytes follow the end of the message")]
    TrailingBytes,

    #[error("frame count limit reached")]
    FrameCountExceeded,

    #[error("single block of {len} bytes exceeds the NonFramed limit")]
    SingleBlockTooLarge { len: u64 },

    #[error("frame I/O: {0}")]
    Io(#[from] io::Error),
}
