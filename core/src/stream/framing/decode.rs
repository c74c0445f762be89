use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::constants::{MAX_SINGLE_BLOCK_SIZE, SEQUENCE_NUMBER_END};
use crate::crypto::BodyAadContent;
use crate::stream::framing::types::{FrameError, FrameRecord};
use crate::suites::AlgorithmSuite;
use crate::utils::read_vec;

/// Read the next frame of a Framed body.
///
/// A leading `0xFFFFFFFF` marks the final frame, whose content length must
/// not exceed `frame_length`. Sequence and IV checks are left to the caller,
/// which knows what it expects next.
pub fn read_frame<R: Read>(
    r: &mut R,
    suite: &AlgorithmSuite,
    frame_length: u32,
) -> Result<FrameRecord, FrameError> {
    let first = r.read_u32::<BigEndian>()?;

    if first == SEQUENCE_NUMBER_END {
        let sequence_number = r.read_u32::<BigEndian>()?;
        let iv = read_vec(r, suite.iv_len)?;
        let content_len = r.read_u32::<BigEndian>()?;
        if content_len > frame_length {
            return Err(FrameError::FinalFrameTooLong { content_len, frame_length });
        }
        let ciphertext_and_tag = read_vec(r, content_len as usize + suite.tag_len)?;
        return Ok(FrameRecord {
            sequence_number,
            content: BodyAadContent::FinalFrame,
            iv,
            content_len: content_len as u64,
            ciphertext_and_tag,
        });
    }

    let iv = read_vec(r, suite.iv_len)?;
    let ciphertext_and_tag = read_vec(r, frame_length as usize + suite.tag_len)?;
    Ok(FrameRecord {
        sequence_number: first,
        content: BodyAadContent::Frame,
        iv,
        content_len: frame_length as u64,
        ciphertext_and_tag,
    })
}

/// Read the single block of a NonFramed body. Its sequence number is always 1.
pub fn read_single_block<R: Read>(r: &mut R, suite: &AlgorithmSuite) -> Result<FrameRecord, FrameError> {
    let iv = read_vec(r, suite.iv_len)?;
    let content_len = r.read_u64::<BigEndian>()?;
    if content_len > MAX_SINGLE_BLOCK_SIZE {
        return Err(FrameError::SingleBlockTooLarge { len: content_len });
    }
    let body_len = usize::try_from(content_len)
        .map_err(|_| FrameError::SingleBlockTooLarge { len: content_len })?;
    let ciphertext_and_tag = read_vec(r, body_len + suite.tag_len)?;
    Ok(FrameRecord {
        sequence_number: 1,
        content: BodyAadContent::SingleBlock,
        iv,
        content_len,
        ciphertext_and_tag,
    })
}
