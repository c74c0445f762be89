use byteorder::{BigEndian, WriteBytesExt};

use crate::constants::SEQUENCE_NUMBER_END;
use crate::crypto::BodyAadContent;
use crate::stream::framing::types::{FrameError, FrameRecord};

/// Encode one body record.
///
/// Layouts:
///
/// ```text
/// regular:  [ seq u32 ][ iv ][ ciphertext (frame_length) ][ tag ]
/// final:    [ 0xFFFFFFFF ][ seq u32 ][ iv ][ content_len u32 ][ ciphertext ][ tag ]
/// single:   [ iv ][ content_len u64 ][ ciphertext ][ tag ]
/// ```
pub fn encode_frame(record: &FrameRecord, tag_len: usize) -> Result<Vec<u8>, FrameError> {
    let ct_len = record.ciphertext_and_tag.len();
    if ct_len as u64 != record.content_len + tag_len as u64 {
        return Err(FrameError::LengthMismatch(ct_len));
    }

    let mut out = Vec::with_capacity(16 + record.iv.len() + ct_len);
    match record.content {
        BodyAadContent::Frame => {
            out.write_u32::<BigEndian>(record.sequence_number)?;
            out.extend_from_slice(&record.iv);
        }
        BodyAadContent::FinalFrame => {
            let content_len = u32::try_from(record.content_len)
                .map_err(|_| FrameError::LengthMismatch(ct_len))?;
            out.write_u32::<BigEndian>(SEQUENCE_NUMBER_END)?;
            out.write_u32::<BigEndian>(record.sequence_number)?;
            out.extend_from_slice(&record.iv);
            out.write_u32::<BigEndian>(content_len)?;
        }
        BodyAadContent::SingleBlock => {
            out.extend_from_slice(&record.iv);
            out.write_u64::<BigEndian>(record.content_len)?;
        }
    }
    out.extend_from_slice(&record.ciphertext_and_tag);
    Ok(out)
}
