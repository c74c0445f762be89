// ## 📂 File: `src/crypto/aad.rs`

use crate::crypto::types::BodyAadContent;

/// Body AAD:
///
/// ```text
/// message_id (16) | content string | seq (u32 BE) | content_len (u64 BE)
/// ```
///
/// `content_len` is the plaintext length of the sealed unit.
#[inline]
pub fn body_aad(
    message_id: &[u8],
    content: BodyAadContent,
    sequence_number: u32,
    content_len: u64,
) -> Vec<u8> {
    let content = content.as_bytes();
    let mut out = Vec::with_capacity(message_id.len() + content.len() + 12);
    out.extend_from_slice(message_id);
    out.extend_from_slice(content);
    out.extend_from_slice(&sequence_number.to_be_bytes());
    out.extend_from_slice(&content_len.to_be_bytes());
    out
}
