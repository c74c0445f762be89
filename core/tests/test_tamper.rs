// Any modification of a message must be rejected, with the failure
// attributed to the part that was touched.

mod common;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use envelope_core::headers::EncryptionContext;
    use envelope_core::providers::MasterKeyProvider;
    use envelope_core::suites::SuiteId;
    use envelope_core::types::StreamError;

    use crate::common::{ctx, decrypt_with, encrypt_with, header_len, provider_of, raw_aes_provider, sample_plaintext, ScriptedKey};

    const FL: u32 = 64;
    const FRAME_WIRE: usize = 4 + 12 + FL as usize + 16;

    /// Context-agnostic key, so header edits reach the header auth check.
    fn scripted_provider() -> Arc<dyn MasterKeyProvider> {
        provider_of(vec![Arc::new(ScriptedKey::new("s", 0x6C))])
    }

    /// A tampered message must fail a tag or signature check, or be
    /// rejected structurally. A touched key record may also leave no
    /// unwrappable data key.
    fn assert_rejected(res: Result<(Vec<u8>, envelope_core::headers::MessageHeader), StreamError>, at: usize) {
        match res {
            Ok(_) => panic!("flip at byte {} accepted", at),
            Err(e) => assert!(
                e.is_authentication_failure()
                    || matches!(
                        e,
                        StreamError::MalformedMessage(_)
                            | StreamError::UnsupportedSuite(_)
                            | StreamError::SizeLimitExceeded(_)
                            | StreamError::MasterKeyProvider(_)
                    ),
                "flip at byte {} gave {:?}",
                at,
                e
            ),
        }
    }

// ## 1️⃣ Exhaustive single-byte flips

    #[test]
    fn every_flipped_byte_is_rejected_unsigned() {
        let provider = raw_aes_provider("k", 3);
        let pt = sample_plaintext(150);
        let (msg, _) = encrypt_with(&provider, SuiteId::Aes128GcmIv12Tag16HkdfSha256, FL, &pt, ctx(&[("a", "b")]));
        for i in 0..msg.len() {
            let mut bad = msg.clone();
            bad[i] ^= 0x01;
            assert_rejected(decrypt_with(&provider, &bad), i);
        }
    }

    #[test]
    fn flipped_bytes_are_rejected_signed() {
        let provider = scripted_provider();
        let pt = sample_plaintext(100);
        let (msg, _) = encrypt_with(&provider, SuiteId::Aes128GcmIv12Tag16HkdfSha256EcdsaP256, FL, &pt, EncryptionContext::new());
        for i in (0..msg.len()).step_by(7).chain(msg.len() - 4..msg.len()) {
            let mut bad = msg.clone();
            bad[i] ^= 0x80;
            assert_rejected(decrypt_with(&provider, &bad), i);
        }
    }

// ## 2️⃣ Attribution

    #[test]
    fn edited_context_fails_header_authentication() {
        let provider = scripted_provider();
        let (mut msg, _) =
            encrypt_with(&provider, SuiteId::Aes256GcmIv12Tag16HkdfSha256, FL, b"payload", ctx(&[("purpose", "test")]));
        // version, type, suite, message id, aad_len, count, key_len, "purpose", val_len
        let value_at = 1 + 1 + 2 + 16 + 2 + 2 + 2 + 7 + 2;
        assert_eq!(&msg[value_at..value_at + 4], b"test");
        msg[value_at] = b'b';
        let err = decrypt_with(&provider, &msg).unwrap_err();
        assert!(matches!(err, StreamError::HeaderAuthentication));
        assert!(err.is_authentication_failure());
    }

    #[test]
    fn edited_context_under_raw_aes_fails_unwrap() {
        let provider = raw_aes_provider("k", 3);
        let (mut msg, _) =
            encrypt_with(&provider, SuiteId::Aes256GcmIv12Tag16HkdfSha256, FL, b"payload", ctx(&[("purpose", "test")]));
        let value_at = 1 + 1 + 2 + 16 + 2 + 2 + 2 + 7 + 2;
        msg[value_at] = b'b';
        assert!(matches!(decrypt_with(&provider, &msg), Err(StreamError::MasterKeyProvider(_))));
    }

    #[test]
    fn header_tag_flip_fails_header_authentication() {
        let provider = scripted_provider();
        let (mut msg, header) = encrypt_with(&provider, SuiteId::Aes128GcmIv12Tag16, FL, b"payload", EncryptionContext::new());
        let hl = header_len(&header);
        msg[hl - 1] ^= 0x01;
        assert!(matches!(decrypt_with(&provider, &msg), Err(StreamError::HeaderAuthentication)));
    }

    #[test]
    fn body_flip_names_the_frame() {
        let provider = scripted_provider();
        let pt = sample_plaintext(200);
        let (msg, header) = encrypt_with(&provider, SuiteId::Aes128GcmIv12Tag16, FL, &pt, EncryptionContext::new());
        let hl = header_len(&header);

        let mut bad = msg.clone();
        bad[hl + FRAME_WIRE + 4 + 12 + 5] ^= 0x01;
        assert!(matches!(
            decrypt_with(&provider, &bad),
            Err(StreamError::CiphertextAuthentication { sequence_number: 2 })
        ));

        // last byte is the final frame's tag
        let mut bad = msg.clone();
        let n = bad.len();
        bad[n - 1] ^= 0x01;
        assert!(matches!(
            decrypt_with(&provider, &bad),
            Err(StreamError::CiphertextAuthentication { sequence_number: 4 })
        ));
    }

    #[test]
    fn reordered_frames_are_malformed() {
        let provider = scripted_provider();
        let pt = sample_plaintext(200);
        let (msg, header) = encrypt_with(&provider, SuiteId::Aes128GcmIv12Tag16, FL, &pt, EncryptionContext::new());
        let hl = header_len(&header);

        let mut swapped = msg[..hl].to_vec();
        swapped.extend_from_slice(&msg[hl + FRAME_WIRE..hl + 2 * FRAME_WIRE]);
        swapped.extend_from_slice(&msg[hl..hl + FRAME_WIRE]);
        swapped.extend_from_slice(&msg[hl + 2 * FRAME_WIRE..]);
        assert_eq!(swapped.len(), msg.len());
        assert!(matches!(decrypt_with(&provider, &swapped), Err(StreamError::MalformedMessage(_))));
    }

    #[test]
    fn dropped_frame_is_malformed() {
        let provider = scripted_provider();
        let pt = sample_plaintext(200);
        let (msg, header) = encrypt_with(&provider, SuiteId::Aes128GcmIv12Tag16, FL, &pt, EncryptionContext::new());
        let hl = header_len(&header);

        let mut dropped = msg[..hl + FRAME_WIRE].to_vec();
        dropped.extend_from_slice(&msg[hl + 2 * FRAME_WIRE..]);
        assert!(matches!(decrypt_with(&provider, &dropped), Err(StreamError::MalformedMessage(_))));
    }

    #[test]
    fn frames_do_not_move_between_messages() {
        let provider = scripted_provider();
        let pt = sample_plaintext(200);
        let (a, header) = encrypt_with(&provider, SuiteId::Aes128GcmIv12Tag16, FL, &pt, EncryptionContext::new());
        let (b, _) = encrypt_with(&provider, SuiteId::Aes128GcmIv12Tag16, FL, &pt, EncryptionContext::new());
        let hl = header_len(&header);

        // same key and sequence number, different message id
        let mut spliced = a[..hl].to_vec();
        spliced.extend_from_slice(&b[hl..hl + FRAME_WIRE]);
        spliced.extend_from_slice(&a[hl + FRAME_WIRE..]);
        assert!(matches!(
            decrypt_with(&provider, &spliced),
            Err(StreamError::CiphertextAuthentication { sequence_number: 1 })
        ));
    }

    #[test]
    fn stripped_trailer_is_malformed() {
        let provider = scripted_provider();
        let (msg, header) =
            encrypt_with(&provider, SuiteId::Aes256GcmIv12Tag16HkdfSha384EcdsaP384, FL, b"payload", EncryptionContext::new());
        // header, then a lone final frame carrying 7 bytes
        let body_end = header_len(&header) + 4 + 4 + 12 + 4 + 7 + 16;
        assert!(msg.len() > body_end);
        assert!(matches!(decrypt_with(&provider, &msg[..body_end]), Err(StreamError::MalformedMessage(_))));

        // a partial trailer is just as truncated
        assert!(matches!(decrypt_with(&provider, &msg[..body_end + 5]), Err(StreamError::MalformedMessage(_))));
    }
}
