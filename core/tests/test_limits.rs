// Size limits, sequence discipline and message boundaries.

mod common;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use envelope_core::constants::{
        ENCODED_SIGNER_KEY, MAX_BYTE_ARRAY_SIZE, MAX_FRAME_COUNT, MAX_FRAME_SIZE, MAX_SINGLE_BLOCK_SIZE,
    };
    use envelope_core::headers::EncryptionContext;
    use envelope_core::providers::MasterKeyProvider;
    use envelope_core::stream::{decrypt, ConfigError, DecryptorConfig, EncryptorConfig, StreamEncryptor};
    use envelope_core::suites::SuiteId;
    use envelope_core::types::StreamError;

    use crate::common::{
        craft_message, ctx, decrypt_with, encrypt_with, provider_of, raw_aes_key, raw_aes_provider, sample_plaintext,
        CraftedFrame, ScriptedKey,
    };

    const FL: u32 = 16;
    const SUITE: SuiteId = SuiteId::Aes128GcmIv12Tag16HkdfSha256;

    fn crafting_key() -> ScriptedKey {
        ScriptedKey::new("craft", 0x77)
    }

    fn crafting_provider() -> Arc<dyn MasterKeyProvider> {
        provider_of(vec![Arc::new(crafting_key())])
    }

    fn regular(seq: u32) -> CraftedFrame {
        CraftedFrame { seq, last: false, plaintext: vec![seq as u8; FL as usize] }
    }

    fn last(seq: u32, len: usize) -> CraftedFrame {
        CraftedFrame { seq, last: true, plaintext: vec![0xEE; len] }
    }

// ## 1️⃣ Configuration limits

    #[test]
    fn limits_have_their_wire_values() {
        assert_eq!(MAX_FRAME_COUNT, u32::MAX as u64);
        assert_eq!(MAX_FRAME_SIZE, (1u64 << 31) - 1);
        assert_eq!(MAX_SINGLE_BLOCK_SIZE, (1u64 << 36) - 32);
        assert_eq!(MAX_BYTE_ARRAY_SIZE, u16::MAX as u64);
    }

    #[test]
    fn frame_length_above_maximum_is_rejected() {
        let config = EncryptorConfig::new(raw_aes_provider("k", 1)).with_frame_length(MAX_FRAME_SIZE as u32 + 1);
        assert!(matches!(
            StreamEncryptor::new(&b""[..], config),
            Err(StreamError::SizeLimitExceeded(_))
        ));
    }

    #[test]
    fn declared_source_beyond_non_framed_limit_is_rejected() {
        let config = EncryptorConfig::new(raw_aes_provider("k", 1))
            .with_frame_length(0)
            .with_source_length(MAX_SINGLE_BLOCK_SIZE + 1);
        assert!(matches!(StreamEncryptor::new(&b""[..], config), Err(StreamError::SizeLimitExceeded(_))));

        let config = EncryptorConfig::new(raw_aes_provider("k", 1))
            .with_frame_length(0)
            .with_source_length(MAX_SINGLE_BLOCK_SIZE);
        assert!(StreamEncryptor::new(&b""[..], config).is_ok());
    }

    #[test]
    fn declared_source_needing_too_many_frames_is_rejected() {
        let config = EncryptorConfig::new(raw_aes_provider("k", 1)).with_frame_length(1).with_source_length(1 << 32);
        match StreamEncryptor::new(&b""[..], config) {
            Err(StreamError::SizeLimitExceeded(msg)) => assert!(msg.contains("frames")),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn reserved_context_key_is_rejected() {
        let config = EncryptorConfig::new(raw_aes_provider("k", 1))
            .with_encryption_context(ctx(&[(ENCODED_SIGNER_KEY, "forged")]));
        assert!(matches!(
            StreamEncryptor::new(&b""[..], config),
            Err(StreamError::Config(ConfigError::ReservedContextKey(_)))
        ));
    }

    #[test]
    fn zero_data_key_limit_is_rejected() {
        let config = DecryptorConfig::new(raw_aes_provider("k", 1)).with_max_encrypted_data_keys(0);
        assert!(matches!(
            decrypt(config, &b""[..]),
            Err(StreamError::Config(ConfigError::ZeroEncryptedDataKeyLimit))
        ));
    }

    #[test]
    fn data_key_count_above_limit_is_rejected() {
        let provider = provider_of(vec![raw_aes_key("a", 1), raw_aes_key("b", 2), raw_aes_key("c", 3)]);
        let (msg, _) = encrypt_with(&provider, SUITE, FL, b"three keys", EncryptionContext::new());

        let strict = DecryptorConfig::new(provider.clone()).with_max_encrypted_data_keys(2);
        assert!(matches!(decrypt(strict, &msg[..]), Err(StreamError::MalformedMessage(_))));

        let enough = DecryptorConfig::new(provider).with_max_encrypted_data_keys(3);
        assert_eq!(decrypt(enough, &msg[..]).unwrap().0, b"three keys");
    }

// ## 2️⃣ Sequence discipline

    #[test]
    fn consecutive_sequence_numbers_decrypt() {
        let msg = craft_message(&crafting_key(), SUITE, FL, &[regular(1), regular(2), last(3, 5)]);
        let (pt, _) = decrypt_with(&crafting_provider(), &msg).unwrap();
        let mut expected = vec![1u8; 16];
        expected.extend_from_slice(&[2u8; 16]);
        expected.extend_from_slice(&[0xEE; 5]);
        assert_eq!(pt, expected);
    }

    #[test]
    fn gap_in_sequence_is_malformed() {
        let msg = craft_message(&crafting_key(), SUITE, FL, &[regular(1), regular(2), last(4, 5)]);
        assert!(matches!(decrypt_with(&crafting_provider(), &msg), Err(StreamError::MalformedMessage(_))));
    }

    #[test]
    fn repeated_sequence_number_is_malformed() {
        let msg = craft_message(&crafting_key(), SUITE, FL, &[regular(1), regular(1), last(2, 5)]);
        assert!(matches!(decrypt_with(&crafting_provider(), &msg), Err(StreamError::MalformedMessage(_))));
    }

    #[test]
    fn sequence_starting_at_zero_is_malformed() {
        let msg = craft_message(&crafting_key(), SUITE, FL, &[regular(0), last(1, 0)]);
        assert!(matches!(decrypt_with(&crafting_provider(), &msg), Err(StreamError::MalformedMessage(_))));
    }

    #[test]
    fn final_frame_longer_than_frame_length_is_malformed() {
        let msg = craft_message(&crafting_key(), SUITE, FL, &[regular(1), last(2, FL as usize + 1)]);
        assert!(matches!(decrypt_with(&crafting_provider(), &msg), Err(StreamError::MalformedMessage(_))));
    }

    #[test]
    fn final_frame_of_exactly_frame_length_is_accepted() {
        let msg = craft_message(&crafting_key(), SUITE, FL, &[last(1, FL as usize)]);
        assert_eq!(decrypt_with(&crafting_provider(), &msg).unwrap().0, vec![0xEE; FL as usize]);
    }

    #[test]
    fn missing_final_frame_is_malformed() {
        let msg = craft_message(&crafting_key(), SUITE, FL, &[regular(1), regular(2)]);
        assert!(matches!(decrypt_with(&crafting_provider(), &msg), Err(StreamError::MalformedMessage(_))));
    }

// ## 3️⃣ Message boundaries

    #[test]
    fn trailing_bytes_are_malformed() {
        for suite in [SUITE, SuiteId::Aes256GcmIv12Tag16HkdfSha384EcdsaP384] {
            let provider = raw_aes_provider("k", 1);
            let (mut msg, _) = encrypt_with(&provider, suite, FL, &sample_plaintext(40), EncryptionContext::new());
            msg.push(0);
            assert!(
                matches!(decrypt_with(&provider, &msg), Err(StreamError::MalformedMessage(_))),
                "suite {:?}",
                suite
            );
        }
    }

    #[test]
    fn trailing_bytes_after_non_framed_body_are_malformed() {
        let provider = raw_aes_provider("k", 1);
        let (mut msg, _) = encrypt_with(&provider, SUITE, 0, &sample_plaintext(40), EncryptionContext::new());
        msg.extend_from_slice(b"junk");
        assert!(matches!(decrypt_with(&provider, &msg), Err(StreamError::MalformedMessage(_))));
    }

    #[test]
    fn every_truncation_is_malformed() {
        let provider = raw_aes_provider("k", 1);
        let (msg, _) = encrypt_with(&provider, SUITE, FL, &sample_plaintext(40), EncryptionContext::new());
        for cut in 0..msg.len() {
            assert!(
                matches!(decrypt_with(&provider, &msg[..cut]), Err(StreamError::MalformedMessage(_))),
                "truncated at {}",
                cut
            );
        }
    }

    #[test]
    fn truncated_signed_message_is_malformed() {
        let provider = raw_aes_provider("k", 1);
        let (msg, _) = encrypt_with(&provider, SuiteId::default(), FL, &sample_plaintext(40), EncryptionContext::new());
        for cut in [1, 30, msg.len() / 2, msg.len() - 1] {
            assert!(matches!(decrypt_with(&provider, &msg[..cut]), Err(StreamError::MalformedMessage(_))));
        }
    }
}
