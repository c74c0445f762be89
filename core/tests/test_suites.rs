// Registry drift and lookup behavior for the nine message suites.

#[cfg(test)]
mod tests {
    use envelope_core::constants::{suite_ids, DEFAULT_SUITE_ID};
    use envelope_core::suites::{
        all_suites, resolve, EncryptionAlg, HashAlg, KdfAlg, SigningAlg, SuiteError, SuiteId,
    };

// ## 1️⃣ Registry contents

    #[test]
    fn every_typed_id_resolves_to_itself() {
        for id in SuiteId::ALL {
            let suite = resolve(id.as_u16()).unwrap();
            assert_eq!(suite.id, id);
            assert!(std::ptr::eq(suite, id.suite()));
        }
        assert_eq!(all_suites().len(), SuiteId::ALL.len());
    }

    #[test]
    fn fixed_gcm_parameters() {
        for suite in all_suites() {
            assert_eq!(suite.iv_len, 12);
            assert_eq!(suite.tag_len, 16);
            assert_eq!(suite.header_auth_len(), 28);
        }
    }

    #[test]
    fn key_lengths_follow_cipher() {
        for suite in all_suites() {
            let expected = match suite.encryption {
                EncryptionAlg::Aes128Gcm => 16,
                EncryptionAlg::Aes192Gcm => 24,
                EncryptionAlg::Aes256Gcm => 32,
            };
            assert_eq!(suite.data_key_len, expected, "{}", suite.id);
        }
    }

    #[test]
    fn signing_suites_carry_matching_hash() {
        let p256 = SuiteId::Aes128GcmIv12Tag16HkdfSha256EcdsaP256.suite();
        assert_eq!(p256.signing, Some(SigningAlg::EcdsaP256Sha256));
        assert_eq!(p256.kdf, KdfAlg::HkdfSha256);
        assert_eq!(p256.hash, Some(HashAlg::Sha256));

        let p384 = SuiteId::Aes256GcmIv12Tag16HkdfSha384EcdsaP384.suite();
        assert_eq!(p384.signing, Some(SigningAlg::EcdsaP384Sha384));
        assert_eq!(p384.kdf, KdfAlg::HkdfSha384);

        let plain = SuiteId::Aes128GcmIv12Tag16.suite();
        assert!(!plain.is_signing());
        assert_eq!(plain.kdf, KdfAlg::Identity);
    }

    #[test]
    fn wire_ids_are_stable() {
        assert_eq!(SuiteId::Aes128GcmIv12Tag16.as_u16(), 0x0014);
        assert_eq!(SuiteId::Aes192GcmIv12Tag16HkdfSha384EcdsaP384.as_u16(), 0x0346);
        assert_eq!(SuiteId::Aes256GcmIv12Tag16HkdfSha384EcdsaP384.as_u16(), suite_ids::AES_256_GCM_IV12_TAG16_HKDF_SHA384_ECDSA_P384);
    }

// ## 2️⃣ Lookup failures

    #[test]
    fn unknown_id_is_unsupported() {
        let err = resolve(0x0578).unwrap_err();
        assert!(matches!(err, SuiteError::Unsupported { raw: 0x0578 }));
        assert!(err.to_string().contains("0x578"));
    }

    #[test]
    fn zero_id_is_unsupported() {
        assert!(resolve(0).is_err());
    }

// ## 3️⃣ Names and defaults

    #[test]
    fn names_parse_case_insensitively() {
        for id in SuiteId::ALL {
            assert_eq!(id.name().parse::<SuiteId>().unwrap(), id);
            assert_eq!(id.name().to_lowercase().parse::<SuiteId>().unwrap(), id);
        }
        assert!(matches!("AES_512".parse::<SuiteId>(), Err(SuiteError::UnknownName(_))));
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&SuiteId::Aes128GcmIv12Tag16HkdfSha256).unwrap();
        assert_eq!(json, "\"AES_128_GCM_IV12_TAG16_HKDF_SHA256\"");
        let back: SuiteId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SuiteId::Aes128GcmIv12Tag16HkdfSha256);
    }

    #[test]
    fn default_is_p384_signing_suite() {
        assert_eq!(SuiteId::default().as_u16(), DEFAULT_SUITE_ID);
        assert!(SuiteId::default().suite().is_signing());
    }
}
