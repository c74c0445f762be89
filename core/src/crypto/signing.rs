// ## 📂 File: `src/crypto/signing.rs`

//! crypto/signing.rs
//! ECDSA over the running message digest.
//!
//! - The encrypting party generates a fresh key pair per message.
//! - The public key travels in the encryption context as the base64 of its
//!   compressed SEC1 point.
//! - Signatures are DER encoded and computed over the prehashed digest, so
//!   the digest can be accumulated incrementally while frames stream out.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use rand::rngs::OsRng;

use crate::crypto::types::CryptoError;
use crate::suites::SigningAlg;

/// Per-message signing key.
pub enum Signer {
    P256(p256::ecdsa::SigningKey),
    P384(p384::ecdsa::SigningKey),
}

impl Signer {
    /// Fresh random key pair for `alg`.
    pub fn generate(alg: SigningAlg) -> Self {
        match alg {
            SigningAlg::EcdsaP256Sha256 => Signer::P256(p256::ecdsa::SigningKey::random(&mut OsRng)),
            SigningAlg::EcdsaP384Sha384 => Signer::P384(p384::ecdsa::SigningKey::random(&mut OsRng)),
        }
    }

    /// Base64 compressed public point, as stored in the encryption context.
    pub fn encoded_public_key(&self) -> String {
        match self {
            Signer::P256(k) => BASE64.encode(k.verifying_key().to_encoded_point(true).as_bytes()),
            Signer::P384(k) => BASE64.encode(k.verifying_key().to_encoded_point(true).as_bytes()),
        }
    }

    /// DER signature over a finished digest.
    pub fn sign_digest(&self, digest: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            Signer::P256(k) => {
                let sig: p256::ecdsa::Signature = k
                    .sign_prehash(digest)
                    .map_err(|e| CryptoError::Failure(format!("ECDSA P-256 sign: {}", e)))?;
                Ok(sig.to_der().as_bytes().to_vec())
            }
            Signer::P384(k) => {
                let sig: p384::ecdsa::Signature = k
                    .sign_prehash(digest)
                    .map_err(|e| CryptoError::Failure(format!("ECDSA P-384 sign: {}", e)))?;
                Ok(sig.to_der().as_bytes().to_vec())
            }
        }
    }

    pub fn algorithm(&self) -> SigningAlg {
        match self {
            Signer::P256(_) => SigningAlg::EcdsaP256Sha256,
            Signer::P384(_) => SigningAlg::EcdsaP384Sha384,
        }
    }
}

/// Trailer verification key recovered from the encryption context.
pub enum Verifier {
    P256(p256::ecdsa::VerifyingKey),
    P384(p384::ecdsa::VerifyingKey),
}

impl Verifier {
    /// Parse the base64 compressed point stored in the encryption context.
    pub fn from_encoded(alg: SigningAlg, encoded: &str) -> Result<Self, CryptoError> {
        let point = BASE64
            .decode(encoded.as_bytes())
            .map_err(|e| CryptoError::InvalidPublicKey(format!("base64: {}", e)))?;
        match alg {
            SigningAlg::EcdsaP256Sha256 => p256::ecdsa::VerifyingKey::from_sec1_bytes(&point)
                .map(Verifier::P256)
                .map_err(|_| CryptoError::InvalidPublicKey("not a P-256 point".into())),
            SigningAlg::EcdsaP384Sha384 => p384::ecdsa::VerifyingKey::from_sec1_bytes(&point)
                .map(Verifier::P384)
                .map_err(|_| CryptoError::InvalidPublicKey("not a P-384 point".into())),
        }
    }

    /// Check a DER signature against a finished digest.
    pub fn verify_digest(&self, digest: &[u8], signature_der: &[u8]) -> Result<(), CryptoError> {
        match self {
            Verifier::P256(k) => {
                let sig = p256::ecdsa::Signature::from_der(signature_der)
                    .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;
                k.verify_prehash(digest, &sig).map_err(|_| CryptoError::SignatureMismatch)
            }
            Verifier::P384(k) => {
                let sig = p384::ecdsa::Signature::from_der(signature_der)
                    .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;
                k.verify_prehash(digest, &sig).map_err(|_| CryptoError::SignatureMismatch)
            }
        }
    }
}
