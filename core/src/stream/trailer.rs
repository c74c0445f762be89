// ## 📂 File: `src/stream/trailer.rs`

//! Message trailer: `sig_len u16 | DER signature`, present only for signing
//! suites. The signature covers every byte of the message before it: header,
//! header auth section and all body units, in wire order.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use tracing::warn;

use crate::constants::ENCODED_SIGNER_KEY;
use crate::crypto::{CryptoError, DigestState, Signer, Verifier};
use crate::headers::MessageHeader;
use crate::suites::{AlgorithmSuite, SigningAlg};
use crate::types::StreamError;
use crate::utils::read_vec;

/// Encrypt side: fresh key pair plus the running digest.
pub struct TrailerSigner {
    digest: DigestState,
    signer: Signer,
}

impl TrailerSigner {
    pub fn new(alg: SigningAlg) -> Self {
        Self { digest: DigestState::new(alg.hash()), signer: Signer::generate(alg) }
    }

    /// `None` for suites without a trailer.
    pub fn for_suite(suite: &AlgorithmSuite) -> Option<Self> {
        suite.signing.map(Self::new)
    }

    pub fn encoded_public_key(&self) -> String {
        self.signer.encoded_public_key()
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.digest.update(bytes);
    }

    /// Sign the digest and return the encoded trailer.
    pub fn finish(self) -> Result<Vec<u8>, StreamError> {
        let signature = self.signer.sign_digest(&self.digest.finalize())?;
        let sig_len = u16::try_from(signature.len())
            .map_err(|_| CryptoError::Failure(format!("signature of {} bytes", signature.len())))?;
        let mut out = Vec::with_capacity(2 + signature.len());
        out.write_u16::<BigEndian>(sig_len)?;
        out.extend_from_slice(&signature);
        Ok(out)
    }
}

/// Decrypt side: verification key from the header plus the running digest.
pub struct TrailerVerifier {
    digest: DigestState,
    verifier: Verifier,
}

impl std::fmt::Debug for TrailerVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrailerVerifier").finish_non_exhaustive()
    }
}

impl TrailerVerifier {
    /// Verifier for an authenticated header, or `None` when its suite does not sign.
    ///
    /// A signing suite whose context lacks a usable public key is malformed.
    pub fn for_header(header: &MessageHeader) -> Result<Option<Self>, StreamError> {
        let Some(alg) = header.suite.signing else {
            return Ok(None);
        };
        let encoded = header.encryption_context.get(ENCODED_SIGNER_KEY).ok_or_else(|| {
            StreamError::MalformedMessage(format!("signing suite without `{}` in context", ENCODED_SIGNER_KEY))
        })?;
        let verifier = Verifier::from_encoded(alg, encoded)
            .map_err(|e| StreamError::MalformedMessage(e.to_string()))?;
        Ok(Some(Self { digest: DigestState::new(alg.hash()), verifier }))
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.digest.update(bytes);
    }

    /// Read the trailer from `r` and check it against the digest.
    ///
    /// Returns the number of trailer bytes consumed.
    pub fn verify<R: Read>(self, r: &mut R) -> Result<usize, StreamError> {
        let sig_len = r.read_u16::<BigEndian>()? as usize;
        let signature = read_vec(r, sig_len)?;
        let digest = self.digest.finalize();
        match self.verifier.verify_digest(&digest, &signature) {
            Ok(()) => Ok(2 + sig_len),
            Err(CryptoError::SignatureMismatch) | Err(CryptoError::MalformedSignature(_)) => {
                warn!(sig_len, "trailer signature rejected");
                Err(StreamError::SignatureVerification)
            }
            Err(e) => Err(e.into()),
        }
    }
}
