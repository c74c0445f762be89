use sha2::{Digest as _, Sha256, Sha384};

use crate::suites::HashAlg;

/// Running hash over every header and body byte of a message.
#[derive(Clone)]
pub enum DigestState {
    Sha256(Sha256),
    Sha384(Sha384),
}

impl DigestState {
    #[inline]
    pub fn new(alg: HashAlg) -> Self {
        match alg {
            HashAlg::Sha256 => DigestState::Sha256(Sha256::new()),
            HashAlg::Sha384 => DigestState::Sha384(Sha384::new()),
        }
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        match self {
            DigestState::Sha256(h) => h.update(data),
            DigestState::Sha384(h) => h.update(data),
        }
    }

    #[inline]
    pub fn finalize(self) -> Vec<u8> {
        match self {
            DigestState::Sha256(h) => h.finalize().to_vec(),
            DigestState::Sha384(h) => h.finalize().to_vec(),
        }
    }

    pub fn output_len(&self) -> usize {
        match self {
            DigestState::Sha256(_) => 32,
            DigestState::Sha384(_) => 48,
        }
    }
}
