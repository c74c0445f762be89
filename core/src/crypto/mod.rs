//! crypto/mod.rs
//! Primitive layer: AES-GCM, HKDF content keys, body IVs and AAD, the
//! running message digest and ECDSA trailer signatures.

pub mod types;
pub mod aad;
pub mod aead;
pub mod kdf;
pub mod nonce;
pub mod digest;
pub mod signing;

pub use types::*;
pub use aad::*;
pub use aead::*;
pub use kdf::*;
pub use nonce::*;
pub use digest::*;
pub use signing::*;
