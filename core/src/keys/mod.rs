//! keys/mod.rs
//! Envelope key manager: data key custody and content-key derivation.

pub mod manager;

pub use manager::KeyManager;
