//! suites/mod.rs
//! Algorithm suite registry.
//!
//! A suite bundles the content cipher, the key-derivation function and the
//! optional trailer signature scheme under one 2-byte id written in every
//! header. The table is static; lookups never allocate.

pub mod types;
pub mod registry;

pub use types::*;
pub use registry::*;
