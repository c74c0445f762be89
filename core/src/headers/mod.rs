// ## src/headers/mod.rs

//! headers/mod.rs
//! Message header codec.
//!
//! - Variable-length, big-endian, self-describing header.
//! - Suite id selects every algorithm used by the message.
//! - The encryption context and the wrapped data keys are bound into the
//!   header auth tag; nothing in the header is trusted until that tag verifies.

pub mod types;
pub mod context;
pub mod encode;
pub mod decode;
pub mod auth;

pub use types::*;
pub use context::{deserialize_context, serialize_context};
pub use encode::*;
pub use decode::*;
pub use auth::*;
