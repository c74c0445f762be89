//! stream/mod.rs
//! Message body processing and the public streaming interface.
//!
//! - `framing`: body unit codec and sequence numbering
//! - `trailer`: running digest and ECDSA trailer
//! - `encryptor` / `decryptor`: pull-based state machines
//! - `core`: one-shot `encrypt` / `decrypt` and mode-selected `stream`

pub mod config;
pub mod core;
pub mod decryptor;
pub mod encryptor;
pub mod framing;
pub mod io;
pub mod state;
pub mod trailer;

pub use config::{ConfigError, DecryptorConfig, EncryptOptions, EncryptorConfig, StreamMode};
pub use self::core::{decrypt, encrypt, stream, MessageStream};
pub use decryptor::StreamDecryptor;
pub use encryptor::StreamEncryptor;
pub use framing::{FrameError, FrameRecord};
pub use io::{open_input, InputSource};
pub use state::StreamState;
pub use trailer::{TrailerSigner, TrailerVerifier};
