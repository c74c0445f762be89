//! Body framing.
//!
//! Responsibilities:
//! - Define body records (regular frame, final frame, single block)
//! - Encode records into the big-endian wire layout
//! - Decode records from a reader with strict length checks
//! - Hand out and check sequence numbers
//!
//! Non-responsibilities:
//! - Cryptography
//! - Trailer digests

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{FrameError, FrameRecord};
pub(crate) use types::SequenceCounter;
pub use encode::encode_frame;
pub use decode::{read_frame, read_single_block};
