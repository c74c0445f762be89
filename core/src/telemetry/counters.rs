// ### `src/telemetry/counters.rs`

//! telemetry/counters.rs
//! Mutable counters updated as a message is produced or consumed.
//! Converted into an immutable `TelemetrySnapshot` on request.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    /// Header plus header auth section.
    pub bytes_header: u64,
    pub encrypted_data_keys: u64,
    /// Regular frames.
    pub frames_body: u64,
    /// Final frames and NonFramed single blocks.
    pub frames_final: u64,
    pub bytes_plaintext: u64,
    /// Encoded body units, including their sequence numbers, IVs and tags.
    pub bytes_ciphertext: u64,
    pub bytes_trailer: u64,
}

impl TelemetryCounters {
    pub fn add_header(&mut self, header_len: usize, edk_count: usize) {
        self.bytes_header += header_len as u64;
        self.encrypted_data_keys += edk_count as u64;
    }

    /// Record one body unit.
    ///
    /// - `pt_len`: plaintext carried by the unit
    /// - `wire_len`: encoded length of the unit
    pub fn add_frame(&mut self, pt_len: usize, wire_len: usize, is_final: bool) {
        if is_final {
            self.frames_final += 1;
        } else {
            self.frames_body += 1;
        }
        self.bytes_plaintext += pt_len as u64;
        self.bytes_ciphertext += wire_len as u64;
    }

    pub fn add_trailer(&mut self, trailer_len: usize) {
        self.bytes_trailer += trailer_len as u64;
    }

    /// Total message length on the wire.
    pub fn message_bytes(&self) -> u64 {
        self.bytes_header + self.bytes_ciphertext + self.bytes_trailer
    }

    /// Bytes on the wire that are not ciphertext of the plaintext itself.
    pub fn overhead_bytes(&self) -> u64 {
        self.message_bytes().saturating_sub(self.bytes_plaintext)
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        *self += other.clone();
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.bytes_header        += rhs.bytes_header;
        self.encrypted_data_keys += rhs.encrypted_data_keys;
        self.frames_body         += rhs.frames_body;
        self.frames_final        += rhs.frames_final;
        self.bytes_plaintext     += rhs.bytes_plaintext;
        self.bytes_ciphertext    += rhs.bytes_ciphertext;
        self.bytes_trailer       += rhs.bytes_trailer;
    }
}
