//! telemetry/mod.rs
//! Per-stream counters, stage timers and immutable snapshots.
//!
//! Each stream owns its own counters and timer; `telemetry()` turns them
//! into a `TelemetrySnapshot` that can be exported as JSON. Nothing here is
//! shared across streams and nothing here ever sees key material.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
