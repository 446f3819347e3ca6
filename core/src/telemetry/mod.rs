//! telemetry/mod.rs
//! Per-engine telemetry: counters, stage timers, and immutable snapshots.
//!
//! Notes:
//! - Each engine owns its own counters; nothing is shared between instances, so there
//!   are no locks or atomics.
//! - Counters record sizes and outcomes only. No secret, nonce or tag bytes are kept.
//! - Snapshots are serde-serialisable for export.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
