// ### `src/telemetry/counters.rs`

//! telemetry/counters.rs
//! Mutable counters updated by an engine as it seals and opens messages.
//!
//! Summary: message outcomes and byte counts. Converted into an immutable
//! `TelemetrySnapshot` on request.
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Deterministic counters collected by one engine.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub messages_sealed: u64,
    pub messages_opened: u64,
    pub auth_failures: u64,
    pub invalid_inputs: u64,
    pub bytes_plaintext: u64,
    pub bytes_ciphertext: u64,
    pub bytes_aad: u64,
    /// Counter blocks encrypted for keystream (excludes H and J0).
    pub keystream_blocks: u64,
}

impl TelemetryCounters {
    /// Record one successful encryption.
    pub fn add_seal(&mut self, aad_len: usize, pt_len: usize, keystream_blocks: u64) {
        self.messages_sealed += 1;
        self.bytes_aad += aad_len as u64;
        self.bytes_plaintext += pt_len as u64;
        self.bytes_ciphertext += pt_len as u64;
        self.keystream_blocks += keystream_blocks;
    }

    /// Record one successful decryption.
    pub fn add_open(&mut self, aad_len: usize, ct_len: usize, keystream_blocks: u64) {
        self.messages_opened += 1;
        self.bytes_aad += aad_len as u64;
        self.bytes_ciphertext += ct_len as u64;
        self.bytes_plaintext += ct_len as u64;
        self.keystream_blocks += keystream_blocks;
    }

    pub fn add_auth_failure(&mut self) {
        self.auth_failures += 1;
    }

    pub fn add_invalid_input(&mut self) {
        self.invalid_inputs += 1;
    }

    /// Messages that reached a final outcome (success or tag failure).
    pub fn total_messages(&self) -> u64 {
        self.messages_sealed + self.messages_opened + self.auth_failures
    }

    // Merging per-engine counters avoids shared state between workers.
    pub fn merge(&mut self, other: &TelemetryCounters) {
        *self += other.clone();
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.messages_sealed  += rhs.messages_sealed;
        self.messages_opened  += rhs.messages_opened;
        self.auth_failures    += rhs.auth_failures;
        self.invalid_inputs   += rhs.invalid_inputs;

        self.bytes_plaintext  += rhs.bytes_plaintext;
        self.bytes_ciphertext += rhs.bytes_ciphertext;
        self.bytes_aad        += rhs.bytes_aad;
        self.keystream_blocks += rhs.keystream_blocks;
    }
}
