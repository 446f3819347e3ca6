//! constants.rs
//! Fixed sizes and limits for AES-256-GCM.

/// AES block size (bytes). GHASH operates on the same width.
pub const BLOCK_LEN: usize = 16;

/// AES-256 key length (bytes).
pub const KEY_LEN_32: usize = 32;

/// Standard 12-byte GCM nonce length.
pub const NONCE_LEN_12: usize = 12;

/// Fixed authentication tag length (bytes).
pub const TAG_LEN: usize = 16;

/// Number of AES-256 rounds.
pub const ROUNDS: usize = 14;

/// Words in an expanded AES-256 key schedule: 4 * (ROUNDS + 1).
pub const SCHEDULE_WORDS: usize = 4 * (ROUNDS + 1);

/// Counter value of the pre-counter block J0 (nonce || 0x00000001).
/// Data blocks start at `J0_COUNTER + 1`.
pub const J0_COUNTER: u32 = 1;

/// Maximum plaintext per (key, nonce): (2^32 - 2) blocks, NIST SP 800-38D.
pub const MAX_PLAINTEXT_LEN: u64 = ((1u64 << 32) - 2) * BLOCK_LEN as u64;

/// Maximum AAD length in bytes (2^64 - 1 bits, rounded down to whole bytes).
pub const MAX_AAD_LEN: u64 = (1u64 << 61) - 1;

/// Telemetry / logging target used by every module in this crate.
pub const LOG_TARGET: &str = "gcm_core";
