//! gcm-core
//!
//! Pure Rust AES-256-GCM with constant-time memory helpers.
//! No FFI, no hardware intrinsics, no global state.
//!
//! Layers, leaf first:
//! - `crypto::block` : AES-256 key expansion and block permutation
//! - `crypto::gf128` : GF(2^128) multiply and GHASH accumulator
//! - `crypto::aead`  : the AEAD engine (`AesGcm256`)
//! - `crypto::memory`: `secure_zero`, `constant_time_equal`
//!
//! Randomness is never generated implicitly; pass a `crypto::RandomSource`.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod config;

pub mod crypto;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::EnginePolicy;
    pub use crate::crypto::{
        constant_time_equal, decrypt, encrypt, generate_key, generate_nonce, secure_zero,
        AesGcm256, CryptoError, EngineState, InputError, NonceSequence, OsRandom, RandomSource,
        Tag,
    };
}
