// ## 📂 File: `src/crypto/nonce.rs`

//! nonce.rs
//! Random source capability, nonce/key generation and deterministic nonce sequences.
//!
//! Design:
//! - Randomness is injected. Nothing here owns a process-wide generator; callers pass a
//!   `RandomSource` to every function that needs entropy.
//! - `OsRandom` draws from the operating system CSPRNG. `RngSource` adapts any
//!   `rand` generator that is marked `CryptoRng`.
//! - `NonceSequence` follows a TLS-like scheme: a 12-byte base IV whose low 8 bytes are
//!   XORed with a little-endian counter. It refuses to wrap.
//!
//! Security notes:
//! - Never reuse a (key, nonce) pair. Either draw a fresh random nonce per message or
//!   run exactly one `NonceSequence` per key.
//! - Do not use all-zero bases.

use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::constants::{KEY_LEN_32, NONCE_LEN_12};
use crate::crypto::types::{CryptoError, Nonce96, NonceError};

/// Draws attempted by `NonceSequence::random` before giving up on a source that keeps
/// producing all-zero bases.
const MAX_BASE_DRAWS: usize = 8;

/// Source of cryptographically secure random bytes.
pub trait RandomSource {
    /// Fill `buf` entirely with secure random bytes.
    fn fill_secure(&mut self, buf: &mut [u8]) -> Result<(), NonceError>;
}

/// Operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_secure(&mut self, buf: &mut [u8]) -> Result<(), NonceError> {
        rand::rngs::OsRng
            .try_fill_bytes(buf)
            .map_err(|e| NonceError::Entropy(e.to_string()))
    }
}

/// Adapter for any `rand` generator that is declared cryptographically secure.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: RngCore + CryptoRng> RandomSource for RngSource<R> {
    fn fill_secure(&mut self, buf: &mut [u8]) -> Result<(), NonceError> {
        self.0
            .try_fill_bytes(buf)
            .map_err(|e| NonceError::Entropy(e.to_string()))
    }
}

/// Draw a fresh random 96-bit nonce.
pub fn generate_nonce<S: RandomSource + ?Sized>(source: &mut S) -> Result<Nonce96, CryptoError> {
    let mut nonce = [0u8; NONCE_LEN_12];
    source.fill_secure(&mut nonce)?;
    Ok(nonce)
}

/// Draw a fresh 256-bit key. The returned buffer is zeroed on drop.
pub fn generate_key<S: RandomSource + ?Sized>(
    source: &mut S,
) -> Result<Zeroizing<[u8; KEY_LEN_32]>, CryptoError> {
    let mut key = Zeroizing::new([0u8; KEY_LEN_32]);
    source.fill_secure(&mut key[..])?;
    Ok(key)
}

/// Derive the nonce at `index` from a 12-byte base.
///
/// - The first 4 bytes of `base` stay fixed.
/// - Bytes 4..12 are XORed with `index` in little-endian.
/// - Same `(base, index)` always gives the same nonce; distinct indices give distinct
///   nonces under one base.
#[inline]
pub fn derive_nonce_12(base: &Nonce96, index: u64) -> Result<Nonce96, NonceError> {
    validate_base(base)?;

    let mut nonce = *base;
    let ctr = index.to_le_bytes();
    for (n, c) in nonce[4..].iter_mut().zip(ctr.iter()) {
        *n ^= c;
    }

    Ok(nonce)
}

/// Reject all-zero bases.
#[inline]
pub fn validate_base(base: &Nonce96) -> Result<(), NonceError> {
    if base.iter().all(|&b| b == 0) {
        return Err(NonceError::InvalidBase);
    }
    Ok(())
}

/// Only 12-byte nonces are supported.
#[inline]
pub fn validate_nonce_len(nonce_len: usize) -> Result<(), NonceError> {
    if nonce_len != NONCE_LEN_12 {
        return Err(NonceError::InvalidNonceLen {
            requested: nonce_len,
            supported: NONCE_LEN_12,
        });
    }
    Ok(())
}

/// Monotonic nonce generator for one key.
///
/// Hands out `derive_nonce_12(base, 0)` through `derive_nonce_12(base, u64::MAX)` (2^64
/// nonces) and returns `NonceError::Exhausted` on every call after the last one.
#[derive(Debug, Clone)]
pub struct NonceSequence {
    base: Nonce96,
    next: Option<u64>,
}

impl NonceSequence {
    pub fn new(base: Nonce96) -> Result<Self, NonceError> {
        validate_base(&base)?;
        Ok(Self { base, next: Some(0) })
    }

    /// Continue a persisted sequence at `position`.
    pub fn resume(base: Nonce96, position: u64) -> Result<Self, NonceError> {
        validate_base(&base)?;
        Ok(Self { base, next: Some(position) })
    }

    /// Start a sequence from a random base.
    ///
    /// An all-zero draw is retried; a source that returns only zeros for
    /// `MAX_BASE_DRAWS` draws is treated as broken.
    pub fn random<S: RandomSource + ?Sized>(source: &mut S) -> Result<Self, NonceError> {
        let mut base = [0u8; NONCE_LEN_12];
        for _ in 0..MAX_BASE_DRAWS {
            source.fill_secure(&mut base)?;
            if validate_base(&base).is_ok() {
                return Ok(Self { base, next: Some(0) });
            }
        }
        Err(NonceError::Entropy("random source returned all-zero base".into()))
    }

    /// Index the next call to `next_nonce` will use.
    pub fn position(&self) -> Option<u64> {
        self.next
    }

    pub fn next_nonce(&mut self) -> Result<Nonce96, NonceError> {
        let index = self.next.ok_or(NonceError::Exhausted)?;
        let nonce = derive_nonce_12(&self.base, index)?;
        self.next = index.checked_add(1);
        Ok(nonce)
    }
}
