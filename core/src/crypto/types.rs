// ## 📂 File: `src/crypto/types.rs`

use std::fmt;
use thiserror::Error;

use crate::constants::TAG_LEN;

pub use crate::constants::{BLOCK_LEN, KEY_LEN_32, NONCE_LEN_12};

/// One 128-bit block (AES state, counter block, GHASH element).
pub type Block = [u8; BLOCK_LEN];

/// 256-bit key as accepted by the engine.
pub type Key256 = [u8; KEY_LEN_32];

/// 96-bit nonce.
pub type Nonce96 = [u8; NONCE_LEN_12];

pub type Result<T> = std::result::Result<T, CryptoError>;

/// 128-bit authentication tag.
///
/// Equality is constant-time; the tag is public so `Debug` prints it in hex.
#[derive(Clone, Copy)]
pub struct Tag(pub [u8; TAG_LEN]);

impl Tag {
    pub fn from_slice(bytes: &[u8]) -> std::result::Result<Self, InputError> {
        let arr: [u8; TAG_LEN] = bytes.try_into().map_err(|_| InputError::InvalidTagLen {
            expected: TAG_LEN,
            actual: bytes.len(),
        })?;
        Ok(Tag(arr))
    }

    pub fn as_bytes(&self) -> &[u8; TAG_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        crate::crypto::memory::constant_time_equal(&self.0, &other.0)
    }
}

impl Eq for Tag {}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; TAG_LEN]> for Tag {
    fn from(bytes: [u8; TAG_LEN]) -> Self {
        Tag(bytes)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.to_hex())
    }
}

/// Precondition violations. Always fatal to the call, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("invalid key length: expected={expected}, actual={actual}")]
    InvalidKeyLen { expected: usize, actual: usize },

    #[error("invalid nonce length: expected={expected}, actual={actual}")]
    InvalidNonceLen { expected: usize, actual: usize },

    #[error("invalid tag length: expected={expected}, actual={actual}")]
    InvalidTagLen { expected: usize, actual: usize },

    /// Caller-supplied output buffer cannot hold the result.
    #[error("output buffer too small: required={required}, actual={actual}")]
    OutputTooSmall { required: usize, actual: usize },

    /// Sealed input shorter than a tag.
    #[error("sealed message too short: minimum={minimum}, actual={actual}")]
    SealedTooShort { minimum: usize, actual: usize },

    #[error("message too long: len={len}, max={max}")]
    MessageTooLong { len: u64, max: u64 },

    #[error("associated data too long: len={len}, max={max}")]
    AadTooLong { len: u64, max: u64 },

    #[error("empty plaintext rejected by policy")]
    EmptyPlaintext,

    #[error("all-zero nonce rejected by policy")]
    ZeroNonce,

    /// A second encryption was attempted under the nonce this engine was keyed with.
    #[error("nonce already used for encryption by this engine")]
    NonceReused,

    /// A nonce sequence has issued its last nonce.
    #[error("nonce sequence exhausted")]
    NonceExhausted,
}

/// Nonce derivation and generation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NonceError {
    /// Base IV is all zeros.
    #[error("invalid nonce base: all zeros")]
    InvalidBase,

    #[error("invalid nonce length: requested={requested}, supported={supported}")]
    InvalidNonceLen { requested: usize, supported: usize },

    /// Sequence reached its last index; continuing would repeat a nonce.
    #[error("nonce sequence exhausted")]
    Exhausted,

    /// The injected random source failed.
    #[error("random source failure: {0}")]
    Entropy(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Malformed lengths or violated preconditions.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// Tag mismatch. Deliberately carries no detail.
    #[error("authentication failure")]
    AuthenticationFailure,

    /// The injected random source failed.
    #[error("random source failure: {0}")]
    Entropy(String),
}

impl CryptoError {
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, CryptoError::AuthenticationFailure)
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CryptoError::InvalidInput(_))
    }
}

impl From<NonceError> for CryptoError {
    fn from(e: NonceError) -> Self {
        match e {
            NonceError::Entropy(msg) => CryptoError::Entropy(msg),
            NonceError::InvalidNonceLen { requested, supported } => {
                CryptoError::InvalidInput(InputError::InvalidNonceLen {
                    expected: supported,
                    actual: requested,
                })
            }
            NonceError::InvalidBase => CryptoError::InvalidInput(InputError::ZeroNonce),
            NonceError::Exhausted => CryptoError::InvalidInput(InputError::NonceExhausted),
        }
    }
}
