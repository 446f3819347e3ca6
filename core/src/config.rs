//! config.rs
//! Engine policy: size limits and optional strictness switches.
//!
//! Policies are plain data. They can be built in code or loaded from JSON; limits above
//! the SP 800-38D maxima are rejected by `validate`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MAX_AAD_LEN, MAX_PLAINTEXT_LEN};
use crate::crypto::types::InputError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid policy JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("policy limit {field}={value} exceeds maximum {max}")]
    LimitTooLarge { field: &'static str, value: u64, max: u64 },
}

fn default_max_plaintext_len() -> u64 {
    MAX_PLAINTEXT_LEN
}

fn default_max_aad_len() -> u64 {
    MAX_AAD_LEN
}

fn default_true() -> bool {
    true
}

/// Per-engine policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnginePolicy {
    /// Largest plaintext/ciphertext accepted in one call (bytes).
    #[serde(default = "default_max_plaintext_len")]
    pub max_plaintext_len: u64,

    /// Largest associated data accepted in one call (bytes).
    #[serde(default = "default_max_aad_len")]
    pub max_aad_len: u64,

    /// Allow zero-length plaintext (tag-only messages).
    #[serde(default = "default_true")]
    pub allow_empty_plaintext: bool,

    /// Refuse to key an engine with an all-zero nonce.
    #[serde(default)]
    pub reject_zero_nonce: bool,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            max_plaintext_len: MAX_PLAINTEXT_LEN,
            max_aad_len: MAX_AAD_LEN,
            allow_empty_plaintext: true,
            reject_zero_nonce: false,
        }
    }
}

impl EnginePolicy {
    /// Default limits, empty plaintext refused, all-zero nonces refused.
    pub fn strict() -> Self {
        Self {
            allow_empty_plaintext: false,
            reject_zero_nonce: true,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let policy: EnginePolicy = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_plaintext_len > MAX_PLAINTEXT_LEN {
            return Err(ConfigError::LimitTooLarge {
                field: "max_plaintext_len",
                value: self.max_plaintext_len,
                max: MAX_PLAINTEXT_LEN,
            });
        }
        if self.max_aad_len > MAX_AAD_LEN {
            return Err(ConfigError::LimitTooLarge {
                field: "max_aad_len",
                value: self.max_aad_len,
                max: MAX_AAD_LEN,
            });
        }
        Ok(())
    }

    /// Check one operation's input sizes against this policy.
    pub(crate) fn check_lengths(&self, aad_len: usize, data_len: usize) -> Result<(), InputError> {
        let data_len = data_len as u64;
        let aad_len = aad_len as u64;

        if data_len > self.max_plaintext_len {
            return Err(InputError::MessageTooLong { len: data_len, max: self.max_plaintext_len });
        }
        if aad_len > self.max_aad_len {
            return Err(InputError::AadTooLong { len: aad_len, max: self.max_aad_len });
        }
        if data_len == 0 && !self.allow_empty_plaintext {
            return Err(InputError::EmptyPlaintext);
        }
        Ok(())
    }
}
