// ## 📂 File: `src/crypto/aead.rs`

//! src/crypto/aead.rs
//! AES-256-GCM engine: CTR keystream + GHASH tag, NIST SP 800-38D with 96-bit nonces.
//!
//! Design notes:
//! - One engine = one (key, nonce) pair. The key is expanded once at construction and the
//!   schedule is zeroed when the engine is dropped.
//! - J0 = nonce || 0x00000001 masks the tag. Data blocks use counters J0+1, J0+2, ...
//! - Tag verification is constant-time and fails closed: on mismatch no plaintext byte
//!   reaches any caller buffer.
//! - An engine encrypts at most once. Reusing its nonce for a second message would break
//!   both confidentiality and authenticity, so the second call is rejected.
//! - Decryption does not change engine state and may be repeated.

use tracing::{debug, trace, warn};
use zeroize::{Zeroize, Zeroizing};

use crate::config::EnginePolicy;
use crate::constants::{BLOCK_LEN, J0_COUNTER, KEY_LEN_32, LOG_TARGET, NONCE_LEN_12, TAG_LEN};
use crate::crypto::block::{encrypt_block, expand_key, KeySchedule};
use crate::crypto::gf128::GhashState;
use crate::crypto::memory::constant_time_equal;
use crate::crypto::types::{Block, CryptoError, InputError, Key256, Nonce96, Result, Tag};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};

/// Lifecycle of an engine with respect to its nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Key expanded, nonce stored, nothing encrypted yet.
    Keyed,
    /// One message has been encrypted under this nonce. Further encryption is refused.
    Sealed,
}

/// Phases of a single tag computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperationPhase {
    Keyed,
    ProcessingAad,
    ProcessingCiphertext,
    Finalizing,
    Done,
}

/// Tag computation for one operation. Owns the GHASH accumulator; dropped (and zeroed)
/// once the tag is produced.
struct TagComputation<'a> {
    schedule: &'a KeySchedule,
    j0: Block,
    ghash: GhashState,
    phase: OperationPhase,
    aad_len: u64,
    ct_len: u64,
}

impl<'a> TagComputation<'a> {
    fn begin(schedule: &'a KeySchedule, j0: Block) -> Self {
        let mut h = encrypt_block(schedule, &[0u8; BLOCK_LEN]);
        let ghash = GhashState::new(&h);
        h.zeroize();

        Self {
            schedule,
            j0,
            ghash,
            phase: OperationPhase::Keyed,
            aad_len: 0,
            ct_len: 0,
        }
    }

    fn absorb_aad(&mut self, aad: &[u8]) {
        debug_assert_eq!(self.phase, OperationPhase::Keyed);
        self.phase = OperationPhase::ProcessingAad;
        self.ghash.update_padded(aad);
        self.aad_len = aad.len() as u64;
    }

    fn absorb_ciphertext(&mut self, ciphertext: &[u8]) {
        debug_assert_eq!(self.phase, OperationPhase::ProcessingAad);
        self.phase = OperationPhase::ProcessingCiphertext;
        self.ghash.update_padded(ciphertext);
        self.ct_len = ciphertext.len() as u64;
    }

    fn finish(mut self) -> Tag {
        debug_assert_eq!(self.phase, OperationPhase::ProcessingCiphertext);
        self.phase = OperationPhase::Finalizing;

        // lengths fit in u64 bits: both are bounded by the policy limits
        self.ghash.update_lengths(self.aad_len * 8, self.ct_len * 8);
        trace!(target: LOG_TARGET, ghash_blocks = self.ghash.blocks(), "ghash finalised");

        let mut mask = encrypt_block(self.schedule, &self.j0);
        self.phase = OperationPhase::Done;
        let mut s = self.ghash.finalize();

        let mut tag = [0u8; TAG_LEN];
        for ((t, a), b) in tag.iter_mut().zip(s.iter()).zip(mask.iter()) {
            *t = a ^ b;
        }
        s.zeroize();
        mask.zeroize();

        Tag(tag)
    }
}

/// Counter block `nonce || BE32(counter)`.
#[inline]
fn counter_block(nonce: &Nonce96, counter: u32) -> Block {
    let mut block = [0u8; BLOCK_LEN];
    block[..NONCE_LEN_12].copy_from_slice(nonce);
    block[NONCE_LEN_12..].copy_from_slice(&counter.to_be_bytes());
    block
}

/// XOR the CTR keystream starting at `first_counter` into `data`.
/// Returns the number of counter blocks consumed.
fn apply_keystream(schedule: &KeySchedule, nonce: &Nonce96, first_counter: u32, data: &mut [u8]) -> u64 {
    let mut counter = first_counter;
    let mut blocks = 0u64;

    for chunk in data.chunks_mut(BLOCK_LEN) {
        let mut keystream = encrypt_block(schedule, &counter_block(nonce, counter));
        // final chunk may be short; zip truncates the keystream
        for (b, k) in chunk.iter_mut().zip(keystream.iter()) {
            *b ^= k;
        }
        keystream.zeroize();

        counter = counter.wrapping_add(1);
        blocks += 1;
    }

    blocks
}

/// AES-256-GCM engine bound to one (key, nonce) pair.
///
/// Contract:
/// - The caller guarantees the (key, nonce) pair is never used for another message,
///   by this or any other engine.
/// - Not for concurrent use: every operation takes `&mut self`. Use one engine per caller.
pub struct AesGcm256 {
    schedule: KeySchedule,
    nonce: Nonce96,
    /// J0 counter value; data counters start right after it.
    counter: u32,
    blocks_consumed: u64,
    state: EngineState,
    policy: EnginePolicy,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
}

impl AesGcm256 {
    /// Key an engine with the default policy.
    pub fn new(key: &Key256, nonce: &Nonce96) -> Result<Self> {
        Self::with_policy(key, nonce, EnginePolicy::default())
    }

    /// Key an engine from unchecked slices.
    ///
    /// Fails with `InvalidInput` unless `key` is 32 bytes and `nonce` is 12 bytes.
    pub fn init(key: &[u8], nonce: &[u8]) -> Result<Self> {
        Self::init_with_policy(key, nonce, EnginePolicy::default())
    }

    pub fn init_with_policy(key: &[u8], nonce: &[u8], policy: EnginePolicy) -> Result<Self> {
        if key.len() != KEY_LEN_32 {
            return Err(InputError::InvalidKeyLen { expected: KEY_LEN_32, actual: key.len() }.into());
        }
        if nonce.len() != NONCE_LEN_12 {
            return Err(InputError::InvalidNonceLen { expected: NONCE_LEN_12, actual: nonce.len() }.into());
        }

        let mut key_buf = Zeroizing::new([0u8; KEY_LEN_32]);
        key_buf.copy_from_slice(key);
        let mut nonce_buf = [0u8; NONCE_LEN_12];
        nonce_buf.copy_from_slice(nonce);

        Self::with_policy(&key_buf, &nonce_buf, policy)
    }

    pub fn with_policy(key: &Key256, nonce: &Nonce96, policy: EnginePolicy) -> Result<Self> {
        if policy.reject_zero_nonce && nonce.iter().all(|&b| b == 0) {
            return Err(InputError::ZeroNonce.into());
        }

        let mut timer = TelemetryTimer::new();
        let schedule = timer.time(Stage::KeySchedule, || expand_key(key));
        debug!(target: LOG_TARGET, "engine keyed");

        Ok(Self {
            schedule,
            nonce: *nonce,
            counter: J0_COUNTER,
            blocks_consumed: 0,
            state: EngineState::Keyed,
            policy,
            counters: TelemetryCounters::default(),
            timer,
        })
    }

    pub fn nonce(&self) -> &Nonce96 {
        &self.nonce
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn policy(&self) -> &EnginePolicy {
        &self.policy
    }

    /// Keystream blocks consumed by all operations so far.
    pub fn blocks_consumed(&self) -> u64 {
        self.blocks_consumed
    }

    pub fn counters(&self) -> &TelemetryCounters {
        &self.counters
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }

    fn j0(&self) -> Block {
        counter_block(&self.nonce, self.counter)
    }

    fn first_data_counter(&self) -> u32 {
        self.counter.wrapping_add(1)
    }

    fn reject(&mut self, err: InputError) -> CryptoError {
        self.counters.add_invalid_input();
        debug!(target: LOG_TARGET, error = %err, "input rejected");
        err.into()
    }

    fn compute_tag(&mut self, aad: &[u8], ciphertext: &[u8]) -> Tag {
        let j0 = self.j0();
        let schedule = &self.schedule;
        self.timer.time(Stage::Hash, || {
            let mut op = TagComputation::begin(schedule, j0);
            op.absorb_aad(aad);
            op.absorb_ciphertext(ciphertext);
            op.finish()
        })
    }

    fn keystream(&mut self, data: &mut [u8]) -> u64 {
        let first = self.first_data_counter();
        let (schedule, nonce) = (&self.schedule, &self.nonce);
        let blocks = self.timer.time(Stage::Keystream, || apply_keystream(schedule, nonce, first, data));
        self.blocks_consumed += blocks;
        blocks
    }

    /// Encrypt `plaintext` into `out[..plaintext.len()]` and return the tag.
    ///
    /// Errors (`InvalidInput`): engine already used for encryption, size limits,
    /// `out` shorter than `plaintext`.
    pub fn encrypt_into(&mut self, aad: &[u8], plaintext: &[u8], out: &mut [u8]) -> Result<Tag> {
        if self.state == EngineState::Sealed {
            return Err(self.reject(InputError::NonceReused));
        }
        if let Err(e) = self.policy.check_lengths(aad.len(), plaintext.len()) {
            return Err(self.reject(e));
        }
        if out.len() < plaintext.len() {
            return Err(self.reject(InputError::OutputTooSmall {
                required: plaintext.len(),
                actual: out.len(),
            }));
        }

        let ciphertext = &mut out[..plaintext.len()];
        ciphertext.copy_from_slice(plaintext);
        let blocks = self.keystream(ciphertext);
        let tag = self.compute_tag(aad, ciphertext);

        self.state = EngineState::Sealed;
        self.counters.add_seal(aad.len(), plaintext.len(), blocks);
        debug!(target: LOG_TARGET, aad_len = aad.len(), pt_len = plaintext.len(), blocks, "sealed message");

        Ok(tag)
    }

    /// Encrypt and return `(ciphertext, tag)`; ciphertext has the plaintext's length.
    pub fn encrypt(&mut self, aad: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Tag)> {
        let mut ciphertext = vec![0u8; plaintext.len()];
        let tag = self.encrypt_into(aad, plaintext, &mut ciphertext)?;
        Ok((ciphertext, tag))
    }

    /// Verify `tag` over `aad || ciphertext`, then decrypt into `out[..ciphertext.len()]`.
    ///
    /// `out` is written only after the tag verifies. Returns the plaintext length.
    pub fn decrypt_into(&mut self, aad: &[u8], ciphertext: &[u8], tag: &[u8], out: &mut [u8]) -> Result<usize> {
        if tag.len() != TAG_LEN {
            return Err(self.reject(InputError::InvalidTagLen { expected: TAG_LEN, actual: tag.len() }));
        }
        if let Err(e) = self.policy.check_lengths(aad.len(), ciphertext.len()) {
            return Err(self.reject(e));
        }
        if out.len() < ciphertext.len() {
            return Err(self.reject(InputError::OutputTooSmall {
                required: ciphertext.len(),
                actual: out.len(),
            }));
        }

        let expected = self.compute_tag(aad, ciphertext);
        let verified = self
            .timer
            .time(Stage::Verify, || constant_time_equal(expected.as_bytes(), tag));
        if !verified {
            self.counters.add_auth_failure();
            warn!(target: LOG_TARGET, aad_len = aad.len(), ct_len = ciphertext.len(), "authentication failed");
            return Err(CryptoError::AuthenticationFailure);
        }

        let plaintext = &mut out[..ciphertext.len()];
        plaintext.copy_from_slice(ciphertext);
        let blocks = self.keystream(plaintext);

        self.counters.add_open(aad.len(), ciphertext.len(), blocks);
        debug!(target: LOG_TARGET, aad_len = aad.len(), ct_len = ciphertext.len(), blocks, "opened message");

        Ok(ciphertext.len())
    }

    /// Verify and decrypt. Returns `AuthenticationFailure` without any plaintext on mismatch.
    pub fn decrypt(&mut self, aad: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>> {
        let mut plaintext = vec![0u8; ciphertext.len()];
        self.decrypt_into(aad, ciphertext, tag, &mut plaintext)?;
        Ok(plaintext)
    }

    /// Encrypt and return `ciphertext || tag`.
    pub fn seal(&mut self, aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut sealed = vec![0u8; plaintext.len() + TAG_LEN];
        let tag = self.encrypt_into(aad, plaintext, &mut sealed[..plaintext.len()])?;
        sealed[plaintext.len()..].copy_from_slice(tag.as_bytes());
        Ok(sealed)
    }

    /// Split `ciphertext || tag`, verify and decrypt.
    pub fn open(&mut self, aad: &[u8], sealed: &[u8]) -> Result<Vec<u8>> {
        if sealed.len() < TAG_LEN {
            return Err(self.reject(InputError::SealedTooShort { minimum: TAG_LEN, actual: sealed.len() }));
        }
        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);
        self.decrypt(aad, ciphertext, tag)
    }
}

impl std::fmt::Debug for AesGcm256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcm256")
            .field("state", &self.state)
            .field("blocks_consumed", &self.blocks_consumed)
            .finish_non_exhaustive()
    }
}

/// One-shot encryption: key an engine, encrypt once, drop it.
pub fn encrypt(key: &[u8], nonce: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Tag)> {
    AesGcm256::init(key, nonce)?.encrypt(aad, plaintext)
}

/// One-shot decryption.
pub fn decrypt(key: &[u8], nonce: &[u8], aad: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>> {
    AesGcm256::init(key, nonce)?.decrypt(aad, ciphertext, tag)
}
