//! src/crypto/block.rs
//! AES-256 key expansion and forward block permutation (FIPS 197).
//!
//! Design notes:
//! - Only the forward direction exists. GCM runs AES in counter mode, so decryption
//!   also only ever encrypts counter blocks.
//! - State is column-major: byte `row + 4 * col`, matching the FIPS 197 input mapping.
//! - Sizes are fixed by the types (`[u8; 32]` keys, `[u8; 16]` blocks); there is no
//!   runtime error path in this layer.
//! - `KeySchedule` is zeroed on drop.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{KEY_LEN_32, ROUNDS, SCHEDULE_WORDS};
use crate::crypto::types::Block;

/// Forward S-box.
pub const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

/// Round constants, indexed by `i / 8`. Index 0 is never used by AES-256.
pub const RCON: [u32; 8] = [
    0x0000_0000,
    0x0100_0000,
    0x0200_0000,
    0x0400_0000,
    0x0800_0000,
    0x1000_0000,
    0x2000_0000,
    0x4000_0000,
];

/// Expanded AES-256 key: 60 big-endian round words.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeySchedule {
    words: [u32; SCHEDULE_WORDS],
}

impl KeySchedule {
    /// All 60 round words.
    pub fn words(&self) -> &[u32; SCHEDULE_WORDS] {
        &self.words
    }

    /// Four words of round key `round` (0..=ROUNDS).
    #[inline]
    fn round_key(&self, round: usize) -> &[u32] {
        &self.words[4 * round..4 * round + 4]
    }
}

impl std::fmt::Debug for KeySchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeySchedule(<redacted>)")
    }
}

#[inline]
fn rot_word(word: u32) -> u32 {
    word.rotate_left(8)
}

#[inline]
fn sub_word(word: u32) -> u32 {
    let b = word.to_be_bytes();
    u32::from_be_bytes([
        SBOX[b[0] as usize],
        SBOX[b[1] as usize],
        SBOX[b[2] as usize],
        SBOX[b[3] as usize],
    ])
}

/// Expand a 256-bit key into the 60-word schedule.
///
/// Contract:
/// - Deterministic and pure over the key bytes.
/// - Every 8th word: `SubWord(RotWord(prev)) ^ RCON[i / 8]`; at offset 4: `SubWord(prev)`;
///   otherwise `prev`. Each is then XORed with the word 8 positions earlier.
pub fn expand_key(key: &[u8; KEY_LEN_32]) -> KeySchedule {
    let mut words = [0u32; SCHEDULE_WORDS];

    for (word, chunk) in words.iter_mut().zip(key.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    for i in 8..SCHEDULE_WORDS {
        let mut temp = words[i - 1];
        if i % 8 == 0 {
            temp = sub_word(rot_word(temp)) ^ RCON[i / 8];
        } else if i % 8 == 4 {
            temp = sub_word(temp);
        }
        words[i] = words[i - 8] ^ temp;
    }

    KeySchedule { words }
}

/// Encrypt one 16-byte block with the expanded key.
pub fn encrypt_block(schedule: &KeySchedule, input: &Block) -> Block {
    let mut state = *input;

    add_round_key(&mut state, schedule.round_key(0));
    for round in 1..ROUNDS {
        sub_bytes(&mut state);
        shift_rows(&mut state);
        mix_columns(&mut state);
        add_round_key(&mut state, schedule.round_key(round));
    }

    // Final round has no MixColumns.
    sub_bytes(&mut state);
    shift_rows(&mut state);
    add_round_key(&mut state, schedule.round_key(ROUNDS));

    state
}

#[inline]
fn add_round_key(state: &mut Block, round_key: &[u32]) {
    for (col, word) in round_key.iter().enumerate() {
        let k = word.to_be_bytes();
        for row in 0..4 {
            state[row + 4 * col] ^= k[row];
        }
    }
}

#[inline]
fn sub_bytes(state: &mut Block) {
    for b in state.iter_mut() {
        *b = SBOX[*b as usize];
    }
}

/// Row `r` rotates left by `r` columns.
#[inline]
fn shift_rows(state: &mut Block) {
    let old = *state;
    for col in 0..4 {
        for row in 1..4 {
            state[row + 4 * col] = old[row + 4 * ((col + row) % 4)];
        }
    }
}

/// Multiply by x in GF(2^8) mod x^8 + x^4 + x^3 + x + 1, branch-free.
#[inline(always)]
fn xtime(b: u8) -> u8 {
    (b << 1) ^ (0x1b & 0u8.wrapping_sub(b >> 7))
}

#[inline]
fn mix_columns(state: &mut Block) {
    for col in state.chunks_exact_mut(4) {
        let (a0, a1, a2, a3) = (col[0], col[1], col[2], col[3]);
        let all = a0 ^ a1 ^ a2 ^ a3;
        col[0] = a0 ^ all ^ xtime(a0 ^ a1);
        col[1] = a1 ^ all ^ xtime(a1 ^ a2);
        col[2] = a2 ^ all ^ xtime(a2 ^ a3);
        col[3] = a3 ^ all ^ xtime(a3 ^ a0);
    }
}
