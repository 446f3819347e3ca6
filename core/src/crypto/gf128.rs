//! src/crypto/gf128.rs
//! GF(2^128) multiplication and the GHASH accumulator.
//!
//! Design notes:
//! - Field polynomial x^128 + x^7 + x^2 + x + 1 in GCM's reflected bit order: bit 0 of
//!   an element is the most significant bit of its first byte, so the reduction
//!   constant is `0xE1` in the top byte.
//! - Blocks are read as big-endian `u128`; that keeps the bit order of SP 800-38D.
//! - The multiply loop uses masks instead of branches on secret bits.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::BLOCK_LEN;
use crate::crypto::types::Block;

/// `R = 11100001 || 0^120`.
const REDUCTION: u128 = 0xE1 << 120;

/// Multiply two field elements given as big-endian `u128`.
#[inline]
pub fn mul_u128(a: u128, b: u128) -> u128 {
    let mut z = 0u128;
    let mut v = b;

    for i in (0..128).rev() {
        // all-ones when bit i of `a` (counted from the MSB side) is set
        let take = 0u128.wrapping_sub((a >> i) & 1);
        z ^= v & take;

        let carry = 0u128.wrapping_sub(v & 1);
        v = (v >> 1) ^ (REDUCTION & carry);
    }

    z
}

/// Multiply two 128-bit blocks in GF(2^128).
#[inline]
pub fn multiply(a: &Block, b: &Block) -> Block {
    mul_u128(u128::from_be_bytes(*a), u128::from_be_bytes(*b)).to_be_bytes()
}

/// Running GHASH state for one operation.
///
/// Usage: `new(h)`, then `update_padded(aad)`, `update_padded(ciphertext)`,
/// `update_lengths(..)`, `finalize()`. Both `h` and the accumulator are zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct GhashState {
    h: u128,
    acc: u128,
    blocks: u64,
}

impl GhashState {
    pub fn new(h: &Block) -> Self {
        Self { h: u128::from_be_bytes(*h), acc: 0, blocks: 0 }
    }

    /// Fold one full block: `acc = (acc ^ block) * H`.
    #[inline]
    pub fn update_block(&mut self, block: &Block) {
        self.acc = mul_u128(self.acc ^ u128::from_be_bytes(*block), self.h);
        self.blocks += 1;
    }

    /// Fold `data` block by block, zero-padding a final partial block.
    pub fn update_padded(&mut self, data: &[u8]) {
        let mut chunks = data.chunks_exact(BLOCK_LEN);
        for chunk in &mut chunks {
            let mut block = [0u8; BLOCK_LEN];
            block.copy_from_slice(chunk);
            self.update_block(&block);
        }

        let rem = chunks.remainder();
        if !rem.is_empty() {
            let mut block = [0u8; BLOCK_LEN];
            block[..rem.len()].copy_from_slice(rem);
            self.update_block(&block);
            block.zeroize();
        }
    }

    /// Fold the closing length block: BE64(aad bits) || BE64(ciphertext bits).
    pub fn update_lengths(&mut self, aad_bits: u64, ct_bits: u64) {
        let mut block = [0u8; BLOCK_LEN];
        block[..8].copy_from_slice(&aad_bits.to_be_bytes());
        block[8..].copy_from_slice(&ct_bits.to_be_bytes());
        self.update_block(&block);
    }

    /// Number of blocks folded so far.
    pub fn blocks(&self) -> u64 {
        self.blocks
    }

    /// Current accumulator value. Consumes the state so it cannot be extended.
    pub fn finalize(self) -> Block {
        self.acc.to_be_bytes()
    }
}
