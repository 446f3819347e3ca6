//! src/crypto/memory.rs
//! Constant-time comparison and guaranteed erasure of secret buffers.
//!
//! Design notes:
//! - `secure_zero` goes through `zeroize`, which uses volatile writes followed by a
//!   compiler fence, so the erase survives dead-store elimination.
//! - `constant_time_equal` visits every byte of equal-length inputs and folds the XOR
//!   differences with OR before a single final decision. Length is treated as public.
//! - Components owning key material implement `Zeroize + ZeroizeOnDrop` or hold it in
//!   `Zeroizing<T>` so every exit path, including `?` returns, erases it.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Overwrite every byte of `buffer` with zero. Never optimised away.
#[inline]
pub fn secure_zero(buffer: &mut [u8]) {
    buffer.zeroize();
}

/// Compare two byte sequences in time independent of where they first differ.
///
/// Returns `false` immediately for unequal lengths; for equal lengths every byte
/// pair is examined.
#[inline]
pub fn constant_time_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    bool::from(a.ct_eq(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroes_whole_buffer() {
        let mut buf = vec![0xA5u8; 37];
        secure_zero(&mut buf);
        assert!(buf.iter().all(|&b| b == 0));
        assert_eq!(buf.len(), 37);
    }

    #[test]
    fn empty_buffers_are_fine() {
        let mut empty: [u8; 0] = [];
        secure_zero(&mut empty);
        assert!(constant_time_equal(&[], &[]));
    }

    #[test]
    fn equal_and_unequal() {
        let a = [0xDEu8; 16];
        let mut b = a;
        assert!(constant_time_equal(&a, &b));

        b[15] ^= 0x01;
        assert!(!constant_time_equal(&a, &b));

        let mut c = a;
        c[0] ^= 0x80;
        assert!(!constant_time_equal(&a, &c));
    }

    #[test]
    fn length_mismatch_is_unequal() {
        assert!(!constant_time_equal(&[1, 2, 3], &[1, 2]));
    }
}
