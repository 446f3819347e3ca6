#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use gcm_core::crypto::gf128::{mul_u128, multiply, GhashState};

    const ONE: u128 = 1 << 127;

    fn block(s: &str) -> [u8; 16] {
        hex::decode(s).unwrap().try_into().unwrap()
    }

    const H: &str = "dc95c078a2408989ad48a21492842087";
    const C: &str = "cea7403d4d606b6e074ec5d3baf39d18";

    #[test]
    fn test_multiply_known_product() {
        assert_eq!(multiply(&block(C), &block(H)), block("fd6ab7586e556dba06d69cfe6223b262"));
    }

    #[test]
    fn test_ghash_of_single_block() {
        // one ciphertext block, no AAD: S = ((C*H) ^ len) * H
        let ch = multiply(&block(C), &block(H));
        let mut x = u128::from_be_bytes(ch) ^ 128;
        x = mul_u128(x, u128::from_be_bytes(block(H)));
        assert_eq!(x.to_be_bytes(), block("83de425c5edc5d498f382c441041ca92"));

        let mut g = GhashState::new(&block(H));
        g.update_padded(&block(C));
        g.update_lengths(0, 128);
        assert_eq!(g.blocks(), 2);
        assert_eq!(g.finalize(), block("83de425c5edc5d498f382c441041ca92"));
    }

    #[test]
    fn test_zero_annihilates() {
        assert_eq!(multiply(&[0u8; 16], &block(H)), [0u8; 16]);
        assert_eq!(multiply(&block(H), &[0u8; 16]), [0u8; 16]);
    }

    proptest! {
        #[test]
        fn prop_commutative(a in any::<u128>(), b in any::<u128>()) {
            prop_assert_eq!(mul_u128(a, b), mul_u128(b, a));
        }

        #[test]
        fn prop_identity(a in any::<u128>()) {
            prop_assert_eq!(mul_u128(a, ONE), a);
        }

        #[test]
        fn prop_distributive(a in any::<u128>(), b in any::<u128>(), c in any::<u128>()) {
            prop_assert_eq!(mul_u128(a, b ^ c), mul_u128(a, b) ^ mul_u128(a, c));
        }

        #[test]
        fn prop_associative(a in any::<u128>(), b in any::<u128>(), c in any::<u128>()) {
            prop_assert_eq!(mul_u128(mul_u128(a, b), c), mul_u128(a, mul_u128(b, c)));
        }

        // a partial tail and its explicit zero padding hash identically
        #[test]
        fn prop_padding_matches_explicit_zeros(data in proptest::collection::vec(any::<u8>(), 0..64)) {
            let h = block(H);
            let mut padded = data.clone();
            padded.resize(data.len().div_ceil(16) * 16, 0);

            let mut a = GhashState::new(&h);
            a.update_padded(&data);
            let mut b = GhashState::new(&h);
            b.update_padded(&padded);
            prop_assert_eq!(a.finalize(), b.finalize());
        }
    }
}
