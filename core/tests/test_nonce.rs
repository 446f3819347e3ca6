#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use gcm_core::crypto::{
        derive_nonce_12, generate_key, generate_nonce, validate_nonce_len, AesGcm256, CryptoError,
        InputError, NonceError, NonceSequence, OsRandom, RandomSource, RngSource,
    };

    struct BrokenSource;

    impl RandomSource for BrokenSource {
        fn fill_secure(&mut self, _buf: &mut [u8]) -> Result<(), NonceError> {
            Err(NonceError::Entropy("device unavailable".into()))
        }
    }

    /// Yields `zeros` all-zero fills, then 0xAB bytes.
    struct ZerosThen {
        zeros: usize,
    }

    impl RandomSource for ZerosThen {
        fn fill_secure(&mut self, buf: &mut [u8]) -> Result<(), NonceError> {
            let byte = if self.zeros > 0 {
                self.zeros -= 1;
                0
            } else {
                0xAB
            };
            buf.fill(byte);
            Ok(())
        }
    }

    #[test]
    fn test_os_random_nonces_differ() {
        let mut os = OsRandom;
        let a = generate_nonce(&mut os).unwrap();
        let b = generate_nonce(&mut os).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_seeded_source_is_reproducible() {
        let mut s1 = RngSource(StdRng::seed_from_u64(7));
        let mut s2 = RngSource(StdRng::seed_from_u64(7));
        assert_eq!(generate_nonce(&mut s1).unwrap(), generate_nonce(&mut s2).unwrap());
        assert_eq!(*generate_key(&mut s1).unwrap(), *generate_key(&mut s2).unwrap());
    }

    #[test]
    fn test_entropy_failure_propagates() {
        let err = generate_nonce(&mut BrokenSource).unwrap_err();
        assert!(matches!(err, CryptoError::Entropy(ref m) if m.contains("device unavailable")));
        assert!(generate_key(&mut BrokenSource).is_err());
        assert_eq!(NonceSequence::random(&mut BrokenSource).unwrap_err(),
                   NonceError::Entropy("device unavailable".into()));
    }

    #[test]
    fn test_generated_key_and_nonce_drive_engine() {
        let mut src = RngSource(StdRng::seed_from_u64(99));
        let key = generate_key(&mut src).unwrap();
        let nonce = generate_nonce(&mut src).unwrap();

        let sealed = AesGcm256::new(&key, &nonce).unwrap().seal(b"", b"payload").unwrap();
        let opened = AesGcm256::new(&key, &nonce).unwrap().open(b"", &sealed).unwrap();
        assert_eq!(opened, b"payload");
    }

    #[test]
    fn test_derive_xors_low_bytes_little_endian() {
        let base = [0x10u8; 12];
        let n = derive_nonce_12(&base, 0x0102).unwrap();
        assert_eq!(&n[..4], &[0x10; 4]);
        assert_eq!(n[4], 0x10 ^ 0x02);
        assert_eq!(n[5], 0x10 ^ 0x01);
        assert_eq!(&n[6..], &[0x10; 6]);
        assert_eq!(derive_nonce_12(&base, 0).unwrap(), base);
    }

    #[test]
    fn test_zero_base_rejected() {
        assert_eq!(derive_nonce_12(&[0u8; 12], 1).unwrap_err(), NonceError::InvalidBase);
        assert!(NonceSequence::new([0u8; 12]).is_err());
        assert!(NonceSequence::resume([0u8; 12], 5).is_err());
    }

    #[test]
    fn test_nonce_len_validation() {
        assert!(validate_nonce_len(12).is_ok());
        assert_eq!(
            validate_nonce_len(16).unwrap_err(),
            NonceError::InvalidNonceLen { requested: 16, supported: 12 }
        );
    }

    #[test]
    fn test_sequence_is_unique() {
        let mut seq = NonceSequence::new([0x5Cu8; 12]).unwrap();
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(seq.next_nonce().unwrap()));
        }
        assert_eq!(seq.position(), Some(1000));
    }

    #[test]
    fn test_resume_matches_fresh_sequence() {
        let base = [0x33u8; 12];
        let mut fresh = NonceSequence::new(base).unwrap();
        for _ in 0..10 {
            fresh.next_nonce().unwrap();
        }
        let mut resumed = NonceSequence::resume(base, 10).unwrap();
        assert_eq!(fresh.next_nonce().unwrap(), resumed.next_nonce().unwrap());
    }

    #[test]
    fn test_sequence_refuses_to_wrap() {
        let mut seq = NonceSequence::resume([1u8; 12], u64::MAX).unwrap();
        assert!(seq.next_nonce().is_ok());
        assert_eq!(seq.position(), None);
        assert_eq!(seq.next_nonce().unwrap_err(), NonceError::Exhausted);
        assert_eq!(
            CryptoError::from(NonceError::Exhausted),
            CryptoError::InvalidInput(InputError::NonceExhausted)
        );
    }

    #[test]
    fn test_random_sequence_skips_zero_base() {
        let mut src = ZerosThen { zeros: 2 };
        let mut seq = NonceSequence::random(&mut src).unwrap();
        assert_eq!(seq.next_nonce().unwrap(), [0xABu8; 12]);
    }

    #[test]
    fn test_random_sequence_fails_on_stuck_zero_source() {
        let mut src = ZerosThen { zeros: usize::MAX };
        let err = NonceSequence::random(&mut src).unwrap_err();
        assert!(matches!(err, NonceError::Entropy(ref m) if m.contains("all-zero")));
        // bounded retries: only a handful of draws were consumed
        assert!(usize::MAX - src.zeros <= 8);
    }
}
