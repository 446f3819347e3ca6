#[cfg(test)]
mod telemetry_snapshot_tests {
    use std::time::Duration;

    use gcm_core::crypto::AesGcm256;
    use gcm_core::telemetry::{Stage, StageTimes, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};

    fn make_counters() -> TelemetryCounters {
        TelemetryCounters {
            messages_sealed: 2,
            messages_opened: 1,
            auth_failures: 0,
            invalid_inputs: 0,
            bytes_plaintext: 100,
            bytes_ciphertext: 100,
            bytes_aad: 12,
            keystream_blocks: 7,
        }
    }

    fn make_timer() -> TelemetryTimer {
        let mut timer = TelemetryTimer::new();
        std::thread::sleep(Duration::from_millis(20)); // ensure elapsed > stage times
        timer.add_stage_time(Stage::Keystream, Duration::from_millis(5));
        timer.add_stage_time(Stage::Hash, Duration::from_millis(10));
        timer.finish();
        timer
    }

    #[test]
    fn throughput_is_computed() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer());
        assert!(snapshot.throughput_plaintext_bytes_per_sec > 0.0);
    }

    #[test]
    fn sanity_check_passes_for_valid_snapshot() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer());
        assert!(snapshot.sanity_check());
        assert_eq!(snapshot.total_stage_time(), Duration::from_millis(15));
    }

    #[test]
    fn sanity_check_fails_on_length_mismatch() {
        let mut counters = make_counters();
        counters.bytes_ciphertext += 1;
        let snapshot = TelemetrySnapshot::from(&counters, &make_timer());
        assert!(!snapshot.sanity_check());
    }

    #[test]
    fn stage_times_accumulate() {
        let mut times = StageTimes::default();
        times.add(Stage::Verify, Duration::from_micros(3));
        times.add(Stage::Verify, Duration::from_micros(4));
        assert_eq!(times.get(Stage::Verify), Duration::from_micros(7));
        assert_eq!(times.get_ns(Stage::Verify), 7_000);
        assert!((times.get_us(Stage::Verify) - 7.0).abs() < 1e-9);
        assert_eq!(times.get(Stage::Hash), Duration::ZERO);
        assert!(times.has_all(&[Stage::Verify]));
        assert!(!times.has_all(&[Stage::Verify, Stage::Hash]));
    }

    #[test]
    fn counters_merge_and_add_assign() {
        let mut a = make_counters();
        let b = make_counters();
        a.merge(&b);
        assert_eq!(a.total_messages(), 6);
        a += b;
        assert_eq!(a.bytes_plaintext, 300);
    }

    #[test]
    fn engine_records_operations() {
        let (ct, tag) = AesGcm256::new(&[1u8; 32], &[2u8; 12]).unwrap().encrypt(b"ad", &[0u8; 20]).unwrap();

        let mut e = AesGcm256::new(&[1u8; 32], &[2u8; 12]).unwrap();
        e.decrypt(b"ad", &ct, tag.as_ref()).unwrap();
        assert!(e.decrypt(b"xx", &ct, tag.as_ref()).is_err());
        assert!(e.decrypt(b"ad", &ct, &[0u8; 3]).is_err());

        let c = e.counters();
        assert_eq!(c.messages_opened, 1);
        assert_eq!(c.auth_failures, 1);
        assert_eq!(c.invalid_inputs, 1);
        assert_eq!(c.bytes_ciphertext, 20);
        assert_eq!(c.bytes_aad, 2);
        assert_eq!(c.keystream_blocks, 2);

        let snap = e.snapshot();
        assert!(snap.has_all_stages(&[Stage::KeySchedule, Stage::Hash, Stage::Keystream, Stage::Verify]));
    }

    #[test]
    fn snapshot_serializes_without_secrets() {
        let mut e = AesGcm256::new(&[0x77u8; 32], &[0x66u8; 12]).unwrap();
        e.encrypt(b"", b"secret plaintext").unwrap();
        let json = e.snapshot().to_json().unwrap();

        assert!(json.contains("messages_sealed"));
        assert!(!json.contains("\"key\""));
        assert!(!json.contains("\"nonce\""));
    }
}
