//! Integration tests for demonscan-core.
//!
//! These exercise the full pipeline: byte/bit-string input → bit
//! extraction → windowed measurement → global normalization → flagging →
//! CSV report.

use demonscan_core::{BitStream, ScanConfig, ScanError, scan, write_csv};

#[test]
fn all_zero_stream_end_to_end() {
    // 131072 bits tiled into 16 non-overlapping windows.
    let bits = BitStream::from_bytes(&vec![0u8; 16384]);
    let cfg = ScanConfig {
        window: 8192,
        step: 8192,
        maxlag: 2,
        ..ScanConfig::default()
    };

    let result = scan(&bits, &cfg).expect("scan should succeed");
    assert_eq!(result.rows.len(), 16, "expected 16 tiled windows");

    for row in &result.rows {
        assert_eq!(row.metrics.entropy, 0.0);
        assert_eq!(row.metrics.p1, 0.0);
        assert!(row.metrics.mi.iter().all(|&x| x == 0.0));
        assert!(
            row.metrics.compression_ratio < 1.0,
            "all-zero window should compress, got {}",
            row.metrics.compression_ratio
        );
        assert!(row.flagged, "every window of a constant stream flags");
    }

    let mut csv = Vec::new();
    write_csv(&mut csv, &result).unwrap();
    let text = String::from_utf8(csv).unwrap();
    assert_eq!(text.lines().count(), 17); // header + 16 rows
    assert!(text.lines().skip(1).all(|l| l.ends_with(",1")));
}

#[test]
fn short_input_fails_before_any_output() {
    // 4096 bits against an 8192-bit window must reject, naming both counts.
    let bits = BitStream::from_bytes(&vec![0xC3u8; 512]);
    let cfg = ScanConfig {
        window: 8192,
        ..ScanConfig::default()
    };
    let err = scan(&bits, &cfg).expect_err("short input must be rejected");
    assert_eq!(
        err,
        ScanError::InsufficientBits {
            required: 8192,
            actual: 4096
        }
    );
    let msg = err.to_string();
    assert!(
        msg.contains("8192") && msg.contains("4096"),
        "error must name required and actual bit counts: {msg}"
    );
}

#[test]
fn bitstring_input_scans_like_byte_input() {
    let bytes = vec![0xAAu8; 2048]; // 16384 bits of 1010…
    let from_bytes = BitStream::from_bytes(&bytes);
    let s: String = bytes.iter().map(|_| "10101010").collect();
    let from_string = BitStream::from_bitstring(&s);
    assert_eq!(from_bytes.as_slice(), from_string.as_slice());

    let cfg = ScanConfig {
        window: 4096,
        step: 4096,
        maxlag: 4,
        ..ScanConfig::default()
    };
    let a = scan(&from_bytes, &cfg).unwrap();
    let b = scan(&from_string, &cfg).unwrap();
    assert_eq!(a, b);

    // Alternating bits: maximal entropy, but total lag-1 dependence and
    // extreme byte-level redundancy. The compressibility signal flags it.
    for row in &a.rows {
        assert!((row.metrics.entropy - 1.0).abs() < 1e-9);
        assert!(row.metrics.mi[0] > 0.99, "mi_lag1 = {}", row.metrics.mi[0]);
        assert!(row.metrics.compression_ratio < 0.98);
        assert!(row.flagged);
    }
}

#[test]
fn overlapping_windows_report_expected_offsets() {
    let bits = BitStream::from_bytes(&vec![0x0Fu8; 3072]); // 24576 bits
    let cfg = ScanConfig {
        window: 8192,
        step: 2048,
        maxlag: 1,
        ..ScanConfig::default()
    };
    let result = scan(&bits, &cfg).unwrap();
    // Starts at 0, 2048, …, 16384.
    assert_eq!(result.rows.len(), 9);
    assert_eq!(result.rows.first().unwrap().metrics.start, 0);
    assert_eq!(result.rows.last().unwrap().metrics.start, 16384);
    assert_eq!(result.rows.last().unwrap().metrics.end, 24576);
}

#[test]
fn csv_output_is_idempotent() {
    let data: Vec<u8> = (0u16..4096).map(|i| (i.wrapping_mul(251) >> 4) as u8).collect();
    let bits = BitStream::from_bytes(&data);
    let cfg = ScanConfig::default();

    let mut a = Vec::new();
    let mut b = Vec::new();
    write_csv(&mut a, &scan(&bits, &cfg).unwrap()).unwrap();
    write_csv(&mut b, &scan(&bits, &cfg).unwrap()).unwrap();
    assert_eq!(a, b, "same input and config must produce identical bytes");
}
