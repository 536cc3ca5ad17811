//! Two-pass scan pipeline: per-window measurement, cross-window entropy
//! normalization, and the flagging rule.
//!
//! The first pass walks every window and collects [`WindowMetrics`]; the
//! second derives a z-score for each window's entropy against the mean and
//! population standard deviation over *all* windows, then applies the
//! flagging rule. No row exists before the whole stream has been scanned —
//! the normalization is global by definition.

use serde::{Deserialize, Serialize};

use crate::bits::BitStream;
use crate::metrics::WindowMetrics;
use crate::window::Windows;

/// Floor for the population standard deviation when every window has the
/// same entropy. Any deviation from the mean then z-scores to an
/// arbitrarily large magnitude instead of dividing by zero.
const SD_FLOOR: f64 = 1e-12;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Scan parameters. All fields are independently overridable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Window size in bits.
    pub window: usize,
    /// Step between window starts, in bits. May be smaller than `window`
    /// (overlap), equal (tiling), or larger (gaps).
    pub step: usize,
    /// Mutual information is computed for lags `1..=maxlag`.
    pub maxlag: usize,
    /// Flag a window when its entropy z-score is `<= -|z_threshold|`.
    /// Only *low*-entropy deviations flag: the detector targets structure
    /// and order, so a window with unusually high entropy relative to its
    /// neighbors passes.
    pub z_threshold: f64,
    /// Also flag when `compression_ratio <= cratio_threshold`.
    pub cratio_threshold: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window: 8192,
            step: 2048,
            maxlag: 8,
            z_threshold: 3.0,
            cratio_threshold: 0.98,
        }
    }
}

impl ScanConfig {
    /// Validate the configuration against a stream of `n_bits` bits.
    pub fn validate(&self, n_bits: usize) -> Result<(), ScanError> {
        if self.window == 0 {
            return Err(ScanError::InvalidWindow(self.window));
        }
        if self.step == 0 {
            return Err(ScanError::InvalidStep(self.step));
        }
        if self.maxlag == 0 {
            return Err(ScanError::InvalidMaxLag(self.maxlag));
        }
        if n_bits < self.window {
            return Err(ScanError::InsufficientBits {
                required: self.window,
                actual: n_bits,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Fatal scan errors. Surfaced before any output is produced; there is no
/// partial or degraded output mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// Window size must be positive.
    InvalidWindow(usize),
    /// Step size must be positive.
    InvalidStep(usize),
    /// Maximum lag must be positive.
    InvalidMaxLag(usize),
    /// Input holds fewer bits than a single window.
    InsufficientBits { required: usize, actual: usize },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWindow(w) => write!(f, "window size must be positive, got {w}"),
            Self::InvalidStep(s) => write!(f, "step size must be positive, got {s}"),
            Self::InvalidMaxLag(l) => write!(f, "maximum lag must be positive, got {l}"),
            Self::InsufficientBits { required, actual } => {
                write!(f, "need at least {required} bits, got {actual}")
            }
        }
    }
}

impl std::error::Error for ScanError {}

// ---------------------------------------------------------------------------
// Cross-window entropy aggregation
// ---------------------------------------------------------------------------

/// Two-phase aggregator for the global entropy distribution: accumulate
/// every window's entropy, then finalize into `(mean, population sd)`.
///
/// Kept explicit rather than folded into the scan loop so the
/// collect-then-normalize contract does not depend on the sequencing of
/// surrounding code.
#[derive(Debug, Default)]
pub struct EntropyStats {
    values: Vec<f64>,
}

impl EntropyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one window's entropy.
    pub fn push(&mut self, h: f64) {
        self.values.push(h);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Finalize into `(mean, population standard deviation)`.
    ///
    /// The standard deviation divides by the count (not count − 1) and is
    /// floored to a small positive epsilon when it would be zero — a single
    /// window, or identical entropy everywhere (degenerate constant or
    /// uniform input).
    pub fn finalize(&self) -> (f64, f64) {
        let n = self.values.len();
        if n == 0 {
            return (0.0, SD_FLOOR);
        }
        let mu = self.values.iter().sum::<f64>() / n as f64;
        let var = self
            .values
            .iter()
            .map(|&h| (h - mu) * (h - mu))
            .sum::<f64>()
            / n as f64;
        let sd = var.sqrt();
        (mu, if sd > 0.0 { sd } else { SD_FLOOR })
    }
}

// ---------------------------------------------------------------------------
// Scan result
// ---------------------------------------------------------------------------

/// One report row: first-pass metrics plus the second-pass derivations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowRow {
    #[serde(flatten)]
    pub metrics: WindowMetrics,
    /// `(entropy - mean) / sd` against the global entropy distribution.
    pub zscore: f64,
    /// True when the window is inconsistent with a fair-coin bit source
    /// under the configured thresholds.
    pub flagged: bool,
}

/// Full scan output: rows in start-offset order plus the global entropy
/// distribution they were normalized against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanResult {
    pub rows: Vec<WindowRow>,
    /// Mean entropy across all windows.
    pub entropy_mean: f64,
    /// Population standard deviation of entropy across all windows,
    /// floored to epsilon when zero.
    pub entropy_sd: f64,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full two-pass scan.
///
/// Pass one measures every window (entropy, MI at lags `1..=maxlag`,
/// compression ratio) in start order. Pass two z-scores each window's
/// entropy against the global mean/sd and flags windows where
/// `zscore <= -|z_threshold|` or `compression_ratio <= cratio_threshold`.
///
/// Degenerate inputs flag everywhere: when every window has identical
/// entropy (e.g. an all-zero stream) the sd floors to epsilon, so any
/// non-positive deviation — including zero on some platforms' rounding —
/// produces an enormous |z-score| and every window trips the threshold.
/// That is the intended reading: a uniformly structured stream is
/// uniformly anomalous under the fair-coin null.
pub fn scan(bits: &BitStream, config: &ScanConfig) -> Result<ScanResult, ScanError> {
    config.validate(bits.len())?;

    // Pass one: per-window metrics, collected in start-offset order.
    let mut metrics = Vec::new();
    let mut stats = EntropyStats::new();
    for (start, wbits) in Windows::new(bits, config.window, config.step) {
        let m = WindowMetrics::measure(start, wbits, config.maxlag);
        stats.push(m.entropy);
        metrics.push(m);
    }

    let (mu, sd) = stats.finalize();
    log::debug!(
        "scanned {} windows of {} bits (step {}): entropy mean {:.6}, sd {:.6}",
        metrics.len(),
        config.window,
        config.step,
        mu,
        sd
    );

    // Pass two: z-score and flag against the global distribution.
    let z_cut = -config.z_threshold.abs();
    let rows = metrics
        .into_iter()
        .map(|m| {
            let zscore = (m.entropy - mu) / sd;
            let flagged = zscore <= z_cut || m.compression_ratio <= config.cratio_threshold;
            WindowRow {
                metrics: m,
                zscore,
                flagged,
            }
        })
        .collect();

    Ok(ScanResult {
        rows,
        entropy_mean: mu,
        entropy_sd: sd,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_zero_parameters() {
        let base = ScanConfig::default();
        let cfg = ScanConfig { window: 0, ..base.clone() };
        assert_eq!(cfg.validate(100_000), Err(ScanError::InvalidWindow(0)));
        let cfg = ScanConfig { step: 0, ..base.clone() };
        assert_eq!(cfg.validate(100_000), Err(ScanError::InvalidStep(0)));
        let cfg = ScanConfig { maxlag: 0, ..base };
        assert_eq!(cfg.validate(100_000), Err(ScanError::InvalidMaxLag(0)));
    }

    #[test]
    fn config_rejects_short_input_naming_both_counts() {
        let cfg = ScanConfig::default();
        let err = cfg.validate(4096).unwrap_err();
        assert_eq!(
            err,
            ScanError::InsufficientBits {
                required: 8192,
                actual: 4096
            }
        );
        let msg = err.to_string();
        assert!(msg.contains("8192") && msg.contains("4096"), "msg: {msg}");
    }

    #[test]
    fn entropy_stats_known_population() {
        // [1, 1, 1, 0]: mean 0.75, population sd sqrt(3)/4 ≈ 0.4330127.
        let mut stats = EntropyStats::new();
        for h in [1.0, 1.0, 1.0, 0.0] {
            stats.push(h);
        }
        let (mu, sd) = stats.finalize();
        assert!((mu - 0.75).abs() < 1e-12);
        assert!((sd - 0.433_012_701_892_219_3).abs() < 1e-12, "sd = {sd}");
        let z = (0.0 - mu) / sd;
        assert!((z - (-1.732_050_808)).abs() < 1e-6, "z = {z}");
    }

    #[test]
    fn entropy_stats_floors_zero_dispersion() {
        let mut stats = EntropyStats::new();
        stats.push(0.5);
        stats.push(0.5);
        let (mu, sd) = stats.finalize();
        assert_eq!(mu, 0.5);
        assert_eq!(sd, 1e-12);
    }

    #[test]
    fn entropy_stats_empty() {
        let (mu, sd) = EntropyStats::new().finalize();
        assert_eq!(mu, 0.0);
        assert!(sd > 0.0);
    }

    #[test]
    fn scan_rejects_short_stream_with_no_rows() {
        let bits = BitStream::from_bytes(&[0xAB; 512]); // 4096 bits
        let err = scan(&bits, &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, ScanError::InsufficientBits { .. }));
    }

    #[test]
    fn scan_emits_rows_in_start_order() {
        let bits = BitStream::from_bytes(&[0x5A; 4096]); // 32768 bits
        let cfg = ScanConfig {
            window: 8192,
            step: 4096,
            maxlag: 2,
            ..ScanConfig::default()
        };
        let result = scan(&bits, &cfg).unwrap();
        let starts: Vec<usize> = result.rows.iter().map(|r| r.metrics.start).collect();
        assert_eq!(starts, vec![0, 4096, 8192, 12288, 16384, 20480, 24576]);
        for row in &result.rows {
            assert_eq!(row.metrics.end, row.metrics.start + 8192);
            assert_eq!(row.metrics.mi.len(), 2);
        }
    }

    #[test]
    fn scan_all_zero_stream_flags_everything() {
        // 131072 bits, tiled into 16 windows of 8192.
        let bits = BitStream::from_bytes(&vec![0u8; 16384]);
        let cfg = ScanConfig {
            window: 8192,
            step: 8192,
            maxlag: 2,
            ..ScanConfig::default()
        };
        let result = scan(&bits, &cfg).unwrap();
        assert_eq!(result.rows.len(), 16);
        assert_eq!(result.entropy_mean, 0.0);
        assert_eq!(result.entropy_sd, 1e-12);
        for row in &result.rows {
            assert_eq!(row.metrics.entropy, 0.0);
            assert!(row.metrics.mi.iter().all(|&x| x == 0.0));
            assert!(row.metrics.compression_ratio < 1.0);
            assert!(row.flagged);
        }
    }

    #[test]
    fn scan_is_deterministic() {
        let bits = BitStream::from_bytes(&[0x37; 4096]);
        let cfg = ScanConfig::default();
        let a = scan(&bits, &cfg).unwrap();
        let b = scan(&bits, &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn flagging_is_asymmetric() {
        // One random window amid six all-zero windows: its entropy sits far
        // *above* the mean, and the rule only flags low-entropy deviations,
        // so it must pass while every zero window flags on compressibility.
        let mut data = vec![0u8; 3 * 1024];
        let mut state: u64 = 0xdeadbeef;
        for _ in 0..1024 {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            data.push((state >> 33) as u8);
        }
        data.extend(vec![0u8; 3 * 1024]);

        let bits = BitStream::from_bytes(&data);
        let cfg = ScanConfig {
            window: 8192,
            step: 8192,
            maxlag: 1,
            ..ScanConfig::default()
        };
        let result = scan(&bits, &cfg).unwrap();
        assert_eq!(result.rows.len(), 7);

        let random_row = &result.rows[3];
        assert!(random_row.zscore > 1.0, "z = {}", random_row.zscore);
        assert!(!random_row.flagged);
        for (i, row) in result.rows.iter().enumerate() {
            if i != 3 {
                assert!(row.flagged, "zero window {i} should flag");
            }
        }
    }
}
