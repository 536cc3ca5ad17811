//! Per-window statistics: binary Shannon entropy, lagged mutual
//! information, and zlib compressibility.
//!
//! Every function here is a pure map from a window's bits to a scalar, so
//! windows can be measured in any order (or in parallel) without shared
//! state. Zero-probability terms follow the `0·log2(0) = 0` convention
//! throughout; no division by zero is possible.

use flate2::Compression;
use flate2::write::ZlibEncoder;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::bits::pack_bits;

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// First-pass measurements for a single window. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowMetrics {
    /// Start bit offset (inclusive).
    pub start: usize,
    /// End bit offset (exclusive, `start + window`).
    pub end: usize,
    /// Binary Shannon entropy in bits per bit, in [0, 1].
    pub entropy: f64,
    /// Fraction of 1-bits, in [0, 1].
    pub p1: f64,
    /// Mutual information at lags 1..=maxlag, in bits. May be
    /// epsilon-negative from floating-point rounding near independence.
    pub mi: Vec<f64>,
    /// zlib best-effort compressed size over raw size of the repacked
    /// window bytes. Lower means more structure.
    pub compression_ratio: f64,
}

impl WindowMetrics {
    /// Measure one window starting at bit offset `start`.
    pub fn measure(start: usize, bits: &[u8], maxlag: usize) -> Self {
        let (entropy, p1) = binary_shannon_entropy(bits);
        let mi = (1..=maxlag)
            .map(|lag| mutual_information_lag(bits, lag))
            .collect();
        let payload = pack_bits(bits);
        Self {
            start,
            end: start + bits.len(),
            entropy,
            p1,
            mi,
            compression_ratio: compression_ratio(&payload),
        }
    }
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Binary Shannon entropy of a bit slice, with the fraction of 1-bits.
///
/// Returns `(h, p1)` where `h = -p0·log2(p0) - p1·log2(p1)` in bits per
/// bit: 0.0 for a constant window, 1.0 for an exact 50/50 split. An empty
/// slice returns `(0.0, 0.0)` by convention.
pub fn binary_shannon_entropy(bits: &[u8]) -> (f64, f64) {
    let n = bits.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let ones: usize = bits.iter().map(|&b| b as usize).sum();
    let p1 = ones as f64 / n as f64;
    let p0 = 1.0 - p1;
    let mut h = 0.0;
    if p0 > 0.0 {
        h -= p0 * p0.log2();
    }
    if p1 > 0.0 {
        h -= p1 * p1.log2();
    }
    (h, p1)
}

/// Mutual information in bits between the bit sequence and itself shifted
/// by `lag` positions.
///
/// Builds the 2×2 joint frequency table over the `n - lag` aligned pairs
/// `(bits[i], bits[i+lag])` and sums `p(x,y)·log2(p(x,y)/(p(x)·p(y)))` over
/// the four cells, omitting zero-probability terms. Returns 0.0 when `lag`
/// is 0 or the window has no aligned pairs. Non-negative in exact
/// arithmetic; rounding can produce tiny negatives near independence.
pub fn mutual_information_lag(bits: &[u8], lag: usize) -> f64 {
    let n = bits.len();
    if lag == 0 || n <= lag {
        return 0.0;
    }

    let mut counts = [[0u64; 2]; 2];
    for i in 0..n - lag {
        counts[bits[i] as usize][bits[i + lag] as usize] += 1;
    }

    let m = (n - lag) as f64;
    let pa = [
        (counts[0][0] + counts[0][1]) as f64 / m,
        (counts[1][0] + counts[1][1]) as f64 / m,
    ];
    let pb = [
        (counts[0][0] + counts[1][0]) as f64 / m,
        (counts[0][1] + counts[1][1]) as f64 / m,
    ];

    let mut mi = 0.0;
    for a in 0..2 {
        for b in 0..2 {
            let pxy = counts[a][b] as f64 / m;
            if pxy > 0.0 && pa[a] > 0.0 && pb[b] > 0.0 {
                mi += pxy * (pxy / (pa[a] * pb[b])).log2();
            }
        }
    }
    mi
}

/// Compression ratio of a byte payload under zlib at best effort.
///
/// `compressed_len / raw_len`; an empty payload is 1.0 by convention
/// (nothing to shrink). Ratios near or above 1.0 are consistent with
/// near-random input; byte-level compression is a coarser signal than
/// bit-level entropy and can miss structure that is not byte-aligned.
pub fn compression_ratio(payload: &[u8]) -> f64 {
    if payload.is_empty() {
        return 1.0;
    }
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::best());
    if enc.write_all(payload).is_err() {
        return 1.0;
    }
    match enc.finish() {
        Ok(c) => c.len() as f64 / payload.len() as f64,
        Err(_) => 1.0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
