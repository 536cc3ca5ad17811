//! Byte-stream fixtures with known statistical structure.
//!
//! Each generator follows a named recipe — uniform PRNG bytes, biased
//! Bernoulli bits, a sticky two-state Markov chain, a 16-bit LFSR stream,
//! constant and alternating patterns, and a concatenation of differently
//! structured segments for window-alignment stress. [`write_suite`] writes
//! the standard suite as `.bin` files plus a `MANIFEST.txt` with SHA-256
//! digests for integrity checks.
//!
//! The scanner couples to these files only through the plain byte
//! interface; nothing here touches detection logic. All seeded generators
//! are deterministic for a given seed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use sha2::{Digest, Sha256};

use demonscan_core::pack_bits;

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Uniform bytes from a seeded PRNG. The "looks random" baseline.
pub fn uniform_bytes(n: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = vec![0u8; n];
    rng.fill_bytes(&mut out);
    out
}

/// Uniform bytes from the OS entropy source. Non-deterministic baseline.
pub fn os_random_bytes(n: usize) -> Vec<u8> {
    let mut out = vec![0u8; n];
    rand::rng().fill_bytes(&mut out);
    out
}

/// `n` copies of a single byte value (`0x00`, `0xFF`, `0xAA`, …).
pub fn constant_bytes(n: usize, value: u8) -> Vec<u8> {
    vec![value; n]
}

/// Alternating bits `0101…` (or `1010…` when `start` is odd).
pub fn alternating_bits(n_bits: usize, start: u8) -> Vec<u8> {
    (0..n_bits).map(|i| (start as usize + i) as u8 & 1).collect()
}

/// Bernoulli bits with `P(1) = p1`.
pub fn biased_bits(n_bits: usize, p1: f64, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n_bits)
        .map(|_| if rng.random::<f64>() < p1 { 1 } else { 0 })
        .collect()
}

/// Sticky two-state Markov chain: each bit repeats the previous one with
/// probability `stay_prob`. High lagged dependence, roughly balanced bias.
pub fn markov_sticky_bits(n_bits: usize, stay_prob: f64, seed: u64) -> Vec<u8> {
    if n_bits == 0 {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut x: u8 = if rng.random::<bool>() { 1 } else { 0 };
    let mut out = Vec::with_capacity(n_bits);
    out.push(x);
    for _ in 1..n_bits {
        if rng.random::<f64>() >= stay_prob {
            x ^= 1;
        }
        out.push(x);
    }
    out
}

/// 16-bit Fibonacci LFSR stream, taps 16/14/13/11 (a maximal-length
/// choice). Looks random-ish to frequency statistics but is fully linear.
pub fn lfsr_bits(n_bits: usize, seed: u16) -> Vec<u8> {
    let mut state = if seed == 0 { 1 } else { seed };
    let mut out = Vec::with_capacity(n_bits);
    for _ in 0..n_bits {
        out.push((state & 1) as u8);
        // Taps at bits 0, 2, 3, 5 from the LSB == 16, 14, 13, 11 MSB-wise.
        let feedback = (state ^ (state >> 2) ^ (state >> 3) ^ (state >> 5)) & 1;
        state = (state >> 1) | (feedback << 15);
    }
    out
}

/// Stress fixture: equally sized segments of random bytes, extreme order,
/// periodic bytes, strong bias, and sticky dependence, bracketed by random
/// chunks so segment edges fall mid-stream for most window alignments.
pub fn demon_sandwich(chunk_bytes: usize, seed: u64) -> Vec<u8> {
    let chunk_bits = chunk_bytes * 8;
    let mut data = Vec::with_capacity(chunk_bytes * 7);
    data.extend(uniform_bytes(chunk_bytes, seed));
    data.extend(constant_bytes(chunk_bytes, 0x00));
    data.extend(constant_bytes(chunk_bytes, 0xFF));
    data.extend(constant_bytes(chunk_bytes, 0xAA));
    data.extend(pack_bits(&biased_bits(chunk_bits, 0.02, seed + 99)));
    data.extend(pack_bits(&markov_sticky_bits(chunk_bits, 0.995, seed + 199)));
    data.extend(uniform_bytes(chunk_bytes, seed + 1));
    data
}

// ---------------------------------------------------------------------------
// Suite writer
// ---------------------------------------------------------------------------

/// One written fixture file.
#[derive(Debug, Clone)]
pub struct FixtureEntry {
    pub name: String,
    pub path: PathBuf,
    pub bytes: usize,
    pub sha256: String,
    pub description: String,
}

/// Write the standard fixture suite into `outdir`.
///
/// Produces one `.bin` per recipe (`size` bytes each, except the sandwich)
/// and a `MANIFEST.txt` with one tab-separated line per file:
/// `name\tbytes\tsha256=<hex>\tdescription`. Everything except the
/// OS-random baseline is deterministic under `seed`.
pub fn write_suite(outdir: &Path, size: usize, seed: u64) -> io::Result<Vec<FixtureEntry>> {
    fs::create_dir_all(outdir)?;
    let n_bits = size * 8;

    let recipes: Vec<(&str, &str, Vec<u8>)> = vec![
        ("00_osrandom.bin", "OS entropy baseline", os_random_bytes(size)),
        ("01_prng.bin", "Seeded PRNG bytes", uniform_bytes(size, seed)),
        ("10_all_zeros.bin", "All zeros", constant_bytes(size, 0x00)),
        (
            "11_alternating_01.bin",
            "0101... alternating bits",
            pack_bits(&alternating_bits(n_bits, 0)),
        ),
        ("12_repeating_aa.bin", "0xAA repeat", constant_bytes(size, 0xAA)),
        (
            "13_biased_p10.bin",
            "Bits with p(1)=0.10",
            pack_bits(&biased_bits(n_bits, 0.10, seed + 13)),
        ),
        (
            "14_markov_sticky.bin",
            "Markov sticky bits (stay_prob=0.97)",
            pack_bits(&markov_sticky_bits(n_bits, 0.97, seed + 14)),
        ),
        (
            "15_lfsr_prbs.bin",
            "16-bit LFSR stream",
            pack_bits(&lfsr_bits(n_bits, 0xACE1)),
        ),
        (
            "99_demon_sandwich.bin",
            "Random with injected order patches",
            demon_sandwich(size / 8, seed),
        ),
    ];

    let mut entries = Vec::with_capacity(recipes.len());
    for (name, description, data) in recipes {
        let path = outdir.join(name);
        fs::write(&path, &data)?;
        entries.push(FixtureEntry {
            name: name.to_string(),
            path,
            bytes: data.len(),
            sha256: sha256_hex(&data),
            description: description.to_string(),
        });
    }

    let mut manifest = String::new();
    for e in &entries {
        manifest.push_str(&format!(
            "{}\t{}\tsha256={}\t{}\n",
            e.name, e.bytes, e.sha256, e.description
        ));
    }
    fs::write(outdir.join("MANIFEST.txt"), manifest)?;

    Ok(entries)
}

/// Hex-encoded SHA-256 digest of a byte slice.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    let mut out = String::with_capacity(64);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
