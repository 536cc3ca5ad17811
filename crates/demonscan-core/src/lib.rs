//! # demonscan-core
//!
//! Scans a binary stream for statistical departures from an independent,
//! uniformly-distributed (fair-coin) bit source.
//!
//! The stream is expanded to bits (MSB-first per byte), cut into fixed-size
//! windows at a fixed step, and each window is measured three ways: binary
//! Shannon entropy, mutual information against its own lag-shifted self, and
//! zlib compressibility of the repacked bytes. Entropies are then z-scored
//! against the distribution over *all* windows, and a window is flagged when
//! its entropy is abnormally low or its bytes compress better than random
//! data should.
//!
//! ## Quick Start
//!
//! ```no_run
//! use demonscan_core::{BitStream, ScanConfig, scan};
//!
//! let data = std::fs::read("data.bin").unwrap();
//! let bits = BitStream::from_bytes(&data);
//! let result = scan(&bits, &ScanConfig::default()).unwrap();
//!
//! for row in &result.rows {
//!     if row.flagged {
//!         println!("structure at bits {}..{}", row.metrics.start, row.metrics.end);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! Bytes → BitStream → Windows → per-window metrics → global z-score → flags
//!
//! The pipeline is strictly two-pass: the z-score is defined against the
//! mean and population standard deviation of entropy across every window,
//! so no row can be emitted before the whole stream has been scanned.

pub mod bits;
pub mod metrics;
pub mod report;
pub mod scan;
pub mod window;

pub use bits::{BitStream, pack_bits};
pub use metrics::{WindowMetrics, binary_shannon_entropy, compression_ratio, mutual_information_lag};
pub use report::write_csv;
pub use scan::{EntropyStats, ScanConfig, ScanError, ScanResult, WindowRow, scan};
pub use window::Windows;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
