//! The `scan` command: load input, run the two-pass scan, emit the report.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use demonscan_core::{BitStream, ScanConfig, scan, write_csv};

pub struct ScanCommandConfig<'a> {
    pub file: Option<&'a str>,
    pub bits: Option<&'a str>,
    pub window: usize,
    pub step: usize,
    pub maxlag: usize,
    pub z_threshold: f64,
    pub cratio_threshold: f64,
    /// CSV destination path, `-` for stdout.
    pub csv_path: &'a str,
    /// Optional JSON destination for the full scan result.
    pub output_path: Option<&'a str>,
}

pub fn run(cfg: ScanCommandConfig<'_>) {
    let stream = match load_bits(cfg.file, cfg.bits) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to read input: {e}");
            std::process::exit(1);
        }
    };
    if stream.is_empty() {
        eprintln!("Input is empty: no bits to scan.");
        std::process::exit(1);
    }

    let scan_cfg = ScanConfig {
        window: cfg.window,
        step: cfg.step,
        maxlag: cfg.maxlag,
        z_threshold: cfg.z_threshold,
        cratio_threshold: cfg.cratio_threshold,
    };

    let result = match scan(&stream, &scan_cfg) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Scan failed: {e}");
            std::process::exit(1);
        }
    };

    let flagged = result.rows.iter().filter(|r| r.flagged).count();
    log::info!("{} of {} windows flagged", flagged, result.rows.len());

    if let Err(e) = write_report(cfg.csv_path, &result) {
        eprintln!("Failed to write CSV: {e}");
        std::process::exit(1);
    }

    if let Some(path) = cfg.output_path {
        let json = serde_json::to_string_pretty(&result)
            .expect("scan result serializes");
        match std::fs::write(path, json) {
            Ok(()) => eprintln!("Results written to {path}"),
            Err(e) => {
                eprintln!("Failed to write {path}: {e}");
                std::process::exit(1);
            }
        }
    }
}

/// Build the bit stream from whichever input source was given.
fn load_bits(file: Option<&str>, bits: Option<&str>) -> io::Result<BitStream> {
    match (file, bits) {
        (Some(path), _) => {
            let data = std::fs::read(path)?;
            Ok(BitStream::from_bytes(&data))
        }
        (None, Some(s)) => Ok(BitStream::from_bitstring(s)),
        // clap's ArgGroup guarantees one of the two is present.
        (None, None) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no input source given",
        )),
    }
}

fn write_report(csv_path: &str, result: &demonscan_core::ScanResult) -> io::Result<()> {
    if csv_path == "-" {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_csv(&mut out, result)?;
        out.flush()
    } else {
        let mut out = BufWriter::new(File::create(csv_path)?);
        write_csv(&mut out, result)?;
        out.flush()
    }
}
