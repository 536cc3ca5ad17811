//! CLI for demonscan — windowed entropy/MI/compressibility scans over
//! binary streams.

mod commands;

use clap::{ArgGroup, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "demonscan")]
#[command(about = "demonscan — flag windows of a binary stream that are too ordered to be random")]
#[command(version = demonscan_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a byte stream or bit string for statistical anomalies
    #[command(group(ArgGroup::new("input").required(true).args(["file", "bits"])))]
    Scan {
        /// Path to a binary file (bytes expanded to bits, MSB-first)
        #[arg(long)]
        file: Option<String>,

        /// Literal bit string like 010011... (non-0/1 characters ignored)
        #[arg(long)]
        bits: Option<String>,

        /// Window size in bits
        #[arg(long, default_value = "8192")]
        window: usize,

        /// Step between window starts, in bits
        #[arg(long, default_value = "2048")]
        step: usize,

        /// Compute mutual information for lags 1..maxlag
        #[arg(long, default_value = "8")]
        maxlag: usize,

        /// Flag when the entropy z-score is <= -z
        #[arg(long, default_value = "3.0")]
        z: f64,

        /// Also flag when compression_ratio <= cratio (lower = more compressible)
        #[arg(long, default_value = "0.98")]
        cratio: f64,

        /// Output CSV path, or '-' for stdout
        #[arg(long, default_value = "-")]
        csv: String,

        /// Also write the full scan result as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Generate the deterministic fixture suite for scanner validation
    Fixtures {
        /// Output directory
        #[arg(long, default_value = "testbins")]
        outdir: String,

        /// Size in bytes of each fixture file
        #[arg(long, default_value = "65536")]
        size: usize,

        /// Base seed for the deterministic generators
        #[arg(long, default_value = "123456789")]
        seed: u64,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            file,
            bits,
            window,
            step,
            maxlag,
            z,
            cratio,
            csv,
            output,
        } => commands::scan::run(commands::scan::ScanCommandConfig {
            file: file.as_deref(),
            bits: bits.as_deref(),
            window,
            step,
            maxlag,
            z_threshold: z,
            cratio_threshold: cratio,
            csv_path: &csv,
            output_path: output.as_deref(),
        }),
        Commands::Fixtures { outdir, size, seed } => {
            commands::fixtures::run(&outdir, size, seed)
        }
    }
}
