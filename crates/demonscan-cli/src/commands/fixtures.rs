//! The `fixtures` command: write the validation suite to disk.

use std::path::Path;

use demonscan_fixtures::write_suite;

pub fn run(outdir: &str, size: usize, seed: u64) {
    if size == 0 {
        eprintln!("Fixture size must be positive.");
        std::process::exit(1);
    }

    let dir = Path::new(outdir);
    match write_suite(dir, size, seed) {
        Ok(entries) => {
            for e in &entries {
                println!("{:28} {:>9} bytes  sha256={}", e.name, e.bytes, e.sha256);
            }
            println!(
                "\nWrote {} files to {}; manifest at {}",
                entries.len(),
                dir.display(),
                dir.join("MANIFEST.txt").display()
            );
        }
        Err(e) => {
            eprintln!("Failed to write fixture suite: {e}");
            std::process::exit(1);
        }
    }
}
