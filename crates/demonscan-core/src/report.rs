//! CSV report assembly: one row per window, fixed column order and fixed
//! decimal precision so runs are byte-for-byte reproducible.

use std::io::{self, Write};

use crate::scan::ScanResult;

/// Write the scan as CSV: header then one row per window.
///
/// Columns, in order: `start_bit`, `end_bit`, `entropy_bits_per_bit`, `p1`,
/// `entropy_zscore`, `mi_lag1` … `mi_lagL`, `compression_ratio`, `flagged`.
/// Entropy, p1, MI, and ratio render with 6 decimals, the z-score with 3,
/// and `flagged` as `0`/`1`.
pub fn write_csv<W: Write>(out: &mut W, result: &ScanResult) -> io::Result<()> {
    let maxlag = result.rows.first().map(|r| r.metrics.mi.len()).unwrap_or(0);

    let mut header = String::from("start_bit,end_bit,entropy_bits_per_bit,p1,entropy_zscore");
    for k in 1..=maxlag {
        header.push_str(&format!(",mi_lag{k}"));
    }
    header.push_str(",compression_ratio,flagged");
    writeln!(out, "{header}")?;

    for row in &result.rows {
        let m = &row.metrics;
        write!(
            out,
            "{},{},{:.6},{:.6},{:.3}",
            m.start, m.end, m.entropy, m.p1, row.zscore
        )?;
        for &mi in &m.mi {
            write!(out, ",{mi:.6}")?;
        }
        writeln!(
            out,
            ",{:.6},{}",
            m.compression_ratio,
            if row.flagged { 1 } else { 0 }
        )?;
    }
    Ok(())
}
