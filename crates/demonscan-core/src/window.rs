//! Fixed-size, fixed-step windowing over a bit stream.

use crate::bits::BitStream;

/// Lazy iterator over `(start, window_bits)` pairs.
///
/// Emits windows at `start = 0, step, 2·step, …` while `start + window`
/// still fits in the stream; a trailing partial window is dropped. Windows
/// may overlap (`step < window`), tile exactly (`step == window`), or leave
/// gaps (`step > window`). Deterministic and restartable: construct a new
/// iterator to rescan.
///
/// Parameter validation (positive window/step, enough input bits) belongs to
/// [`crate::scan::ScanConfig`]; with a zero window or step this iterator
/// simply yields nothing.
pub struct Windows<'a> {
    bits: &'a [u8],
    window: usize,
    step: usize,
    start: usize,
}

impl<'a> Windows<'a> {
    pub fn new(stream: &'a BitStream, window: usize, step: usize) -> Self {
        Self {
            bits: stream.as_slice(),
            window,
            step,
            start: 0,
        }
    }
}

impl<'a> Iterator for Windows<'a> {
    type Item = (usize, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.window == 0 || self.step == 0 {
            return None;
        }
        let end = self.start.checked_add(self.window)?;
        if end > self.bits.len() {
            return None;
        }
        let item = (self.start, &self.bits[self.start..end]);
        self.start += self.step;
        Some(item)
    }
}
