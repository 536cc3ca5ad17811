//! Bit-level representation of the stream under analysis.
//!
//! All byte↔bit conversions in the crate use the same convention: MSB first
//! within each byte, so bit `8i+j` of a stream equals bit `(7-j)` of byte
//! `i`. Packing pads the final byte with zero bits on the right.

// ---------------------------------------------------------------------------
// BitStream
// ---------------------------------------------------------------------------

/// An immutable, finite sequence of single-bit values (stored one per byte).
///
/// Constructed once at scan start and never mutated afterwards; windows
/// borrow slices of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStream {
    bits: Vec<u8>,
}

impl BitStream {
    /// Expand a byte sequence into bits, MSB first per byte.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut bits = Vec::with_capacity(data.len() * 8);
        for &byte in data {
            for shift in (0..8).rev() {
                bits.push((byte >> shift) & 1);
            }
        }
        Self { bits }
    }

    /// Parse a literal bit string like `"010011"`.
    ///
    /// Any character other than `0` or `1` (whitespace, separators) is
    /// ignored.
    pub fn from_bitstring(s: &str) -> Self {
        let bits = s
            .chars()
            .filter_map(|c| match c {
                '0' => Some(0),
                '1' => Some(1),
                _ => None,
            })
            .collect();
        Self { bits }
    }

    /// Number of bits in the stream.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True when the stream holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Borrow the underlying bit values (each 0 or 1).
    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }
}

/// Pack bits back into bytes, MSB first, right-padding the last byte with
/// zero bits when the length is not a multiple of 8. Inverse of
/// [`BitStream::from_bytes`] for multiple-of-8 lengths.
pub fn pack_bits(bits: &[u8]) -> Vec<u8> {
    if bits.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(bits.len().div_ceil(8));
    for chunk in bits.chunks(8) {
        let mut v = 0u8;
        for (j, &bit) in chunk.iter().enumerate() {
            v |= (bit & 1) << (7 - j);
        }
        out.push(v);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
