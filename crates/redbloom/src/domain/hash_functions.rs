//! Bit offset generation
//!
//! One MurmurHash3 x64/128 digest (seed 0) per element, split into two 64-bit
//! halves and combined by double hashing: offset_i = (h1 + i*h2) mod m.
//!
//! The split matches Guava's `murmur3_128().asBytes()` read as two
//! little-endian longs, so offsets agree with bitmaps written by Guava-based
//! services sharing the same keys.

use std::io::Cursor;

/// Clears the sign bit of the running sum before reduction.
const NON_NEGATIVE_MASK: u64 = i64::MAX as u64;

/// Split the 128-bit MurmurHash3 digest of `element` into `(h1, h2)`.
///
/// `h1` is the low half of the digest, `h2` the high half.
pub fn murmur_seeds(element: &[u8]) -> (u64, u64) {
    let mut cursor = Cursor::new(element);
    let digest = murmur3::murmur3_x64_128(&mut cursor, 0)
        .expect("reading from an in-memory slice cannot fail");
    (digest as u64, (digest >> 64) as u64)
}

/// Compute the `k` bit offsets of `element` in an `m`-bit bitmap.
///
/// Deterministic across processes: identical `(element, k, m)` always yield
/// the identical sequence. Returns an empty sequence when `m` is zero.
pub fn bit_offsets(element: &[u8], k: u32, m: u64) -> Vec<u64> {
    if m == 0 {
        return Vec::new();
    }
    let (h1, h2) = murmur_seeds(element);

    let mut combined = h1;
    (0..k)
        .map(|_| {
            let offset = (combined & NON_NEGATIVE_MASK) % m;
            combined = combined.wrapping_add(h2);
            offset
        })
        .collect()
}
