//! Deterministic 32-bit content hash (MurmurHash2) rendered in base 36.
//!
//! The hash is a pure function of the input bytes. It is fast and well
//! distributed but not cryptographic: it only has to keep identifiers stable
//! and collisions rare.

use std::fmt;

/// Mixing multiplier.
const M: u32 = 0x5bd1_e995;

/// Mixing shift for each 4-byte chunk.
const R: u32 = 24;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A 32-bit content hash. `Display` renders lowercase base 36.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(u32);

impl ContentHash {
    /// The raw 32-bit value.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Render as lowercase base-36 digits with no sign or padding.
    pub fn to_base36(self) -> String {
        let mut n = self.0;
        if n == 0 {
            return "0".to_owned();
        }
        // u32::MAX is 7 digits in base 36.
        let mut buf = [0u8; 7];
        let mut i = buf.len();
        while n > 0 {
            i -= 1;
            buf[i] = BASE36_DIGITS[(n % 36) as usize];
            n /= 36;
        }
        buf[i..].iter().map(|&b| b as char).collect()
    }
}

impl From<ContentHash> for u32 {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base36())
    }
}

/// Hash `text` with seed 0.
pub fn hash(text: &str) -> ContentHash {
    hash_with_seed(text, 0)
}

/// Hash `text` with an explicit seed.
///
/// Chunks are read little-endian, four bytes at a time. A 1–3 byte tail is
/// folded in before the final avalanche.
pub fn hash_with_seed(text: &str, seed: u32) -> ContentHash {
    let bytes = text.as_bytes();
    // The length is folded in modulo 2^32, matching the 32-bit reference.
    let mut h = seed ^ bytes.len() as u32;

    let mut chunks = bytes.chunks_exact(4);
    for chunk in &mut chunks {
        let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h = h.wrapping_mul(M) ^ k;
    }

    let tail = chunks.remainder();
    if tail.len() == 3 {
        h ^= u32::from(tail[2]) << 16;
    }
    if tail.len() >= 2 {
        h ^= u32::from(tail[1]) << 8;
    }
    if !tail.is_empty() {
        h ^= u32::from(tail[0]);
        h = h.wrapping_mul(M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^= h >> 15;

    ContentHash(h)
}
