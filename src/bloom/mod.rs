pub mod builder;

use xxhash_rust::xxh3::xxh3_128;

use crate::types::Key;

pub use builder::FilterBuilder;

/// Membership filter over segment keys: "is this key in the segment?"
///
/// - If any probed bit is 0 → key is DEFINITELY NOT in the segment
/// - If all probed bits are 1 → key is PROBABLY there (false positive possible)
///
/// Bits can't be cleared, so a key removed from a segment stays "probably
/// there" until the filter is rebuilt from the segment's table at flush
/// (see [`FilterBuilder`]).
///
/// Sizing:
///   bits_per_key = -1.44 * log2(false_positive_rate)
///   num_hashes = bits_per_key * ln(2)
///
/// Probes use double hashing, h_i(key) = h1 + i * h2 (mod m), where h1 and h2
/// are the two halves of the 128-bit xxh3 hash of the key's little-endian bytes.
#[derive(Debug, Clone)]
pub struct BloomFilter {
    bits: Vec<u64>,
    num_hashes: u32,
    num_bits: u32,
    capacity: usize,
    false_positive_rate: f64,
}

impl BloomFilter {
    /// Create an empty filter sized for `capacity` keys at the given FPR.
    ///
    /// # Panics
    /// Panics if capacity is 0 or FPR is not in (0, 1).
    pub fn new(capacity: usize, false_positive_rate: f64) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        assert!(
            false_positive_rate > 0.0 && false_positive_rate < 1.0,
            "FPR must be in (0, 1)"
        );

        let bits_per_key = -1.44 * false_positive_rate.log2();
        let num_bits = ((capacity as f64) * bits_per_key).ceil() as u32;
        let num_bits = num_bits.max(64);
        let num_hashes = ((bits_per_key * 2.0f64.ln()).ceil() as u32).max(1);

        BloomFilter {
            bits: vec![0u64; (num_bits as usize).div_ceil(64)],
            num_hashes,
            num_bits,
            capacity,
            false_positive_rate,
        }
    }

    /// Register a key.
    pub fn insert(&mut self, key: Key) {
        let (h1, h2) = Self::hash_key(key);
        for i in 0..self.num_hashes {
            let pos = self.position(h1, h2, i);
            self.bits[(pos / 64) as usize] |= 1 << (pos % 64);
        }
    }

    /// false → definitely absent. true → possibly present.
    pub fn may_contain(&self, key: Key) -> bool {
        let (h1, h2) = Self::hash_key(key);
        (0..self.num_hashes).all(|i| {
            let pos = self.position(h1, h2, i);
            (self.bits[(pos / 64) as usize] >> (pos % 64)) & 1 == 1
        })
    }

    /// Number of keys this filter was sized for.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn false_positive_rate(&self) -> f64 {
        self.false_positive_rate
    }

    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    fn hash_key(key: Key) -> (u64, u64) {
        let hash128 = xxh3_128(&key.to_le_bytes());
        (hash128 as u64, (hash128 >> 64) as u64)
    }

    fn position(&self, h1: u64, h2: u64, i: u32) -> u32 {
        let pos = h1.wrapping_add(u64::from(i).wrapping_mul(h2)) % u64::from(self.num_bits);
        pos as u32
    }
}
