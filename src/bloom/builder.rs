use crate::bloom::BloomFilter;
use crate::types::Key;

/// Builds a fresh filter from the keys a segment holds after a flush.
///
/// Rebuilding is the only way a removed key leaves a filter:
/// 1. Create a FilterBuilder with the segment's capacity and FPR
/// 2. Call add_key() for every key left in the flushed table
/// 3. Call build() and swap the result in for the old filter
pub struct FilterBuilder {
    filter: BloomFilter,
    added: usize,
}

impl FilterBuilder {
    pub fn new(capacity: usize, false_positive_rate: f64) -> Self {
        FilterBuilder {
            filter: BloomFilter::new(capacity, false_positive_rate),
            added: 0,
        }
    }

    pub fn add_key(&mut self, key: Key) {
        self.filter.insert(key);
        self.added += 1;
    }

    /// Number of keys added so far.
    pub fn added(&self) -> usize {
        self.added
    }

    pub fn build(self) -> BloomFilter {
        if self.added > self.filter.capacity() {
            log::debug!(
                "filter holds {} keys over its capacity of {}",
                self.added,
                self.filter.capacity()
            );
        }
        self.filter
    }
}

impl Extend<Key> for FilterBuilder {
    fn extend<I: IntoIterator<Item = Key>>(&mut self, keys: I) {
        for key in keys {
            self.add_key(key);
        }
    }
}
