use crate::tree::{Iter, NaturalOrder, OrderedMap};
use crate::types::{Key, Value};

/// Result of a memtable lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The newest write for the key is a live value.
    Live(&'a str),
    /// The key was removed after (or without) being written here. Older
    /// segments must not be consulted.
    Deleted,
    /// The memtable knows nothing about the key.
    Absent,
}

/// In-memory write buffer. Wraps an AVL [`OrderedMap`].
///
/// Every write goes here first. When the tree grows taller than the height
/// budget, the engine drains it into segments (see [`Db::merge`]).
///
/// Deletes are handled via tombstones. You can't just remove the key because
/// older versions may exist in segments on disk.
///
/// [`Db::merge`]: crate::Db::merge
pub struct MemTable {
    data: OrderedMap<Key, Value>,
    max_height: u32,
}

impl MemTable {
    /// Create a new empty memtable with the given height budget.
    pub fn new(max_height: u32) -> Self {
        MemTable {
            data: OrderedMap::new(),
            max_height,
        }
    }

    /// Insert or overwrite a key-value pair, clearing any tombstone.
    pub fn put(&mut self, key: Key, value: Value) {
        self.data.insert(key, value);
    }

    /// Mark a key as deleted, even if it was never written here.
    pub fn delete(&mut self, key: Key) {
        self.data.make_tombstone(key);
    }

    pub fn get(&self, key: Key) -> Lookup<'_> {
        match self.data.find(&key) {
            Some(node) if node.is_tombstone() => Lookup::Deleted,
            Some(node) => node
                .value()
                .map_or(Lookup::Absent, |value| Lookup::Live(value.as_str())),
            None => Lookup::Absent,
        }
    }

    /// Sorted iterator over all entries (including tombstones).
    pub fn iter(&self) -> Iter<'_, Key, Value, NaturalOrder<Key>> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    pub fn max_height(&self) -> u32 {
        self.max_height
    }

    /// True once the tree is taller than the height budget.
    pub fn is_full(&self) -> bool {
        self.data.height() > self.max_height
    }

    /// Tree diagram of the buffered records.
    pub fn render(&self) -> String {
        self.data.to_string()
    }
}
