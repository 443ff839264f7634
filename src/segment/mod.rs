pub mod file;

use std::path::{Path, PathBuf};

use crate::bloom::{BloomFilter, FilterBuilder};
use crate::tree::OrderedMap;
use crate::types::{Key, Value};

/// A buffered write waiting for the next flush.
#[derive(Debug, Clone)]
enum Pending {
    /// Brand-new key routed here by a merge. Always lands.
    Insert(Key, Value),
    /// Key the filter claimed to hold. Lands only if the table really has it.
    Update(Key, Value),
}

/// One on-disk table plus its membership filter and pending writes.
///
/// The table lives in `<dir>/<id>.txt` and is loaded into a scratch
/// [`OrderedMap`] only for the duration of a single lookup or flush:
///
/// ```text
///   merge ──► insert/update/remove ──► pending buffers
///                                           │ flush()
///                                           ▼
///   load <id>.txt ──► apply updates/inserts ──► physical deletes
///        ──► rebuild filter ──► write <id>.txt ──► drop table
/// ```
///
/// Persistence is best-effort: read failures are logged and the segment is
/// treated as empty; write failures are logged and the flush is lost.
pub struct Segment {
    id: u64,
    path: PathBuf,
    filter: BloomFilter,
    /// Table height at the end of the last flush.
    last_height: u32,
    changed: bool,
    new_nodes: Vec<Pending>,
    tombstones: Vec<Key>,
}

impl Segment {
    /// Create an empty segment. Nothing touches disk until the first flush.
    pub fn new(dir: &Path, id: u64, filter_capacity: usize, false_positive_rate: f64) -> Self {
        Segment {
            id,
            path: file::segment_path(dir, id),
            filter: BloomFilter::new(filter_capacity, false_positive_rate),
            last_height: 0,
            changed: false,
            new_nodes: Vec::new(),
            tombstones: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// false → the segment definitely doesn't hold `key`.
    pub fn may_contain(&self, key: Key) -> bool {
        self.filter.may_contain(key)
    }

    /// Point lookup. Loads the table, searches, and drops it again.
    pub fn find(&self, key: Key) -> Option<Value> {
        let table = self.load_table();
        table.find(&key).and_then(|node| node.value().cloned())
    }

    /// Append a brand-new key. It is registered in the filter right away so
    /// lookups can find it once flushed.
    pub fn insert(&mut self, key: Key, value: Value) {
        self.changed = true;
        self.filter.insert(key);
        self.new_nodes.push(Pending::Insert(key, value));
    }

    /// Overwrite `key` at the next flush, if the table holds it.
    pub fn update(&mut self, key: Key, value: Value) {
        self.changed = true;
        self.new_nodes.push(Pending::Update(key, value));
    }

    /// Physically delete `key` at the next flush.
    pub fn remove(&mut self, key: Key) {
        self.changed = true;
        self.tombstones.push(key);
    }

    /// True if there is buffered work for the next flush.
    pub fn is_dirty(&self) -> bool {
        self.changed
    }

    /// Number of buffered inserts and updates.
    pub fn pending(&self) -> usize {
        self.new_nodes.len()
    }

    /// Table height, estimated without touching disk:
    /// `last_height + floor(log2(pending))`.
    pub fn height(&self) -> u32 {
        match self.new_nodes.len() {
            0 => self.last_height,
            n => self.last_height + n.ilog2(),
        }
    }

    /// Apply buffered writes and persist the table. No-op unless dirty.
    ///
    /// Returns the keys whose [`update`](Self::update) found the key in the
    /// table and therefore landed here.
    pub fn flush(&mut self) -> Vec<Key> {
        if !self.changed {
            return Vec::new();
        }

        let mut table = self.load_table();

        let mut updated = Vec::new();
        for pending in self.new_nodes.drain(..) {
            match pending {
                Pending::Insert(key, value) => table.insert(key, value),
                Pending::Update(key, value) => {
                    if table.update(&key, Some(value), false) {
                        updated.push(key);
                    }
                }
            }
        }

        for key in self.tombstones.drain(..) {
            table.delete(&key);
        }

        let mut builder =
            FilterBuilder::new(self.filter.capacity(), self.filter.false_positive_rate());
        builder.extend(table.iter().map(|node| *node.key()));
        self.filter = builder.build();
        self.last_height = table.height();

        log::debug!(
            "flushing segment {} ({} records, height {}, {} updated)",
            self.id,
            table.len(),
            self.last_height,
            updated.len()
        );
        if let Err(e) = file::write_table(&self.path, &table) {
            log::error!("failed to write segment {}: {e}", self.path.display());
        }

        self.changed = false;
        updated
    }

    /// Load, copy out every record in ascending key order, and drop the table.
    pub fn snapshot(&self) -> Vec<(Key, Value)> {
        let table = self.load_table();
        table
            .iter()
            .filter_map(|node| node.value().map(|value| (*node.key(), value.clone())))
            .collect()
    }

    fn load_table(&self) -> OrderedMap<Key, Value> {
        file::read_table(&self.path).unwrap_or_else(|e| {
            log::error!("failed to read segment {}: {e}", self.path.display());
            OrderedMap::new()
        })
    }
}
