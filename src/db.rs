use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::memtable::{Lookup, MemTable};
use crate::segment::Segment;
use crate::types::{Key, Value};

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct Options {
    /// Directory holding the segment files.
    pub dir: PathBuf,
    /// Memtable height budget; a merge runs once the tree is taller.
    pub max_height: u32,
    /// Target false positive rate of every segment filter.
    pub false_positive_rate: f64,
    /// Id of the first segment. Later segments count up from here.
    pub first_segment_id: u64,
}

impl Options {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Options {
            dir: dir.into(),
            max_height: 2,
            false_positive_rate: 0.01,
            first_segment_id: 0,
        }
    }

    pub fn max_height(mut self, max_height: u32) -> Self {
        self.max_height = max_height;
        self
    }

    pub fn false_positive_rate(mut self, rate: f64) -> Self {
        self.false_positive_rate = rate;
        self
    }

    pub fn first_segment_id(mut self, id: u64) -> Self {
        self.first_segment_id = id;
        self
    }

    /// Keys each segment filter is sized for: `max_height² - 1`, at least 1.
    pub fn filter_capacity(&self) -> usize {
        let h = self.max_height as usize;
        h.saturating_mul(h).saturating_sub(1).max(1)
    }

    fn validate(&self) -> Result<()> {
        if self.max_height == 0 {
            return Err(Error::InvalidOptions("max_height must be at least 1".into()));
        }
        if !(self.false_positive_rate > 0.0 && self.false_positive_rate < 1.0) {
            return Err(Error::InvalidOptions(format!(
                "false_positive_rate must be in (0, 1), got {}",
                self.false_positive_rate
            )));
        }
        Ok(())
    }
}

/// Point-in-time counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub memtable_len: usize,
    pub memtable_height: u32,
    pub segments: usize,
    pub merges: u64,
}

/// The LSM engine: one AVL memtable over an append-only list of segments.
///
/// Write path: every insert/remove lands in the memtable. When the memtable
/// grows taller than `max_height`, [`merge`](Self::merge) drains it into the
/// segments inline, before the call returns.
///
/// Read path: memtable first (a tombstone there is final), then every segment
/// in creation order whose filter may hold the key.
///
/// Single-threaded: all methods take `&self`/`&mut self` and all I/O blocks.
pub struct Db {
    options: Options,
    memtable: MemTable,
    segments: Vec<Segment>,
    next_segment_id: u64,
    merges: u64,
}

impl Db {
    /// Open an engine over `options.dir`, starting with one empty segment.
    ///
    /// Segment files left by a previous run are not read; remove them first
    /// with [`remove_leftovers`](crate::segment::file::remove_leftovers).
    pub fn open(options: Options) -> Result<Self> {
        options.validate()?;
        fs::create_dir_all(&options.dir)?;
        log::info!(
            "opening engine at {} (max_height {})",
            options.dir.display(),
            options.max_height
        );

        let mut db = Db {
            memtable: MemTable::new(options.max_height),
            segments: Vec::new(),
            next_segment_id: options.first_segment_id,
            merges: 0,
            options,
        };
        db.push_segment();
        Ok(db)
    }

    /// Insert or overwrite `key`.
    pub fn insert(&mut self, key: Key, value: impl Into<Value>) {
        self.memtable.put(key, value.into());
        if self.memtable.is_full() {
            self.merge();
        }
    }

    /// Delete `key`. Recorded as a memtable tombstone even if the key was
    /// never seen, so older segment copies stay shadowed.
    pub fn remove(&mut self, key: Key) {
        self.memtable.delete(key);
        if self.memtable.is_full() {
            self.merge();
        }
    }

    /// Latest value of `key`, or `None` if absent or deleted.
    pub fn get(&self, key: Key) -> Option<Value> {
        match self.memtable.get(key) {
            Lookup::Live(value) => return Some(value.to_string()),
            Lookup::Deleted => return None,
            Lookup::Absent => {}
        }

        self.segments
            .iter()
            .filter(|segment| segment.may_contain(key))
            .find_map(|segment| segment.find(key))
    }

    /// Drain the memtable into the segments.
    ///
    /// 1. Plan: every memtable record is queued on each segment whose filter
    ///    may hold its key, as an update (live) or a delete (tombstone)
    /// 2. Flush: segments apply the queue and rebuild their filters
    /// 3. Apply new: live records no update landed for are appended to the
    ///    last segment, or to a fresh one once it reaches the height budget
    /// 4. Flush again, then start a new empty memtable
    ///
    /// Tombstones that matched no segment are dropped: the key exists nowhere.
    pub fn merge(&mut self) {
        if self.memtable.is_empty() {
            return;
        }
        log::debug!(
            "merging memtable ({} records, height {}) into {} segments",
            self.memtable.len(),
            self.memtable.height(),
            self.segments.len()
        );

        for node in self.memtable.iter() {
            let key = *node.key();
            for segment in self.segments.iter_mut().filter(|s| s.may_contain(key)) {
                log::trace!("planning key {key} on segment {}", segment.id());
                match node.value() {
                    Some(value) if !node.is_tombstone() => segment.update(key, value.clone()),
                    _ => segment.remove(key),
                }
            }
        }

        let mut written: HashSet<Key> = HashSet::new();
        for segment in &mut self.segments {
            written.extend(segment.flush());
        }

        let fresh: Vec<(Key, Value)> = self
            .memtable
            .iter()
            .filter(|node| !node.is_tombstone() && !written.contains(node.key()))
            .filter_map(|node| node.value().map(|value| (*node.key(), value.clone())))
            .collect();

        let max_height = self.options.max_height;
        for (key, value) in fresh {
            if self.segments.last().is_none_or(|tail| tail.height() >= max_height) {
                self.push_segment();
            }
            if let Some(tail) = self.segments.last_mut() {
                tail.insert(key, value);
            }
        }

        for segment in &mut self.segments {
            segment.flush();
        }

        self.memtable = MemTable::new(max_height);
        self.merges += 1;
    }

    /// Tree diagram of the memtable, for diagnostics.
    pub fn print_in_memory_root(&self) -> String {
        self.memtable.render()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn dir(&self) -> &Path {
        &self.options.dir
    }

    pub fn stats(&self) -> Stats {
        Stats {
            memtable_len: self.memtable.len(),
            memtable_height: self.memtable.height(),
            segments: self.segments.len(),
            merges: self.merges,
        }
    }

    fn push_segment(&mut self) {
        let id = self.next_segment_id;
        self.next_segment_id += 1;
        log::debug!("creating segment {id}");
        self.segments.push(Segment::new(
            &self.options.dir,
            id,
            self.options.filter_capacity(),
            self.options.false_positive_rate,
        ));
    }
}
