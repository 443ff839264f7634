//! # AVL-backed LSM Storage Engine
//!
//! A small key-value engine using the Log-Structured Merge-Tree design.
//!
//! ## Core idea
//! Writes go to an in-memory AVL tree (the memtable). Once the tree grows
//! taller than a height budget it is merged into on-disk segments: keys that
//! a segment already holds are updated or physically deleted there, new keys
//! are appended to the newest segment. Each segment carries a bloom filter so
//! reads can skip segments that definitely don't hold a key.
//!
//! ```text
//!   insert/remove ──► memtable (AVL) ──► merge ──► segment 0, 1, 2, ...
//!   get ──► memtable ──► filter? ──► segment table
//! ```

pub mod bloom;
pub mod command;
pub mod db;
pub mod error;
pub mod memtable;
pub mod segment;
pub mod tree;
pub mod types;

// Public re-exports for the top-level API
pub use command::Command;
pub use db::{Db, Options, Stats};
pub use error::{Error, Result};
pub use tree::OrderedMap;
