/// Keys handled by the engine. Segment filters hash their little-endian bytes.
pub type Key = i64;

/// Values handled by the engine, stored verbatim in segment files.
pub type Value = String;
