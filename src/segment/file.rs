use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::tree::OrderedMap;
use crate::types::{Key, Value};

/// Location of segment `id` inside `dir`: `<dir>/<id>.txt`.
pub fn segment_path(dir: &Path, id: u64) -> PathBuf {
    dir.join(format!("{id}.txt"))
}

/// Read a segment file into a fresh table.
///
/// Format: one `"<key> <value>"` line per record, keys ascending. The value is
/// everything after the first space. A missing file reads as an empty table.
pub fn read_table(path: &Path) -> Result<OrderedMap<Key, Value>> {
    let mut table = OrderedMap::new();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(table),
        Err(e) => return Err(e.into()),
    };

    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let (key, value) = parse_line(&line).ok_or_else(|| {
            Error::Corruption(format!(
                "{}:{}: malformed record {line:?}",
                path.display(),
                lineno + 1
            ))
        })?;
        table.insert(key, value.to_string());
    }

    Ok(table)
}

/// Overwrite a segment file with the table's records in ascending key order.
///
/// Tombstones are not persisted.
pub fn write_table(path: &Path, table: &OrderedMap<Key, Value>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);

    for node in table.iter().filter(|node| !node.is_tombstone()) {
        if let Some(value) = node.value() {
            writeln!(writer, "{} {}", node.key(), value)?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Delete segment files left over from a previous run.
///
/// Removes `<first_id>.txt`, `<first_id + 1>.txt`, ... up to the first id with
/// no file. Returns how many files were removed.
pub fn remove_leftovers(dir: &Path, first_id: u64) -> Result<usize> {
    let mut removed = 0;
    let mut id = first_id;

    loop {
        match fs::remove_file(segment_path(dir, id)) {
            Ok(()) => {
                removed += 1;
                id += 1;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(removed),
            Err(e) => return Err(e.into()),
        }
    }
}

fn parse_line(line: &str) -> Option<(Key, &str)> {
    let (key, value) = line.split_once(' ')?;
    Some((key.parse().ok()?, value))
}
