//! Interactive front end.
//!
//! ```text
//! avl-lsm [DIR]
//! > ins 1 one
//! > find 1
//! one
//! > rem 1
//! > print
//! ```
//!
//! Segment files from a previous run in DIR (default: current directory) are
//! deleted on startup.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use avl_lsm::segment::file::remove_leftovers;
use avl_lsm::{Command, Db, Options};

fn main() -> avl_lsm::Result<()> {
    env_logger::init();

    let dir = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    let options = Options::new(dir);

    let removed = remove_leftovers(&options.dir, options.first_segment_id)?;
    if removed > 0 {
        log::info!("removed {removed} segment files from a previous run");
    }

    let mut db = Db::open(options)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Insert { key, value }) => db.insert(key, value),
            Ok(Command::Remove { key }) => db.remove(key),
            Ok(Command::Find { key }) => match db.get(key) {
                Some(value) => writeln!(stdout, "{value}")?,
                None => writeln!(stdout, "not found")?,
            },
            Ok(Command::Print) => write!(stdout, "{}", db.print_in_memory_root())?,
            Ok(Command::Stats) => writeln!(stdout, "{:?}", db.stats())?,
            Ok(Command::Quit) => break,
            Err(e) => writeln!(stdout, "{e}")?,
        }
        stdout.flush()?;
    }

    Ok(())
}
