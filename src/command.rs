use std::str::FromStr;

use crate::error::Error;
use crate::types::{Key, Value};

/// One line of input to the interactive front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `ins <key> <value>`
    Insert { key: Key, value: Value },
    /// `rem <key>`
    Remove { key: Key },
    /// `find <key>`
    Find { key: Key },
    /// `print`
    Print,
    /// `stats`
    Stats,
    /// `quit` / `exit`
    Quit,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut args = line.split_whitespace();
        let name = args
            .next()
            .ok_or_else(|| Error::InvalidCommand("empty line".into()))?;

        let command = match name {
            "ins" => Command::Insert {
                key: parse_key(args.next())?,
                value: args
                    .next()
                    .ok_or_else(|| Error::InvalidCommand("ins: missing value".into()))?
                    .to_string(),
            },
            "rem" => Command::Remove {
                key: parse_key(args.next())?,
            },
            "find" => Command::Find {
                key: parse_key(args.next())?,
            },
            "print" => Command::Print,
            "stats" => Command::Stats,
            "quit" | "exit" => Command::Quit,
            other => return Err(Error::InvalidCommand(format!("unknown command {other:?}"))),
        };

        if let Some(extra) = args.next() {
            return Err(Error::InvalidCommand(format!(
                "{name}: unexpected argument {extra:?}"
            )));
        }
        Ok(command)
    }
}

fn parse_key(arg: Option<&str>) -> Result<Key, Error> {
    let arg = arg.ok_or_else(|| Error::InvalidCommand("missing key".into()))?;
    arg.parse()
        .map_err(|_| Error::InvalidCommand(format!("key {arg:?} is not an integer")))
}
