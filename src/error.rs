use std::fmt;
use std::io;

/// Unified error type for the storage engine.
///
/// Lookups never fail: a missing key is `None`, not an error. Segment
/// persistence errors are produced here but swallowed (and logged) at the
/// segment boundary, so callers of `Db::insert`/`remove`/`get` never see them.
#[derive(Debug)]
pub enum Error {
    /// IO error from disk operations.
    Io(io::Error),
    /// A segment file line could not be parsed.
    Corruption(String),
    /// Rejected engine configuration.
    InvalidOptions(String),
    /// A front-end line that is not a known command.
    InvalidCommand(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {e}"),
            Error::Corruption(msg) => write!(f, "Corruption: {msg}"),
            Error::InvalidOptions(msg) => write!(f, "Invalid options: {msg}"),
            Error::InvalidCommand(msg) => write!(f, "Invalid command: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

/// Result type alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;
