//! Front-end errors and source locations.

use std::fmt;
use std::path::PathBuf;

/// A file name plus 0-based line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Error that can occur while loading or parsing source files.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("cannot read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to initialize TypeScript grammar: {0}")]
    Language(String),

    #[error("{location}: {message}")]
    Syntax { location: Location, message: String },
}
