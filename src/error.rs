use std::path::PathBuf;

/// Errors raised by the library.
///
/// Schema and value anomalies are not represented here: an unknown declared
/// type or a malformed date resolves to a fallback value plus a diagnostic.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not find database file '{}'", .0.display())]
    MissingDatabase(PathBuf),

    #[error("Database '{}' is already open; close it before opening '{}'", .open.display(), .requested.display())]
    AlreadyOpen { open: PathBuf, requested: PathBuf },

    #[error("Database used before it was opened")]
    NotOpen,

    #[error("Column layout mismatch for '{table}': record expects {expected:?}, query returned {actual:?}")]
    ColumnMismatch {
        table: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Row has {available} columns but the record tried to read column {index}")]
    ColumnOutOfRange { index: usize, available: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
