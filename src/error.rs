//! Error types for the persistence layer.
//!
//! The UI never matches on these variants beyond logging them; it surfaces the
//! root cause to the user. Keeping them typed still lets tests assert which
//! step of the open/list/load pipeline failed.

use std::path::PathBuf;

/// Result alias used by everything under `db`.
pub type DbResult<T> = std::result::Result<T, DbError>;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The file could not be opened as a SQLite database.
    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The catalog query failed, which is how corrupt or non-database files
    /// show up.
    #[error("failed to read the table list")]
    Catalog(#[source] rusqlite::Error),

    /// Reading a single table failed.
    #[error("failed to read table {table}")]
    Query {
        table: String,
        #[source]
        source: rusqlite::Error,
    },
}
