use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::models::TableData;

use super::catalog::list_tables;
use super::tables::load_table;

/// A single opened database file together with the table list discovered when
/// it was opened. Dropping the value closes the connection.
pub struct Database {
    conn: Connection,
    path: PathBuf,
    tables: Vec<String>,
}

impl Database {
    /// Open `path` read-only and read its catalog straight away. Files that are
    /// not SQLite databases only fail once a query runs, so doing the catalog
    /// read here means a bad file never produces a half-open `Database`.
    pub fn open(path: &Path) -> DbResult<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|source| DbError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let tables = list_tables(&conn)?;
        info!(path = %path.display(), tables = tables.len(), "opened database");

        Ok(Self {
            conn,
            path: path.to_path_buf(),
            tables,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Re-read the catalog, picking up tables created or dropped since open.
    pub fn refresh_tables(&mut self) -> DbResult<&[String]> {
        self.tables = list_tables(&self.conn)?;
        Ok(&self.tables)
    }

    /// Load the full contents of one table.
    pub fn load_table(&self, table: &str) -> DbResult<TableData> {
        load_table(&self.conn, table)
    }
}
