use rusqlite::Connection;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Enumerate user tables in catalog order. Views, indexes, and the engine's
/// own `sqlite_`-prefixed tables are left out; the underscore is escaped so a
/// user table such as `sqliteish` still shows up.
pub(crate) fn list_tables(conn: &Connection) -> DbResult<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT name
             FROM sqlite_master
             WHERE type = 'table'
               AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'",
        )
        .map_err(DbError::Catalog)?;

    let tables = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(DbError::Catalog)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbError::Catalog)?;

    debug!(count = tables.len(), "listed user tables");
    Ok(tables)
}
