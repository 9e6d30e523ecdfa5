use std::fmt::Write as _;

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::models::TableData;

/// Read every row and column of `table` into memory as display strings.
///
/// The name is spliced into the statement text as a quoted identifier rather
/// than bound, since SQLite cannot bind identifiers. Callers pass names that
/// came from `list_tables`.
pub(crate) fn load_table(conn: &Connection, table: &str) -> DbResult<TableData> {
    let query_err = |source: rusqlite::Error| DbError::Query {
        table: table.to_string(),
        source,
    };

    let sql = format!("SELECT * FROM {}", quote_identifier(table));
    let mut stmt = conn.prepare(&sql).map_err(query_err)?;

    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut cursor = stmt.query([]).map_err(query_err)?;
    while let Some(row) = cursor.next().map_err(query_err)? {
        let mut cells = Vec::with_capacity(width);
        for idx in 0..width {
            let value = row.get_ref(idx).map_err(query_err)?;
            cells.push(render_value(value));
        }
        rows.push(cells);
    }

    debug!(table, rows = rows.len(), columns = width, "loaded table");
    Ok(TableData {
        name: table.to_string(),
        columns,
        rows,
    })
}

/// Render a single SQLite value the way the grid shows it.
fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(int) => int.to_string(),
        ValueRef::Real(real) => real.to_string(),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Blob(bytes) => {
            let mut hex = String::with_capacity(bytes.len() * 2 + 3);
            hex.push_str("x'");
            for byte in bytes {
                let _ = write!(hex, "{byte:02x}");
            }
            hex.push('\'');
            hex
        }
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
