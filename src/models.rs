//! Plain data holders passed from the persistence layer to the TUI. A loaded
//! table is fully materialized as display strings so rendering never has to
//! touch the connection again.

use std::fmt;

use crate::config::MAX_COLUMN_WIDTH;

#[derive(Debug, Clone, PartialEq, Eq)]
/// The complete contents of one table, ready to render as a grid.
pub struct TableData {
    /// Name of the table the rows were read from.
    pub name: String,
    /// Column labels in declaration order. These become the header row.
    pub columns: Vec<String>,
    /// One entry per data row, each holding exactly `columns.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Width of every column: the widest of the header and its cells, capped
    /// at `MAX_COLUMN_WIDTH` so one long text value cannot push the rest of the
    /// grid off screen.
    pub fn column_widths(&self) -> Vec<u16> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, header)| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0);
                (widest.min(MAX_COLUMN_WIDTH as usize) as u16).max(1)
            })
            .collect()
    }
}

impl fmt::Display for TableData {
    /// Summary used in the header line, e.g. `users: 3 rows × 2 columns`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} rows × {} columns",
            self.name,
            self.row_count(),
            self.column_count()
        )
    }
}
