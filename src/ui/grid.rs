use std::ops::Range;

use crate::models::TableData;

use super::helpers::flatten_cell;

/// A loaded table plus the display-ready copy the grid pane draws from.
/// Widths and flattened cell text are computed once per load, never per frame.
pub(crate) struct GridView {
    pub(crate) data: TableData,
    pub(crate) widths: Vec<u16>,
    pub(crate) header: Vec<String>,
    pub(crate) cells: Vec<Vec<String>>,
}

impl GridView {
    pub(crate) fn new(data: TableData) -> Self {
        let widths = data.column_widths();
        let header = data.columns.iter().map(|name| flatten_cell(name)).collect();
        let cells = data
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| flatten_cell(cell)).collect())
            .collect();
        Self {
            data,
            widths,
            header,
            cells,
        }
    }

    pub(crate) fn row_count(&self) -> usize {
        self.data.row_count()
    }

    pub(crate) fn column_count(&self) -> usize {
        self.data.column_count()
    }
}

/// Rows that fit in `height` lines while keeping `selected` on screen. The
/// selection sits on the last visible line once it scrolls past the first page.
pub(crate) fn visible_window(selected: usize, len: usize, height: usize) -> Range<usize> {
    if len == 0 || height == 0 {
        return 0..0;
    }
    let selected = selected.min(len - 1);
    let start = (selected + 1).saturating_sub(height);
    start..(start + height).min(len)
}
