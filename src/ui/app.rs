use std::mem;
use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap,
};
use ratatui::Frame;
use tracing::{info, warn};

use crate::config::PAGE_STEP;
use crate::db::Database;
use crate::error::DbError;
use crate::models::TableData;

use super::grid::{visible_window, GridView};
use super::helpers::{centered_rect, surface_error};
use super::picker::{FilePicker, PickerOutcome};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the header block showing the open file.
const HEADER_HEIGHT: u16 = 3;
/// Width of the table selector pane.
const TABLE_PANE_WIDTH: u16 = 28;
/// Selector text shown before any database is open.
const NO_DATABASE_PLACEHOLDER: &str = "No database loaded";

/// Interaction modes layered over the main view. Only one can be active, which
/// keeps keyboard routing unambiguous.
enum Mode {
    Normal,
    PickingFile(FilePicker),
    Message(Message),
}

/// Which pane receives navigation keys in `Mode::Normal`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Tables,
    Grid,
}

/// Severity levels shared by the footer and modal messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// A modal message box. It blocks other input until dismissed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
    pub kind: StatusKind,
}

impl Message {
    fn warning(title: &str, body: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            body: body.into(),
            kind: StatusKind::Warning,
        }
    }

    fn error(body: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            body: body.into(),
            kind: StatusKind::Error,
        }
    }
}

/// Central application state: the open database, the table selector, and the
/// currently loaded grid.
pub struct App {
    database: Option<Database>,
    selected_table: usize,
    grid: Option<GridView>,
    grid_row: usize,
    grid_column_offset: usize,
    focus: Focus,
    mode: Mode,
    status: Option<StatusMessage>,
    start_dir: PathBuf,
}

impl App {
    /// `start_dir` is where the file picker opens until a database is loaded.
    pub fn new(start_dir: PathBuf) -> Self {
        Self {
            database: None,
            selected_table: 0,
            grid: None,
            grid_row: 0,
            grid_column_offset: 0,
            focus: Focus::Tables,
            mode: Mode::Normal,
            status: None,
            start_dir,
        }
    }

    /// Route one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::PickingFile(picker) => self.handle_picker_key(code, picker),
            Mode::Message(message) => self.handle_message_key(code, message),
        };

        exit
    }

    /// Open `path`, replacing the current database on success. Failures leave
    /// everything as it was and raise an error message.
    pub fn open_database(&mut self, path: &Path) {
        self.mode = self.open_file(path);
    }

    /// Load the table highlighted in the selector into the grid.
    pub fn load_selected_table(&mut self) {
        self.mode = self.load_selected();
    }

    /// Re-read the table list of the open database.
    pub fn reload_tables(&mut self) {
        self.mode = self.refresh_catalog();
    }

    /// Highlight `name` in the selector. Returns `false` if it is not listed.
    pub fn select_table(&mut self, name: &str) -> bool {
        match self.table_names().iter().position(|table| table == name) {
            Some(idx) => {
                self.selected_table = idx;
                true
            }
            None => false,
        }
    }

    pub fn database_path(&self) -> Option<&Path> {
        self.database.as_ref().map(Database::path)
    }

    pub fn table_names(&self) -> &[String] {
        self.database
            .as_ref()
            .map(Database::tables)
            .unwrap_or_default()
    }

    pub fn selected_table(&self) -> Option<&str> {
        self.table_names()
            .get(self.selected_table)
            .map(String::as_str)
    }

    pub fn grid(&self) -> Option<&TableData> {
        self.grid.as_ref().map(|view| &view.data)
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// The modal message currently on screen, if any.
    pub fn message(&self) -> Option<&Message> {
        match &self.mode {
            Mode::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_picking_file(&self) -> bool {
        matches!(self.mode, Mode::PickingFile(_))
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Char('o') | KeyCode::Char('O') => {
                self.clear_status();
                return Mode::PickingFile(FilePicker::new(self.picker_start_dir()));
            }
            KeyCode::Char('r') | KeyCode::Char('R') => return self.refresh_catalog(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Tables => Focus::Grid,
                    Focus::Grid => Focus::Tables,
                };
            }
            _ => match self.focus {
                Focus::Tables => match code {
                    KeyCode::Up => self.move_table_selection(-1),
                    KeyCode::Down => self.move_table_selection(1),
                    KeyCode::PageUp => self.move_table_selection(-PAGE_STEP),
                    KeyCode::PageDown => self.move_table_selection(PAGE_STEP),
                    KeyCode::Home => self.selected_table = 0,
                    KeyCode::End => {
                        self.selected_table = self.table_names().len().saturating_sub(1)
                    }
                    KeyCode::Enter => return self.load_selected(),
                    _ => {}
                },
                Focus::Grid => match code {
                    KeyCode::Up => self.move_grid_row(-1),
                    KeyCode::Down => self.move_grid_row(1),
                    KeyCode::PageUp => self.move_grid_row(-PAGE_STEP),
                    KeyCode::PageDown => self.move_grid_row(PAGE_STEP),
                    KeyCode::Home => self.grid_row = 0,
                    KeyCode::End => {
                        self.grid_row = self
                            .grid
                            .as_ref()
                            .map(|grid| grid.row_count().saturating_sub(1))
                            .unwrap_or(0)
                    }
                    KeyCode::Left => self.scroll_columns(-1),
                    KeyCode::Right => self.scroll_columns(1),
                    _ => {}
                },
            },
        }
        Mode::Normal
    }

    fn handle_picker_key(&mut self, code: KeyCode, mut picker: FilePicker) -> Mode {
        match picker.handle_key(code) {
            PickerOutcome::Pending => Mode::PickingFile(picker),
            PickerOutcome::Cancelled => {
                self.set_status("Open cancelled.", StatusKind::Info);
                Mode::Normal
            }
            PickerOutcome::Chosen(path) => self.open_file(&path),
        }
    }

    fn handle_message_key(&mut self, code: KeyCode, message: Message) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Mode::Normal,
            _ => Mode::Message(message),
        }
    }

    fn open_file(&mut self, path: &Path) -> Mode {
        let database = match Database::open(path) {
            Ok(database) => database,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "open failed");
                return self.fail("Failed to open database", err);
            }
        };

        let count = database.tables().len();
        // Replacing the option drops, and so closes, the previous connection.
        self.database = Some(database);
        self.selected_table = 0;
        self.grid = None;
        self.grid_row = 0;
        self.grid_column_offset = 0;
        self.focus = Focus::Tables;

        if count == 0 {
            self.set_status("No user tables found.", StatusKind::Warning);
            return Mode::Message(Message::warning(
                "No Tables",
                "No user tables found in the database.",
            ));
        }

        self.set_status(
            format!("Opened {} ({count} tables).", path.display()),
            StatusKind::Info,
        );
        Mode::Normal
    }

    fn load_selected(&mut self) -> Mode {
        let Some(database) = self.database.as_ref() else {
            return Mode::Message(Message::warning("No DB", "No database is open yet!"));
        };
        let Some(name) = database.tables().get(self.selected_table).cloned() else {
            return Mode::Normal;
        };

        match database.load_table(&name) {
            Ok(data) => {
                info!(
                    table = %name,
                    rows = data.row_count(),
                    columns = data.column_count(),
                    "table loaded"
                );
                self.set_status(format!("Loaded {data}."), StatusKind::Info);
                self.grid = Some(GridView::new(data));
                self.grid_row = 0;
                self.grid_column_offset = 0;
                Mode::Normal
            }
            Err(err) => {
                warn!(table = %name, error = %err, "table load failed");
                self.fail("Failed to read table", err)
            }
        }
    }

    fn refresh_catalog(&mut self) -> Mode {
        let Some(database) = self.database.as_mut() else {
            return Mode::Message(Message::warning("No DB", "No database is open yet!"));
        };

        match database.refresh_tables().map(|tables| tables.len()) {
            Ok(count) => {
                if self.selected_table >= count {
                    self.selected_table = count.saturating_sub(1);
                }
                self.set_status(
                    format!("Table list reloaded ({count} tables)."),
                    StatusKind::Info,
                );
                Mode::Normal
            }
            Err(err) => {
                warn!(error = %err, "table list reload failed");
                self.fail("Failed to reload tables", err)
            }
        }
    }

    fn fail(&mut self, action: &str, err: DbError) -> Mode {
        let err = anyhow::Error::from(err);
        let text = format!("{action}: {}", surface_error(&err));
        self.set_status(text.clone(), StatusKind::Error);
        Mode::Message(Message::error(text))
    }

    fn picker_start_dir(&self) -> PathBuf {
        self.database_path()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.start_dir.clone())
    }

    fn move_table_selection(&mut self, offset: isize) {
        let len = self.table_names().len();
        if len == 0 {
            return;
        }
        let new = (self.selected_table as isize + offset).clamp(0, len as isize - 1);
        self.selected_table = new as usize;
    }

    fn move_grid_row(&mut self, offset: isize) {
        let Some(len) = self.grid.as_ref().map(GridView::row_count) else {
            return;
        };
        if len == 0 {
            return;
        }
        let new = (self.grid_row as isize + offset).clamp(0, len as isize - 1);
        self.grid_row = new as usize;
    }

    fn scroll_columns(&mut self, offset: isize) {
        let Some(len) = self.grid.as_ref().map(GridView::column_count) else {
            return;
        };
        if len == 0 {
            return;
        }
        let new = (self.grid_column_offset as isize + offset).clamp(0, len as isize - 1);
        self.grid_column_offset = new as usize;
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(TABLE_PANE_WIDTH), Constraint::Min(0)])
            .split(chunks[1]);
        self.draw_table_list(frame, panes[0]);
        self.draw_grid(frame, panes[1]);

        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::PickingFile(picker) => self.draw_picker(frame, area, picker),
            Mode::Message(message) => self.draw_message(frame, area, message),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = match self.database_path() {
            Some(path) => vec![
                Span::styled("Database: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(path.display().to_string()),
            ],
            None => vec![Span::styled(
                NO_DATABASE_PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            )],
        };
        if let Some(grid) = &self.grid {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(
                grid.data.to_string(),
                Style::default().fg(Color::Cyan),
            ));
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title("SQLite DB Reader"),
        );
        frame.render_widget(header, area);
    }

    fn pane_block(&self, title: String, pane: Focus) -> Block<'static> {
        let border_style = if self.focus == pane && matches!(self.mode, Mode::Normal) {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style)
    }

    fn draw_table_list(&self, frame: &mut Frame, area: Rect) {
        let block = self.pane_block("Tables".to_string(), Focus::Tables);

        if self.database.is_none() {
            let placeholder = Paragraph::new(NO_DATABASE_PLACEHOLDER)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        let items: Vec<ListItem> = self
            .table_names()
            .iter()
            .map(|name| ListItem::new(name.clone()))
            .collect();
        if items.is_empty() {
            let placeholder = Paragraph::new("No user tables")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected_table));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_grid(&self, frame: &mut Frame, area: Rect) {
        let Some(grid) = &self.grid else {
            let block = self.pane_block("Rows".to_string(), Focus::Grid);
            let hint = if self.database.is_some() {
                "Select a table and press Enter to load it."
            } else {
                "Press 'o' to open a database file."
            };
            let message = Paragraph::new(hint)
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        };

        let block = self.pane_block(grid.data.to_string(), Focus::Grid);
        let offset = self.grid_column_offset.min(grid.column_count());
        let widths: Vec<Constraint> = grid
            .widths
            .iter()
            .skip(offset)
            .map(|width| Constraint::Length(*width))
            .collect();

        let header = Row::new(grid.header.iter().skip(offset).map(String::as_str)).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

        // Borders take two lines and the header one; only rows that fit are built.
        let body_height = area.height.saturating_sub(3) as usize;
        let window = visible_window(self.grid_row, grid.row_count(), body_height);
        let first = window.start;
        let rows = grid.cells[window]
            .iter()
            .map(|row| Row::new(row.iter().skip(offset).map(String::as_str)));

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut table_state = TableState::default();
        if self.focus == Focus::Grid && grid.row_count() > 0 {
            table_state.select(Some(self.grid_row - first));
        }
        frame.render_stateful_widget(table, area, &mut table_state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match (&self.mode, self.focus) {
            (Mode::PickingFile(_), _) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open   "),
                ("[Backspace]", " Up a folder   "),
                ("[Tab]", " File type   "),
                ("[Esc]", " Cancel"),
            ],
            (Mode::Message(_), _) => &[("[Enter]", " Dismiss")],
            (Mode::Normal, Focus::Tables) => &[
                ("[o]", " Open File   "),
                ("[↑↓]", " Select Table   "),
                ("[Enter]", " Load Table   "),
                ("[r]", " Reload List   "),
                ("[Tab]", " Grid   "),
                ("[q]", " Quit"),
            ],
            (Mode::Normal, Focus::Grid) => &[
                ("[↑↓]", " Rows   "),
                ("[←→]", " Columns   "),
                ("[PgUp/PgDn]", " Page   "),
                ("[Tab]", " Tables   "),
                ("[o]", " Open File   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_picker(&self, frame: &mut Frame, area: Rect, picker: &FilePicker) {
        let popup_area = centered_rect(70, 70, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Select SQLite DB File")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let location = Paragraph::new(Line::from(vec![
            Span::styled("Look in: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(picker.dir.display().to_string()),
        ]));
        frame.render_widget(location, chunks[0]);

        let items: Vec<ListItem> = picker
            .entries
            .iter()
            .map(|entry| ListItem::new(entry.label()))
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        if !picker.entries.is_empty() {
            list_state.select(Some(picker.selected));
        }
        frame.render_stateful_widget(list, chunks[1], &mut list_state);

        let bottom = match &picker.error {
            Some(error) => Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(vec![
                Span::styled("Files of type: ", Style::default().fg(Color::Gray)),
                Span::raw(picker.filter.label()),
            ]),
        };
        frame.render_widget(Paragraph::new(bottom), chunks[2]);
    }

    fn draw_message(&self, frame: &mut Frame, area: Rect, message: &Message) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(message.title.clone())
            .borders(Borders::ALL)
            .border_style(message.kind.style());

        let lines = vec![
            Line::from(message.body.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to dismiss",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}
