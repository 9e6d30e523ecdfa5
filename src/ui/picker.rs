use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use tracing::warn;

use crate::config::{is_database_file, PAGE_STEP};

/// Which files the picker lists besides directories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FileFilter {
    Databases,
    All,
}

impl FileFilter {
    pub(crate) fn label(self) -> &'static str {
        match self {
            FileFilter::Databases => "SQLite DB Files (*.db, *.sqlite, *.sqlite3)",
            FileFilter::All => "All Files (*)",
        }
    }

    fn toggled(self) -> Self {
        match self {
            FileFilter::Databases => FileFilter::All,
            FileFilter::All => FileFilter::Databases,
        }
    }

    fn accepts(self, name: &str) -> bool {
        match self {
            FileFilter::Databases => is_database_file(name),
            FileFilter::All => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum EntryKind {
    Parent,
    Directory,
    File,
}

#[derive(Clone, Debug)]
pub(crate) struct PickerEntry {
    pub(crate) name: String,
    pub(crate) path: PathBuf,
    pub(crate) kind: EntryKind,
}

impl PickerEntry {
    /// Text shown in the list; directories get a trailing slash.
    pub(crate) fn label(&self) -> String {
        match self.kind {
            EntryKind::Parent => "..".to_string(),
            EntryKind::Directory => format!("{}/", self.name),
            EntryKind::File => self.name.clone(),
        }
    }
}

/// Result of feeding one key to the picker.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PickerOutcome {
    Pending,
    Cancelled,
    Chosen(PathBuf),
}

/// Modal directory browser used in place of a native open-file dialog.
pub(crate) struct FilePicker {
    pub(crate) dir: PathBuf,
    pub(crate) entries: Vec<PickerEntry>,
    pub(crate) selected: usize,
    pub(crate) filter: FileFilter,
    pub(crate) error: Option<String>,
}

impl FilePicker {
    /// Open the picker in `dir`. An unreadable start directory still yields a
    /// picker; the error is shown inline and `..` remains available.
    pub(crate) fn new(dir: PathBuf) -> Self {
        let mut picker = Self {
            dir,
            entries: Vec::new(),
            selected: 0,
            filter: FileFilter::Databases,
            error: None,
        };
        if let Err(err) = picker.refresh() {
            picker.error = Some(format!("{err:#}"));
            picker.entries = parent_entry(&picker.dir).into_iter().collect();
        }
        picker
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode) -> PickerOutcome {
        match code {
            KeyCode::Esc => return PickerOutcome::Cancelled,
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.move_selection(PAGE_STEP),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.entries.len().saturating_sub(1),
            KeyCode::Tab | KeyCode::BackTab => {
                self.filter = self.filter.toggled();
                self.reload_in_place();
            }
            KeyCode::Backspace | KeyCode::Left => {
                if let Some(parent) = self.dir.parent().map(Path::to_path_buf) {
                    self.change_dir(parent);
                }
            }
            KeyCode::Enter | KeyCode::Right => {
                if let Some(entry) = self.current().cloned() {
                    match entry.kind {
                        EntryKind::Parent | EntryKind::Directory => self.change_dir(entry.path),
                        EntryKind::File => {
                            if code == KeyCode::Enter {
                                return PickerOutcome::Chosen(entry.path);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
        PickerOutcome::Pending
    }

    pub(crate) fn current(&self) -> Option<&PickerEntry> {
        self.entries.get(self.selected)
    }

    fn move_selection(&mut self, offset: isize) {
        if self.entries.is_empty() {
            return;
        }
        let len = self.entries.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    /// Move into `dir`, staying put with an inline error if it is unreadable.
    fn change_dir(&mut self, dir: PathBuf) {
        let previous = std::mem::replace(&mut self.dir, dir);
        match self.refresh() {
            Ok(()) => {
                self.selected = 0;
                self.error = None;
            }
            Err(err) => {
                warn!(dir = %self.dir.display(), error = %err, "cannot list directory");
                self.error = Some(format!("{err:#}"));
                self.dir = previous;
            }
        }
    }

    fn reload_in_place(&mut self) {
        match self.refresh() {
            Ok(()) => {
                self.error = None;
                if self.selected >= self.entries.len() {
                    self.selected = self.entries.len().saturating_sub(1);
                }
            }
            Err(err) => self.error = Some(format!("{err:#}")),
        }
    }

    /// Re-list `self.dir`, replacing entries only when the listing succeeds.
    fn refresh(&mut self) -> Result<()> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        let listing = fs::read_dir(&self.dir)
            .with_context(|| format!("cannot read {}", self.dir.display()))?;
        for entry in listing {
            let entry = entry.context("failed to read directory entry")?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();
            // Follow symlinks so linked directories can be browsed.
            if path.is_dir() {
                dirs.push(PickerEntry {
                    name,
                    path,
                    kind: EntryKind::Directory,
                });
            } else if self.filter.accepts(&name) {
                files.push(PickerEntry {
                    name,
                    path,
                    kind: EntryKind::File,
                });
            }
        }

        dirs.sort_by(compare_names);
        files.sort_by(compare_names);

        let mut entries: Vec<PickerEntry> = parent_entry(&self.dir).into_iter().collect();
        entries.extend(dirs);
        entries.extend(files);
        self.entries = entries;
        Ok(())
    }
}

fn parent_entry(dir: &Path) -> Option<PickerEntry> {
    dir.parent().map(|parent| PickerEntry {
        name: "..".to_string(),
        path: parent.to_path_buf(),
        kind: EntryKind::Parent,
    })
}

fn compare_names(a: &PickerEntry, b: &PickerEntry) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}
