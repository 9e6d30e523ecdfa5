//! Compile-time settings and the few paths resolved at runtime. Nothing here is
//! persisted; the reader keeps no state beyond the file it has open.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use directories::BaseDirs;

/// Folder name used beneath the user's home directory for the log file.
pub const DATA_DIR_NAME: &str = ".db-reader";
/// Log file name stored inside the data directory.
pub const LOG_FILE_NAME: &str = "db-reader.log";
/// Extensions shown when the picker filter is set to SQLite files.
pub const DB_EXTENSIONS: &[&str] = &["db", "sqlite", "sqlite3"];
/// How long the event loop waits for input before redrawing.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);
/// Widest a grid column may grow, in terminal cells.
pub const MAX_COLUMN_WIDTH: u16 = 32;
/// Rows skipped by PageUp/PageDown in lists and the grid.
pub const PAGE_STEP: isize = 10;

/// Resolve the log file location, or `None` when no home directory exists.
pub fn log_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(DATA_DIR_NAME).join(LOG_FILE_NAME))
}

/// Directory the file picker starts in when no database is open yet.
pub fn default_start_dir() -> PathBuf {
    env::current_dir()
        .ok()
        .or_else(|| BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Whether a file name carries one of the recognised database extensions.
pub fn is_database_file(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| {
            DB_EXTENSIONS
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
