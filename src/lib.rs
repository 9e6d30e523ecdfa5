//! Core library surface for the SQLite DB Reader TUI.
//!
//! The binary only wires logging and the event loop together; everything it
//! drives lives here so integration tests can exercise the same pieces.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

/// The persistence layer: one open database and the reads it supports.
pub use db::Database;

pub use error::DbError;
pub use models::TableData;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
