//! Ratatui front-end: a table selector on the left, the loaded table as a grid
//! on the right, and modal overlays for the file picker and messages.

mod app;
mod grid;
mod helpers;
mod picker;
mod terminal;

pub use app::{App, Focus, Message, StatusKind};
pub use terminal::run_app;
