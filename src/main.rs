//! Binary entry point: install file logging, then hand the terminal to the
//! Ratatui event loop until the user quits.
use db_reader::config::default_start_dir;
use db_reader::logging::init_logging;
use db_reader::{run_app, App};

/// Terminal setup and teardown failures are the only fatal errors; database
/// problems are reported inside the UI.
fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!("starting db-reader");

    let mut app = App::new(default_start_dir());
    run_app(&mut app)
}
