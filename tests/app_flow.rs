//! End-to-end behaviour of the application state, driven the same way the
//! event loop drives it but without a terminal.

use std::fs;
use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use db_reader::ui::StatusKind;
use db_reader::App;
use rusqlite::Connection;
use tempfile::TempDir;

fn create_db(dir: &Path, name: &str, schema: &str) -> PathBuf {
    let path = dir.join(name);
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(schema).unwrap();
    path
}

fn library(dir: &Path) -> PathBuf {
    create_db(
        dir,
        "library.db",
        "CREATE TABLE books (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT, year INTEGER);
         INSERT INTO books (title, year) VALUES ('Dune', 1965);
         INSERT INTO books (title, year) VALUES ('Neuromancer', 1984);
         INSERT INTO books (title, year) VALUES ('Hyperion', NULL);
         CREATE TABLE authors (name TEXT);
         INSERT INTO authors VALUES ('Herbert');",
    )
}

fn garden(dir: &Path) -> PathBuf {
    create_db(
        dir,
        "garden.db",
        "CREATE TABLE plants (species TEXT, height REAL, notes TEXT, planted TEXT);
         INSERT INTO plants VALUES ('Fern', 0.4, 'shade', '2024-03-01');",
    )
}

#[test]
fn opening_valid_file_lists_exactly_the_user_tables() {
    let temp = TempDir::new().unwrap();
    let mut app = App::new(temp.path().to_path_buf());

    let path = library(temp.path());
    app.open_database(&path);

    assert_eq!(app.database_path(), Some(path.as_path()));
    assert_eq!(app.table_names(), ["books", "authors"]);
    assert_eq!(app.selected_table(), Some("books"));
    assert!(app.message().is_none());
}

#[test]
fn loading_a_table_matches_its_shape() {
    let temp = TempDir::new().unwrap();
    let mut app = App::new(temp.path().to_path_buf());
    app.open_database(&library(temp.path()));

    app.load_selected_table();

    let grid = app.grid().expect("grid loaded");
    assert_eq!(grid.name, "books");
    assert_eq!(grid.columns, ["id", "title", "year"]);
    assert_eq!(grid.row_count(), 3);
    assert_eq!(grid.column_count(), 3);
    assert_eq!(grid.rows[2], ["3", "Hyperion", "NULL"]);
}

#[test]
fn loading_second_table_replaces_the_grid() {
    let temp = TempDir::new().unwrap();
    let mut app = App::new(temp.path().to_path_buf());
    app.open_database(&library(temp.path()));
    app.load_selected_table();

    assert!(app.select_table("authors"));
    app.load_selected_table();

    let grid = app.grid().unwrap();
    assert_eq!(grid.name, "authors");
    assert_eq!(grid.columns, ["name"]);
    assert_eq!(grid.rows, vec![vec!["Herbert".to_string()]]);
}

#[test]
fn invalid_file_leaves_prior_state_and_shows_error() {
    let temp = TempDir::new().unwrap();
    let mut app = App::new(temp.path().to_path_buf());
    let good = library(temp.path());
    app.open_database(&good);
    app.load_selected_table();

    let bad = temp.path().join("broken.db");
    fs::write(&bad, "definitely not a sqlite file. ".repeat(20)).unwrap();
    app.open_database(&bad);

    let message = app.message().expect("error shown");
    assert_eq!(message.kind, StatusKind::Error);
    assert!(message.body.starts_with("Failed to open database"));

    assert_eq!(app.database_path(), Some(good.as_path()));
    assert_eq!(app.table_names(), ["books", "authors"]);
    assert_eq!(app.grid().unwrap().name, "books");

    // Dismissing the message returns to normal navigation.
    app.handle_key(KeyCode::Enter);
    assert!(app.message().is_none());
}

#[test]
fn opening_new_file_discards_previous_database() {
    let temp = TempDir::new().unwrap();
    let mut app = App::new(temp.path().to_path_buf());
    app.open_database(&library(temp.path()));
    assert!(app.select_table("authors"));
    app.load_selected_table();

    let second = garden(temp.path());
    app.open_database(&second);

    assert_eq!(app.database_path(), Some(second.as_path()));
    assert_eq!(app.table_names(), ["plants"]);
    assert_eq!(app.selected_table(), Some("plants"));
    assert!(app.grid().is_none());
}

#[test]
fn loading_without_database_warns() {
    let temp = TempDir::new().unwrap();
    let mut app = App::new(temp.path().to_path_buf());

    app.load_selected_table();

    let message = app.message().expect("warning shown");
    assert_eq!(message.title, "No DB");
    assert_eq!(message.body, "No database is open yet!");
    assert!(app.grid().is_none());
}

#[test]
fn database_without_user_tables_warns() {
    let temp = TempDir::new().unwrap();
    let mut app = App::new(temp.path().to_path_buf());
    let empty = create_db(temp.path(), "empty.db", "CREATE VIEW v AS SELECT 1;");

    app.open_database(&empty);

    let message = app.message().expect("warning shown");
    assert_eq!(message.title, "No Tables");
    assert_eq!(app.database_path(), Some(empty.as_path()));
    assert!(app.table_names().is_empty());
}

#[test]
fn failed_table_read_keeps_grid() {
    let temp = TempDir::new().unwrap();
    let path = library(temp.path());
    let mut app = App::new(temp.path().to_path_buf());
    app.open_database(&path);
    app.load_selected_table();

    // Drop the table behind the reader's back; the stale list still names it.
    Connection::open(&path)
        .unwrap()
        .execute_batch("DROP TABLE authors;")
        .unwrap();
    assert!(app.select_table("authors"));
    app.load_selected_table();

    let message = app.message().expect("error shown");
    assert!(message.body.starts_with("Failed to read table"));
    assert_eq!(app.grid().unwrap().name, "books");

    app.handle_key(KeyCode::Esc);
    app.reload_tables();
    assert_eq!(app.table_names(), ["books"]);
    assert_eq!(app.selected_table(), Some("books"));
}

#[test]
fn keyboard_flow_opens_file_through_picker() {
    let temp = TempDir::new().unwrap();
    let path = garden(temp.path());
    let mut app = App::new(temp.path().to_path_buf());

    assert!(!app.handle_key(KeyCode::Char('o')));
    assert!(app.is_picking_file());

    // Entries are "..", then garden.db.
    app.handle_key(KeyCode::Down);
    app.handle_key(KeyCode::Enter);

    assert!(!app.is_picking_file());
    assert_eq!(app.database_path(), Some(path.as_path()));

    app.handle_key(KeyCode::Enter);
    assert_eq!(app.grid().unwrap().rows[0][0], "Fern");

    assert!(app.handle_key(KeyCode::Char('q')));
}
