//! On-disk behaviour of the persistence layer.

use std::fs;
use std::path::{Path, PathBuf};

use db_reader::{Database, DbError};
use rusqlite::Connection;
use tempfile::TempDir;

fn create_db(dir: &Path, name: &str, schema: &str) -> PathBuf {
    let path = dir.join(name);
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(schema).unwrap();
    path
}

#[test]
fn open_lists_user_tables() {
    let temp = TempDir::new().unwrap();
    let path = create_db(
        temp.path(),
        "shop.db",
        "CREATE TABLE customers (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT);
         CREATE TABLE orders (id INTEGER, customer_id INTEGER);
         INSERT INTO customers (name) VALUES ('Ada');",
    );

    let db = Database::open(&path).unwrap();
    assert_eq!(db.path(), path.as_path());
    assert_eq!(db.tables(), ["customers", "orders"]);
}

#[test]
fn missing_file_is_not_created() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.db");

    let err = Database::open(&path).err().unwrap();
    assert!(matches!(err, DbError::Open { .. }));
    assert!(!path.exists());
}

#[test]
fn non_database_file_fails_at_open() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("notes.db");
    fs::write(&path, "plain text, not a database file. ".repeat(20)).unwrap();

    let err = Database::open(&path).err().unwrap();
    assert!(matches!(err, DbError::Catalog(_)));
}

#[test]
fn refresh_picks_up_new_tables() {
    let temp = TempDir::new().unwrap();
    let path = create_db(temp.path(), "grow.db", "CREATE TABLE first (a INTEGER);");

    let mut db = Database::open(&path).unwrap();
    assert_eq!(db.tables(), ["first"]);

    Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE second (b TEXT);")
        .unwrap();

    assert_eq!(db.refresh_tables().unwrap(), ["first", "second"]);
}

#[test]
fn loads_table_through_open_database() {
    let temp = TempDir::new().unwrap();
    let path = create_db(
        temp.path(),
        "fixed.db",
        "CREATE TABLE items (id INTEGER); INSERT INTO items VALUES (1);",
    );

    let db = Database::open(&path).unwrap();
    let data = db.load_table("items").unwrap();
    assert_eq!(data.rows, vec![vec!["1".to_string()]]);
}
