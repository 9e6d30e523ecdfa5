//! Logging setup must never stop the reader from starting. This lives in its
//! own test binary because it changes `HOME` for the whole process.

use std::env;
use std::fs;

use db_reader::config::log_path;
use db_reader::logging::init_logging;
use tempfile::TempDir;

#[test]
fn unusable_home_skips_file_logging() {
    let temp = TempDir::new().unwrap();
    let fake_home = temp.path().join("home-is-a-file");
    fs::write(&fake_home, "not a directory").unwrap();
    env::set_var("HOME", &fake_home);

    let path = log_path().expect("HOME is set");
    assert!(path.starts_with(&fake_home));

    init_logging().expect("logging failures are not fatal");
    assert!(!path.exists());
}
