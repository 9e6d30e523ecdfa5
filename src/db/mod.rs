//! Persistence module split across logical submodules.

mod catalog;
mod connection;
mod tables;

pub use connection::Database;
