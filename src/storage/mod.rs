//! Storage layer for packsize
//!
//! SQLite-backed persistence for the package catalog.

pub mod migrations;
pub mod sqlite;

pub use sqlite::Database;
