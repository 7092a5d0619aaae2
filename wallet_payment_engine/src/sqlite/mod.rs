//! SQLite database module for the wallet payment engine.

mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
