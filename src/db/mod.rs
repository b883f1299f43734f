//! SQLite persistence.
//!
//! [`db::Db`] owns the connection and applies [`migrations`] on open; the
//! table modules wrap a clone of it.

pub mod db;
pub mod migrations;
pub mod time_entries;
pub mod users;
