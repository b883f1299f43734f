use crate::db::migrations::init_with_migrations;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::types::Type;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const DB_FILE_NAME: &str = "shopclock.db";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shared handle to the shopclock database.
///
/// Cloning is cheap and every clone talks to the same connection, so the
/// CLI, the sweeper task and tests can hold their own handle.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    /// Opens `shopclock.db` in the data directory.
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        Self::open(&db_file_path)
    }

    pub fn open(path: &Path) -> Result<Db> {
        Self::prepare(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Db> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(mut conn: Connection) -> Result<Db> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        init_with_migrations(&mut conn)?;
        Ok(Db {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }
}

/// Fixed-width UTC text so lexical order matches chronological order.
pub fn instant_to_sql(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn instant_from_sql(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub fn optional_instant_from_sql(idx: usize, value: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    value.map(|v| instant_from_sql(idx, &v)).transpose()
}

pub fn date_to_sql(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn date_from_sql(idx: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
