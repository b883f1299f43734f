//! SQLite persistence for time entries.
//!
//! Two guards make transitions race-free when several devices act for the
//! same user:
//!
//! - a partial unique index allows a single open entry per user, so a
//!   second concurrent clock-in fails with [`StoreError::Conflict`];
//! - every update is a compare-and-set on `version`, so a transition based
//!   on a stale read is rejected instead of overwriting a newer one.

use crate::db::db::{instant_from_sql, instant_to_sql, optional_instant_from_sql, Db};
use crate::libs::error::StoreError;
use crate::libs::time_entry::{EntryState, FlagStatus, NewTimeEntry, TimeEntry};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, ErrorCode, OptionalExtension, Row};
use std::str::FromStr;

const SELECT_COLUMNS: &str = "SELECT id, user_id, organization_id, job_id, clock_in, clock_out, break_start, break_end,
    state, work_accum_seconds, last_state_change_at, cap_minutes, flag_status, over_cap_at,
    wrong_recorded_net_seconds, correction_note, correction_applied_at, duration_hours, notes, version
    FROM time_entries";
const INSERT_ENTRY: &str = "INSERT INTO time_entries (user_id, organization_id, job_id, clock_in, state,
    work_accum_seconds, last_state_change_at, cap_minutes, flag_status, version)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0)";
const UPDATE_ENTRY: &str = "UPDATE time_entries SET
    job_id = ?1, clock_out = ?2, break_start = ?3, break_end = ?4, state = ?5, work_accum_seconds = ?6,
    last_state_change_at = ?7, cap_minutes = ?8, flag_status = ?9, over_cap_at = ?10,
    wrong_recorded_net_seconds = ?11, correction_note = ?12, correction_applied_at = ?13,
    duration_hours = ?14, notes = ?15, version = version + 1
    WHERE id = ?16 AND version = ?17";

/// Persistence collaborator of the time clock.
pub trait EntryStore {
    fn find_entry(&self, id: i64) -> Result<Option<TimeEntry>, StoreError>;

    fn find_open_entry_for_user(&self, user_id: &str) -> Result<Option<TimeEntry>, StoreError>;

    /// Inserts a freshly opened entry. Fails with `Conflict` when the user
    /// already has an open one.
    fn create_entry(&self, new_entry: &NewTimeEntry) -> Result<TimeEntry, StoreError>;

    /// Writes every mutable field of `entry` if its `version` is still
    /// current and returns the stored record with the bumped version.
    fn update_entry(&self, entry: &TimeEntry) -> Result<TimeEntry, StoreError>;

    fn find_open_entries(&self) -> Result<Vec<TimeEntry>, StoreError>;

    /// Closed entries of a user with `clock_in` in `[from, to)`.
    fn find_settled_entries(&self, user_id: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<TimeEntry>, StoreError>;

    /// Open and closed entries of an organization with `clock_in` in `[from, to)`.
    fn find_organization_entries(
        &self,
        organization_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>, StoreError>;

    /// Newest first.
    fn recent_entries(&self, user_id: &str, limit: usize) -> Result<Vec<TimeEntry>, StoreError>;
}

#[derive(Clone)]
pub struct TimeEntries {
    db: Db,
}

impl TimeEntries {
    pub fn new(db: Db) -> Self {
        TimeEntries { db }
    }

    fn query(&self, sql_tail: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<TimeEntry>, StoreError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(&format!("{} {}", SELECT_COLUMNS, sql_tail))?;
        let entries = stmt.query_map(params, entry_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

fn parse_enum<T: FromStr<Err = String>>(idx: usize, value: &str) -> rusqlite::Result<T> {
    value
        .parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

fn entry_from_row(row: &Row) -> rusqlite::Result<TimeEntry> {
    Ok(TimeEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        organization_id: row.get(2)?,
        job_id: row.get(3)?,
        clock_in: instant_from_sql(4, &row.get::<_, String>(4)?)?,
        clock_out: optional_instant_from_sql(5, row.get(5)?)?,
        break_start: optional_instant_from_sql(6, row.get(6)?)?,
        break_end: optional_instant_from_sql(7, row.get(7)?)?,
        state: parse_enum::<EntryState>(8, &row.get::<_, String>(8)?)?,
        work_accum_seconds: row.get(9)?,
        last_state_change_at: optional_instant_from_sql(10, row.get(10)?)?,
        cap_minutes: row.get(11)?,
        flag_status: parse_enum::<FlagStatus>(12, &row.get::<_, String>(12)?)?,
        over_cap_at: optional_instant_from_sql(13, row.get(13)?)?,
        wrong_recorded_net_seconds: row.get(14)?,
        correction_note: row.get(15)?,
        correction_applied_at: optional_instant_from_sql(16, row.get(16)?)?,
        duration_hours: row.get(17)?,
        notes: row.get(18)?,
        version: row.get(19)?,
    })
}

fn is_constraint_violation(error: &rusqlite::Error) -> bool {
    matches!(error, rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation)
}

impl EntryStore for TimeEntries {
    fn find_entry(&self, id: i64) -> Result<Option<TimeEntry>, StoreError> {
        let conn = self.db.conn();
        let entry = conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_COLUMNS), params![id], entry_from_row)
            .optional()?;
        Ok(entry)
    }

    fn find_open_entry_for_user(&self, user_id: &str) -> Result<Option<TimeEntry>, StoreError> {
        let conn = self.db.conn();
        let entry = conn
            .query_row(
                &format!("{} WHERE user_id = ?1 AND clock_out IS NULL", SELECT_COLUMNS),
                params![user_id],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    fn create_entry(&self, new_entry: &NewTimeEntry) -> Result<TimeEntry, StoreError> {
        let mut entry = TimeEntry::open(new_entry);
        let conn = self.db.conn();
        let inserted = conn.execute(
            INSERT_ENTRY,
            params![
                entry.user_id,
                entry.organization_id,
                entry.job_id,
                instant_to_sql(&entry.clock_in),
                entry.state.as_str(),
                entry.work_accum_seconds,
                entry.last_state_change_at.as_ref().map(instant_to_sql),
                entry.cap_minutes,
                entry.flag_status.as_str(),
            ],
        );
        match inserted {
            Ok(_) => {
                entry.id = conn.last_insert_rowid();
                Ok(entry)
            }
            Err(e) if is_constraint_violation(&e) => Err(StoreError::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    fn update_entry(&self, entry: &TimeEntry) -> Result<TimeEntry, StoreError> {
        let conn = self.db.conn();
        let changed = conn
            .execute(
                UPDATE_ENTRY,
                params![
                    entry.job_id,
                    entry.clock_out.as_ref().map(instant_to_sql),
                    entry.break_start.as_ref().map(instant_to_sql),
                    entry.break_end.as_ref().map(instant_to_sql),
                    entry.state.as_str(),
                    entry.work_accum_seconds,
                    entry.last_state_change_at.as_ref().map(instant_to_sql),
                    entry.cap_minutes,
                    entry.flag_status.as_str(),
                    entry.over_cap_at.as_ref().map(instant_to_sql),
                    entry.wrong_recorded_net_seconds,
                    entry.correction_note,
                    entry.correction_applied_at.as_ref().map(instant_to_sql),
                    entry.duration_hours,
                    entry.notes,
                    entry.id,
                    entry.version,
                ],
            )
            .map_err(|e| if is_constraint_violation(&e) { StoreError::Conflict } else { e.into() })?;

        if changed == 0 {
            let exists: bool = conn.query_row("SELECT EXISTS(SELECT 1 FROM time_entries WHERE id = ?1)", params![entry.id], |row| {
                row.get(0)
            })?;
            return Err(if exists {
                StoreError::Conflict
            } else {
                StoreError::NotFound(entry.id.to_string())
            });
        }

        Ok(TimeEntry {
            version: entry.version + 1,
            ..entry.clone()
        })
    }

    fn find_open_entries(&self) -> Result<Vec<TimeEntry>, StoreError> {
        self.query("WHERE clock_out IS NULL ORDER BY clock_in", &[])
    }

    fn find_settled_entries(&self, user_id: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<TimeEntry>, StoreError> {
        self.query(
            "WHERE user_id = ?1 AND clock_out IS NOT NULL AND clock_in >= ?2 AND clock_in < ?3 ORDER BY clock_in",
            &[&user_id, &instant_to_sql(&from), &instant_to_sql(&to)],
        )
    }

    fn find_organization_entries(
        &self,
        organization_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>, StoreError> {
        self.query(
            "WHERE organization_id = ?1 AND clock_in >= ?2 AND clock_in < ?3 ORDER BY user_id, clock_in",
            &[&organization_id, &instant_to_sql(&from), &instant_to_sql(&to)],
        )
    }

    fn recent_entries(&self, user_id: &str, limit: usize) -> Result<Vec<TimeEntry>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query("WHERE user_id = ?1 ORDER BY clock_in DESC, id DESC LIMIT ?2", &[&user_id, &limit])
    }
}
