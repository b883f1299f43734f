//! Versioned schema migrations.
//!
//! Every [`Db`](crate::db::db::Db) constructor runs pending migrations in one
//! transaction. Applied versions are recorded in the `migrations` table, so
//! re-opening a database is a no-op.

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_success};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        self.add_migration(1, "create_users_and_time_entries", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS users (
                    id TEXT NOT NULL PRIMARY KEY,
                    organization_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    email TEXT,
                    hourly_rate REAL NOT NULL DEFAULT 0,
                    last_paid_date DATE,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS time_entries (
                    id INTEGER NOT NULL PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    organization_id TEXT NOT NULL,
                    job_id TEXT,
                    clock_in TEXT NOT NULL,
                    clock_out TEXT,
                    break_start TEXT,
                    break_end TEXT,
                    duration_hours REAL,
                    notes TEXT,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_users_organization ON users(organization_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_time_entries_user_clock_in ON time_entries(user_id, clock_in)", [])?;
            tx.execute(
                "CREATE INDEX IF NOT EXISTS idx_time_entries_org_clock_in ON time_entries(organization_id, clock_in)",
                [],
            )?;
            Ok(())
        });

        // Existing rows get a state derived from their legacy markers.
        self.add_migration(2, "add_soft_cap_accounting", |tx| {
            tx.execute("ALTER TABLE time_entries ADD COLUMN state TEXT NOT NULL DEFAULT 'WORKING'", [])?;
            tx.execute("ALTER TABLE time_entries ADD COLUMN work_accum_seconds INTEGER NOT NULL DEFAULT 0", [])?;
            tx.execute("ALTER TABLE time_entries ADD COLUMN last_state_change_at TEXT", [])?;
            tx.execute("ALTER TABLE time_entries ADD COLUMN cap_minutes INTEGER NOT NULL DEFAULT 960", [])?;
            tx.execute("ALTER TABLE time_entries ADD COLUMN flag_status TEXT NOT NULL DEFAULT 'NONE'", [])?;
            tx.execute("ALTER TABLE time_entries ADD COLUMN over_cap_at TEXT", [])?;
            tx.execute(
                "UPDATE time_entries
                 SET state = 'CLOCKED_OUT',
                     work_accum_seconds = CAST(ROUND(COALESCE(duration_hours, 0) * 3600) AS INTEGER),
                     last_state_change_at = clock_out
                 WHERE clock_out IS NOT NULL",
                [],
            )?;
            // Open rows keep the work done before their break.
            tx.execute(
                "UPDATE time_entries
                 SET work_accum_seconds = MAX(0, CAST(strftime('%s', break_start) AS INTEGER)
                                               - CAST(strftime('%s', clock_in) AS INTEGER))
                 WHERE clock_out IS NULL AND break_start IS NOT NULL",
                [],
            )?;
            tx.execute(
                "UPDATE time_entries
                 SET state = 'ON_BREAK', last_state_change_at = break_start
                 WHERE clock_out IS NULL AND break_start IS NOT NULL AND break_end IS NULL",
                [],
            )?;
            tx.execute(
                "UPDATE time_entries
                 SET last_state_change_at = break_end
                 WHERE clock_out IS NULL AND break_start IS NOT NULL AND break_end IS NOT NULL",
                [],
            )?;
            tx.execute(
                "UPDATE time_entries
                 SET last_state_change_at = clock_in
                 WHERE clock_out IS NULL AND last_state_change_at IS NULL",
                [],
            )?;
            tx.execute("CREATE INDEX idx_time_entries_flag_status ON time_entries(flag_status)", [])?;
            Ok(())
        });

        self.add_migration(3, "add_correction_audit", |tx| {
            tx.execute("ALTER TABLE time_entries ADD COLUMN wrong_recorded_net_seconds INTEGER", [])?;
            tx.execute("ALTER TABLE time_entries ADD COLUMN correction_note TEXT", [])?;
            tx.execute("ALTER TABLE time_entries ADD COLUMN correction_applied_at TEXT", [])?;
            Ok(())
        });

        // Duplicate open entries would block the unique index; all but the
        // newest per user are closed at their last transition.
        self.add_migration(4, "add_entry_version_and_open_entry_guard", |tx| {
            tx.execute("ALTER TABLE time_entries ADD COLUMN version INTEGER NOT NULL DEFAULT 0", [])?;
            tx.execute(
                "UPDATE time_entries
                 SET clock_out = COALESCE(last_state_change_at, clock_in), state = 'CLOCKED_OUT'
                 WHERE clock_out IS NULL
                   AND id NOT IN (SELECT MAX(id) FROM time_entries WHERE clock_out IS NULL GROUP BY user_id)",
                [],
            )?;
            tx.execute(
                "CREATE UNIQUE INDEX idx_time_entries_one_open_per_user ON time_entries(user_id) WHERE clock_out IS NULL",
                [],
            )?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;
        let current_version = self.get_current_version(conn)?;

        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();
        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;
        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                    msg_debug!(Message::MigrationCompleted(migration.version));
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }
        tx.commit()?;

        // A fresh database is created silently; upgrades are announced.
        if current_version > 0 {
            msg_success!(Message::AllMigrationsCompleted);
        } else {
            msg_debug!(Message::AllMigrationsCompleted);
        }
        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))?;
        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String)>> {
        let mut stmt = conn.prepare("SELECT version, name FROM migrations ORDER BY version")?;
        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(history)
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    Ok(manager.get_current_version(conn)? < manager.latest_version())
}
