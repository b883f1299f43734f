#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use rusqlite::{params, Connection};
    use shopclock::db::db::Db;
    use shopclock::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use shopclock::db::time_entries::{EntryStore, TimeEntries};
    use shopclock::libs::soft_cap::net_work_seconds;
    use shopclock::libs::time_entry::{EntryState, FlagStatus};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct MigrationTestContext {
        _temp_dir: TempDir,
        path: PathBuf,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let path = temp_dir.path().join("shopclock.db");
            MigrationTestContext {
                _temp_dir: temp_dir,
                path,
            }
        }
    }

    /// Writes a database as the first release left it.
    fn seed_version_one(path: &PathBuf) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE migrations (
                id INTEGER PRIMARY KEY,
                version INTEGER NOT NULL UNIQUE,
                name TEXT NOT NULL,
                applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
            INSERT INTO migrations (version, name) VALUES (1, 'create_users_and_time_entries');
            CREATE TABLE users (
                id TEXT NOT NULL PRIMARY KEY,
                organization_id TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT,
                hourly_rate REAL NOT NULL DEFAULT 0,
                last_paid_date DATE,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE time_entries (
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
            );",
        )
        .unwrap();

        let rows: [(i64, &str, &str, Option<&str>, Option<&str>, Option<&str>, Option<f64>); 5] = [
            (1, "u-1", "2025-01-06T08:00:00.000Z", Some("2025-01-06T16:00:00.000Z"), None, None, Some(7.5)),
            (2, "u-2", "2025-01-06T09:00:00.000Z", None, Some("2025-01-06T12:00:00.000Z"), None, None),
            (3, "u-3", "2025-01-05T07:00:00.000Z", None, None, None, None),
            (4, "u-3", "2025-01-06T07:00:00.000Z", None, None, None, None),
            (
                5,
                "u-4",
                "2025-01-06T06:00:00.000Z",
                None,
                Some("2025-01-06T10:00:00.000Z"),
                Some("2025-01-06T10:30:00.000Z"),
                None,
            ),
        ];
        for (id, user, clock_in, clock_out, break_start, break_end, duration) in rows {
            conn.execute(
                "INSERT INTO time_entries (id, user_id, organization_id, clock_in, clock_out, break_start, break_end, duration_hours)
                 VALUES (?1, ?2, 'org-1', ?3, ?4, ?5, ?6, ?7)",
                params![id, user, clock_in, clock_out, break_start, break_end, duration],
            )
            .unwrap();
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn fresh_database_is_at_the_latest_version(ctx: &mut MigrationTestContext) {
        let db = Db::open(&ctx.path).unwrap();
        let conn = db.conn();
        assert_eq!(get_db_version(&conn).unwrap(), MigrationManager::new().latest_version());
        assert_eq!(get_db_version(&conn).unwrap(), 4);
        assert!(!needs_migration(&conn).unwrap());

        let history = MigrationManager::new().get_migration_history(&conn).unwrap();
        let versions: Vec<u32> = history.iter().map(|(v, _)| *v).collect();
        assert_eq!(versions, vec![1, 2, 3, 4]);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn reopening_is_a_no_op(ctx: &mut MigrationTestContext) {
        drop(Db::open(&ctx.path).unwrap());
        let db = Db::open(&ctx.path).unwrap();
        let history = MigrationManager::new().get_migration_history(&db.conn()).unwrap();
        assert_eq!(history.len(), 4);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn legacy_rows_are_backfilled(ctx: &mut MigrationTestContext) {
        seed_version_one(&ctx.path);
        let db = Db::open(&ctx.path).unwrap();
        let store = TimeEntries::new(db);
        let t = |d: u32, h: u32| Utc.with_ymd_and_hms(2025, 1, d, h, 0, 0).unwrap();

        let closed = store.find_entry(1).unwrap().unwrap();
        assert_eq!(closed.state, EntryState::ClockedOut);
        assert_eq!(closed.work_accum_seconds, 27_000);
        assert_eq!(closed.last_state_change_at, Some(t(6, 16)));
        assert_eq!(closed.cap_minutes, 960);
        assert_eq!(closed.flag_status, FlagStatus::None);
        assert_eq!(closed.version, 0);

        let on_break = store.find_open_entry_for_user("u-2").unwrap().unwrap();
        assert_eq!(on_break.state, EntryState::OnBreak);
        assert_eq!(on_break.last_state_change_at, Some(t(6, 12)));
        assert_eq!(on_break.work_accum_seconds, 3 * 3600);
        assert_eq!(net_work_seconds(&on_break, t(6, 13)), 3 * 3600);

        // Back from a break: work before it is banked, the break is not.
        let back = store.find_open_entry_for_user("u-4").unwrap().unwrap();
        assert_eq!(back.state, EntryState::Working);
        assert_eq!(back.work_accum_seconds, 4 * 3600);
        assert_eq!(back.last_state_change_at, Some(t(6, 10) + Duration::minutes(30)));
        assert_eq!(net_work_seconds(&back, t(6, 12)), 5 * 3600 + 30 * 60);

        // Only the newest of the duplicate open entries survives.
        let open = store.find_open_entry_for_user("u-3").unwrap().unwrap();
        assert_eq!(open.id, 4);
        assert_eq!(open.state, EntryState::Working);
        assert_eq!(open.last_state_change_at, Some(t(6, 7)));
        let closed_duplicate = store.find_entry(3).unwrap().unwrap();
        assert_eq!(closed_duplicate.state, EntryState::ClockedOut);
        assert_eq!(closed_duplicate.clock_out, Some(t(5, 7)));
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn second_open_entry_violates_the_index(ctx: &mut MigrationTestContext) {
        seed_version_one(&ctx.path);
        let db = Db::open(&ctx.path).unwrap();
        let result = db.conn().execute(
            "INSERT INTO time_entries (user_id, organization_id, clock_in) VALUES ('u-2', 'org-1', '2025-01-07T09:00:00.000Z')",
            [],
        );
        assert!(result.is_err());

        // Closed rows are not constrained.
        db.conn()
            .execute(
                "INSERT INTO time_entries (user_id, organization_id, clock_in, clock_out)
                 VALUES ('u-2', 'org-1', '2025-01-04T09:00:00.000Z', '2025-01-04T10:00:00.000Z')",
                [],
            )
            .unwrap();
    }
}
