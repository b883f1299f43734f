#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use shopclock::db::db::Db;
    use shopclock::db::time_entries::{EntryStore, TimeEntries};
    use shopclock::db::users::User;
    use shopclock::libs::clock::FakeClock;
    use shopclock::libs::sweeper::{run_until, sweep_once};
    use shopclock::libs::time_clock::TimeClock;
    use shopclock::libs::time_entry::FlagStatus;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn time_clock() -> (TimeClock<TimeEntries, FakeClock>, FakeClock) {
        let clock = FakeClock::new(Utc.with_ymd_and_hms(2025, 2, 3, 6, 0, 0).unwrap());
        let time_clock = TimeClock::new(TimeEntries::new(Db::open_in_memory().unwrap()), clock.clone());
        (time_clock, clock)
    }

    #[test]
    fn sweep_once_returns_the_report() {
        let (time_clock, clock) = time_clock();
        time_clock.clock_in(&User::new("w-1", "org-1", "Lee", 19.0), None).unwrap();
        clock.advance_hours(16);

        let report = sweep_once(&time_clock).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.flagged, 1);
    }

    #[tokio::test]
    async fn background_sweeps_flag_entries_until_shutdown() {
        let (time_clock, clock) = time_clock();
        let worker = User::new("w-1", "org-1", "Lee", 19.0);
        time_clock.clock_in(&worker, None).unwrap();
        clock.advance_hours(17);

        let time_clock = Arc::new(time_clock);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let sweeper = tokio::spawn(run_until(Arc::clone(&time_clock), Duration::from_millis(20), shutdown_rx));

        tokio::time::sleep(Duration::from_millis(150)).await;
        shutdown_tx.send(()).unwrap();
        sweeper.await.unwrap().unwrap();

        let entry = time_clock.store().find_open_entry_for_user("w-1").unwrap().unwrap();
        assert_eq!(entry.flag_status, FlagStatus::OverCap);
        // Flagged once; later sweeps leave the row alone.
        assert_eq!(entry.version, 1);
    }

    #[tokio::test]
    async fn shutdown_before_first_tick_is_clean() {
        let (time_clock, _clock) = time_clock();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        shutdown_tx.send(()).unwrap();
        run_until(Arc::new(time_clock), Duration::from_secs(3600), shutdown_rx).await.unwrap();
    }
}
