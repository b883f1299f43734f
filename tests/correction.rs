#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use shopclock::db::db::Db;
    use shopclock::db::time_entries::{EntryStore, TimeEntries};
    use shopclock::db::users::User;
    use shopclock::libs::clock::FakeClock;
    use shopclock::libs::error::{Precondition, TimeClockError, ValidationError};
    use shopclock::libs::time_clock::TimeClock;
    use shopclock::libs::time_entry::{EntryState, FlagStatus};
    use test_context::{test_context, TestContext};

    struct CorrectionContext {
        clock: FakeClock,
        time_clock: TimeClock<TimeEntries, FakeClock>,
        user: User,
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 7, 6, 30, 0).unwrap()
    }

    impl TestContext for CorrectionContext {
        fn setup() -> Self {
            let clock = FakeClock::new(t0());
            let time_clock = TimeClock::new(TimeEntries::new(Db::open_in_memory().unwrap()), clock.clone());
            CorrectionContext {
                clock,
                time_clock,
                user: User::new("emp-7", "org-1", "Sam Ito", 18.5),
            }
        }
    }

    #[test_context(CorrectionContext)]
    #[test]
    fn correction_closes_the_entry_and_freezes_the_wrong_time(ctx: &mut CorrectionContext) {
        ctx.time_clock.clock_in(&ctx.user, Some("job-9")).unwrap();
        ctx.clock.advance_hours(4);
        ctx.time_clock.start_break(&ctx.user).unwrap();
        ctx.clock.advance_minutes(30);
        ctx.time_clock.end_break(&ctx.user).unwrap();
        // Forgot to clock out; noticed the next morning.
        ctx.clock.advance_hours(20);

        let end = t0() + Duration::hours(9);
        let entry = ctx.time_clock.correct_forgot_clock_out(&ctx.user, end, "left at 15:30").unwrap();

        assert_eq!(entry.wrong_recorded_net_seconds, Some(24 * 3600));
        assert_eq!(entry.work_accum_seconds, 8 * 3600 + 30 * 60);
        assert_eq!(entry.duration_hours, Some(8.5));
        assert_eq!(entry.clock_out, Some(end));
        assert_eq!(entry.state, EntryState::ClockedOut);
        assert_eq!(entry.flag_status, FlagStatus::ForgotClockOut);
        assert_eq!(entry.correction_note.as_deref(), Some("left at 15:30"));
        assert_eq!(entry.correction_applied_at, Some(t0() + Duration::minutes(24 * 60 + 30)));
        assert!(entry.wrong_exceeded_cap());

        let stored = ctx.time_clock.store().find_entry(entry.id).unwrap().unwrap();
        assert_eq!(stored, entry);
        assert!(ctx.time_clock.store().find_open_entry_for_user("emp-7").unwrap().is_none());
    }

    #[test_context(CorrectionContext)]
    #[test]
    fn wrong_snapshot_never_changes_afterwards(ctx: &mut CorrectionContext) {
        ctx.time_clock.clock_in(&ctx.user, None).unwrap();
        ctx.clock.advance_hours(30);
        let entry = ctx
            .time_clock
            .correct_forgot_clock_out(&ctx.user, t0() + Duration::hours(8), "forgot")
            .unwrap();

        ctx.clock.advance_hours(72);
        ctx.time_clock.evaluate_soft_cap_for_open_entries().unwrap();
        let recent = ctx.time_clock.recent_entries(&ctx.user, 1).unwrap();
        assert_eq!(recent[0].wrong_recorded_net_seconds, Some(30 * 3600));
        assert_eq!(recent[0], entry);
    }

    #[test_context(CorrectionContext)]
    #[test]
    fn invalid_end_times_leave_the_entry_open(ctx: &mut CorrectionContext) {
        let opened = ctx.time_clock.clock_in(&ctx.user, None).unwrap();
        ctx.clock.advance_hours(21);

        let before_clock_in = ctx.time_clock.correct_forgot_clock_out(&ctx.user, t0() - Duration::minutes(1), "x");
        assert!(matches!(
            before_clock_in,
            Err(TimeClockError::Validation(ValidationError::CorrectedEndNotAfterClockIn))
        ));

        let in_future = ctx.time_clock.correct_forgot_clock_out(&ctx.user, t0() + Duration::hours(22), "x");
        assert!(matches!(
            in_future,
            Err(TimeClockError::Validation(ValidationError::CorrectedEndNotBeforeNow))
        ));

        let still_open = ctx.time_clock.store().find_open_entry_for_user("emp-7").unwrap().unwrap();
        assert_eq!(still_open, opened);
    }

    #[test_context(CorrectionContext)]
    #[test]
    fn correction_needs_an_open_entry(ctx: &mut CorrectionContext) {
        let err = ctx
            .time_clock
            .correct_forgot_clock_out(&ctx.user, t0() - Duration::hours(1), "x")
            .unwrap_err();
        assert_eq!(err.precondition(), Some(&Precondition::NotClockedIn));
    }

    #[test_context(CorrectionContext)]
    #[test]
    fn swept_entry_keeps_its_cap_instant_but_takes_the_correction_flag(ctx: &mut CorrectionContext) {
        ctx.time_clock.clock_in(&ctx.user, None).unwrap();
        ctx.clock.advance_hours(17);
        ctx.time_clock.evaluate_soft_cap_for_open_entries().unwrap();
        ctx.clock.advance_hours(3);

        let entry = ctx
            .time_clock
            .correct_forgot_clock_out(&ctx.user, t0() + Duration::hours(10), "forgot")
            .unwrap();
        assert_eq!(entry.flag_status, FlagStatus::ForgotClockOut);
        assert_eq!(entry.over_cap_at, Some(t0() + Duration::hours(16)));
        assert_eq!(entry.work_accum_seconds, 10 * 3600);
        assert!(entry.wrong_exceeded_cap());
    }
}
