#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use shopclock::db::db::Db;
    use shopclock::db::time_entries::TimeEntries;
    use shopclock::db::users::{User, Users};
    use shopclock::libs::clock::FakeClock;
    use shopclock::libs::report::{end_of_day_report, ReportFlag};
    use shopclock::libs::time_clock::TimeClock;
    use test_context::{test_context, TestContext};

    struct ReportContext {
        clock: FakeClock,
        time_clock: TimeClock<TimeEntries, FakeClock>,
        users: Vec<User>,
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 12).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(&day().and_hms_opt(hour, minute, 0).unwrap())
    }

    impl TestContext for ReportContext {
        fn setup() -> Self {
            let db = Db::open_in_memory().unwrap();
            let directory = Users::new(db.clone());
            for user in [
                User::new("u-zoe", "shop-1", "Zoe", 24.0),
                User::new("u-amir", "shop-1", "Amir", 20.0),
                User::new("u-kai", "shop-1", "Kai", 30.0),
                User::new("u-other", "shop-2", "Other", 99.0),
            ] {
                directory.save(&user).unwrap();
            }
            let users = directory.list(None).unwrap();

            let clock = FakeClock::new(at(0, 0));
            let time_clock = TimeClock::new(TimeEntries::new(db), clock.clone());
            ReportContext { clock, time_clock, users }
        }
    }

    impl ReportContext {
        fn user(&self, id: &str) -> User {
            self.users.iter().find(|u| u.id == id).cloned().unwrap()
        }
    }

    #[test_context(ReportContext)]
    #[test]
    fn report_totals_breaks_and_flags(ctx: &mut ReportContext) {
        let amir = ctx.user("u-amir");
        let zoe = ctx.user("u-zoe");
        let kai = ctx.user("u-kai");
        let other = ctx.user("u-other");

        // Amir: 8h with a 30 minute break, no notes.
        ctx.clock.set(at(7, 0));
        ctx.time_clock.clock_in(&amir, Some("job-1")).unwrap();
        // Zoe: still on the clock at report time.
        ctx.time_clock.clock_in(&zoe, Some("job-2")).unwrap();
        ctx.clock.set(at(11, 0));
        ctx.time_clock.start_break(&amir).unwrap();
        ctx.clock.set(at(11, 30));
        ctx.time_clock.end_break(&amir).unwrap();
        ctx.clock.set(at(15, 30));
        ctx.time_clock.clock_out(&amir, None).unwrap();

        // Kai: two notes-bearing shifts on two jobs.
        ctx.clock.set(at(8, 0));
        ctx.time_clock.clock_in(&kai, Some("job-1")).unwrap();
        ctx.clock.set(at(10, 0));
        ctx.time_clock.clock_out(&kai, Some("welding")).unwrap();
        ctx.time_clock.clock_in(&kai, Some("job-3")).unwrap();
        ctx.clock.set(at(13, 0));
        ctx.time_clock.clock_out(&kai, Some("paint prep")).unwrap();

        ctx.time_clock.clock_in(&other, None).unwrap();

        ctx.clock.set(at(17, 0));
        let report = end_of_day_report(&ctx.time_clock, "shop-1", &ctx.users, day(), &Utc).unwrap();

        let names: Vec<&str> = report.employees.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Amir", "Kai", "Zoe"]);

        let amir_day = &report.employees[0];
        assert_eq!(amir_day.entries, 1);
        assert_eq!(amir_day.net_hours, 8.0);
        assert_eq!(amir_day.break_hours, 0.5);
        assert_eq!(amir_day.labor_cost, 160.0);
        assert!(amir_day.flags.contains(&ReportFlag::MissingNotes));

        let kai_day = &report.employees[1];
        assert_eq!(kai_day.entries, 2);
        assert_eq!(kai_day.paid_hours, 5.0);
        assert_eq!(kai_day.labor_cost, 150.0);
        assert_eq!(kai_day.jobs.len(), 2);
        assert!(kai_day.flags.is_empty());

        let zoe_day = &report.employees[2];
        assert_eq!(zoe_day.net_hours, 10.0);
        assert_eq!(zoe_day.labor_cost, 240.0);
        assert!(zoe_day.flags.contains(&ReportFlag::OpenEntry));

        assert_eq!(report.total_hours, 23.0);
        assert_eq!(report.total_cost, 550.0);
        assert_eq!(report.flag_count, 2);
        assert_eq!(report.exceptions.len(), 1);
        assert_eq!(report.exceptions[0].name, "Zoe");
        assert_eq!(report.exceptions[0].flag, ReportFlag::OpenEntry);
    }

    #[test_context(ReportContext)]
    #[test]
    fn over_cap_and_corrected_entries_are_exceptions(ctx: &mut ReportContext) {
        let amir = ctx.user("u-amir");
        let kai = ctx.user("u-kai");

        ctx.clock.set(at(0, 0));
        ctx.time_clock.clock_in(&amir, None).unwrap();
        ctx.time_clock.clock_in(&kai, None).unwrap();
        ctx.clock.set(at(22, 0));
        ctx.time_clock
            .correct_forgot_clock_out(&kai, at(9, 0), "left at nine")
            .unwrap();

        let report = end_of_day_report(&ctx.time_clock, "shop-1", &ctx.users, day(), &Utc).unwrap();

        let amir_day = report.employees.iter().find(|e| e.user_id == "u-amir").unwrap();
        assert!(amir_day.flags.contains(&ReportFlag::OpenEntry));
        // Running past the cap but not swept yet: reported, still paid in full.
        assert!(amir_day.flags.contains(&ReportFlag::OverCap));
        assert_eq!(amir_day.paid_hours, 22.0);

        let kai_day = report.employees.iter().find(|e| e.user_id == "u-kai").unwrap();
        assert!(kai_day.flags.contains(&ReportFlag::ForgotClockOut));
        assert!(!kai_day.flags.contains(&ReportFlag::OverCap));
        assert_eq!(kai_day.net_hours, 9.0);

        let flags: Vec<ReportFlag> = report.exceptions.iter().map(|e| e.flag).collect();
        assert!(flags.contains(&ReportFlag::OverCap));
        assert!(flags.contains(&ReportFlag::ForgotClockOut));
        assert!(!flags.contains(&ReportFlag::MissingNotes));
    }

    #[test_context(ReportContext)]
    #[test]
    fn quiet_day_is_empty(ctx: &mut ReportContext) {
        let report = end_of_day_report(&ctx.time_clock, "shop-1", &ctx.users, day(), &Utc).unwrap();
        assert!(report.employees.is_empty());
        assert_eq!(report.total_cost, 0.0);
        assert!(report.exceptions.is_empty());
    }
}
