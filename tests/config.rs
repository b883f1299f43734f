#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use shopclock::libs::config::{Config, TimeClockConfig, CONFIG_FILE_NAME};
    use shopclock::libs::pay_period::{OvertimeType, PayPeriodType, PayrollSettings};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ConfigTestContext {
        _temp_dir: TempDir,
        path: PathBuf,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let path = temp_dir.path().join(CONFIG_FILE_NAME);
            ConfigTestContext {
                _temp_dir: temp_dir,
                path,
            }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn missing_file_gives_defaults(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.time_clock(), TimeClockConfig::default());
        assert_eq!(config.time_clock().cap_minutes, 960);
        assert_eq!(config.time_clock().reminder_minutes, 30);
        assert_eq!(config.payroll(), PayrollSettings::default());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn saved_config_reads_back(ctx: &mut ConfigTestContext) {
        let config = Config {
            user: Some("emp-3".to_string()),
            time_clock: Some(TimeClockConfig {
                cap_minutes: 720,
                reminder_minutes: 45,
                sweep_interval: 60,
                stale_after_hours: 14,
            }),
            payroll: Some(PayrollSettings {
                period_type: PayPeriodType::Biweekly,
                pay_day: Some("thursday".to_string()),
                anchor_date: NaiveDate::from_ymd_opt(2024, 1, 4),
                overtime_enabled: true,
                overtime_type: Some(OvertimeType::Daily8),
                overtime_rate: Some(2.0),
            }),
        };
        config.save_to(&ctx.path).unwrap();

        let loaded = Config::read_from(&ctx.path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.time_clock().cap_minutes, 720);
        assert_eq!(loaded.payroll().overtime_multiplier(), 2.0);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn partial_file_fills_in_the_rest(ctx: &mut ConfigTestContext) {
        std::fs::write(&ctx.path, r#"{"user": "emp-9", "payroll": {"period_type": "biweekly"}}"#).unwrap();

        let config = Config::read_from(&ctx.path).unwrap();
        assert_eq!(config.user.as_deref(), Some("emp-9"));
        assert_eq!(config.time_clock(), TimeClockConfig::default());
        let payroll = config.payroll();
        assert_eq!(payroll.period_type, PayPeriodType::Biweekly);
        assert!(!payroll.overtime_enabled);
        assert_eq!(payroll.overtime_multiplier(), 1.5);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn malformed_file_is_an_error(ctx: &mut ConfigTestContext) {
        std::fs::write(&ctx.path, "{ not json").unwrap();
        assert!(Config::read_from(&ctx.path).is_err());
    }
}
