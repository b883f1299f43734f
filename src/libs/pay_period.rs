//! Pay-period boundaries and overtime earnings.
//!
//! A pay period always ends on the organization's pay day. Weekly periods
//! cover the seven days ending on that day; bi-weekly periods cover fourteen
//! days and are aligned to an anchor date so consecutive periods never
//! overlap.
//!
//! Earnings are split into regular and overtime hours under either a daily
//! (8 hours per calendar day) or a weekly (40 hours per period) rule. Hours
//! and amounts are rounded to cents only at the end, unlike the raw second
//! accounting in [`crate::libs::soft_cap`], which truncates.

use crate::libs::clock::Clock;
use crate::libs::time_entry::TimeEntry;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Anchor used when bi-weekly settings do not name one (a Friday).
pub fn default_anchor() -> NaiveDate {
    // Literal date, always valid.
    NaiveDate::from_ymd_opt(2024, 1, 5).unwrap_or_default()
}

pub const DEFAULT_OVERTIME_MULTIPLIER: f64 = 1.5;
pub const DAILY_OVERTIME_THRESHOLD: f64 = 8.0;
pub const WEEKLY_OVERTIME_THRESHOLD: f64 = 40.0;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayPeriodType {
    #[default]
    Weekly,
    Biweekly,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OvertimeType {
    Daily8,
    Weekly40,
}

/// Organization payroll configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PayrollSettings {
    #[serde(default)]
    pub period_type: PayPeriodType,

    /// Weekday name ("friday"); unknown or missing means Friday.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_day: Option<String>,

    /// Bi-weekly alignment anchor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_date: Option<NaiveDate>,

    #[serde(default)]
    pub overtime_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overtime_type: Option<OvertimeType>,

    /// Overtime multiplier; missing or zero means 1.5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overtime_rate: Option<f64>,
}

impl Default for PayrollSettings {
    fn default() -> Self {
        PayrollSettings {
            period_type: PayPeriodType::Weekly,
            pay_day: Some("friday".to_string()),
            anchor_date: None,
            overtime_enabled: false,
            overtime_type: Some(OvertimeType::Weekly40),
            overtime_rate: Some(DEFAULT_OVERTIME_MULTIPLIER),
        }
    }
}

impl PayrollSettings {
    pub fn pay_weekday(&self) -> Weekday {
        self.pay_day
            .as_deref()
            .and_then(|day| day.trim().parse::<Weekday>().ok())
            .unwrap_or(Weekday::Fri)
    }

    pub fn overtime_multiplier(&self) -> f64 {
        match self.overtime_rate {
            Some(rate) if rate > 0.0 => rate,
            _ => DEFAULT_OVERTIME_MULTIPLIER,
        }
    }
}

/// Inclusive calendar window `[start, end]`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PayPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

impl PayPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Half-open UTC range `[start 00:00, day after end 00:00)` in `tz`.
    pub fn bounds<Tz: TimeZone>(&self, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        (local_midnight(self.start, tz), local_midnight(self.end + Duration::days(1), tz))
    }
}

fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// Period containing `date`.
pub fn pay_period_for_date(date: NaiveDate, settings: &PayrollSettings) -> PayPeriod {
    let pay_day = settings.pay_weekday().num_days_from_sunday();
    let today = date.weekday().num_days_from_sunday();
    let days_until_pay_day = (pay_day + 7 - today) % 7;

    let mut end = date + Duration::days(days_until_pay_day as i64);
    let start = match settings.period_type {
        PayPeriodType::Biweekly => {
            let anchor = settings.anchor_date.unwrap_or_else(default_anchor);
            let weeks_since_anchor = (end - anchor).num_days().div_euclid(7);
            if weeks_since_anchor.rem_euclid(2) != 0 {
                end += Duration::days(7);
            }
            end - Duration::days(13)
        }
        PayPeriodType::Weekly => end - Duration::days(6),
    };

    PayPeriod {
        start,
        end,
        label: format!("{} - {}", start.format("%b %-d"), end.format("%b %-d")),
    }
}

/// Period containing the clock's current local date.
pub fn current_pay_period<C: Clock + ?Sized, Tz: TimeZone>(settings: &PayrollSettings, clock: &C, tz: &Tz) -> PayPeriod {
    let today = clock.now().with_timezone(tz).date_naive();
    pay_period_for_date(today, settings)
}

/// Period ending the day before the current one starts.
pub fn previous_pay_period<C: Clock + ?Sized, Tz: TimeZone>(settings: &PayrollSettings, clock: &C, tz: &Tz) -> PayPeriod {
    let current = current_pay_period(settings, clock, tz);
    pay_period_for_date(current.start - Duration::days(1), settings)
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct EarningsBreakdown {
    pub regular_hours: f64,
    pub overtime_hours: f64,
    pub regular_pay: f64,
    pub overtime_pay: f64,
    pub total_pay: f64,
}

impl EarningsBreakdown {
    pub fn paid_hours(&self) -> f64 {
        round_cents(self.regular_hours + self.overtime_hours)
    }
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn daily_overtime(hours_by_day: &BTreeMap<NaiveDate, f64>, threshold: f64) -> (f64, f64) {
    hours_by_day.values().fold((0.0, 0.0), |(regular, overtime), &hours| {
        if hours <= threshold {
            (regular + hours, overtime)
        } else {
            (regular + threshold, overtime + hours - threshold)
        }
    })
}

/// Splits `total_hours` into regular and overtime pay.
///
/// The daily rule needs `hours_by_day`; without it every hour is regular.
pub fn calculate_earnings(
    total_hours: f64,
    hourly_rate: f64,
    settings: &PayrollSettings,
    hours_by_day: Option<&BTreeMap<NaiveDate, f64>>,
) -> EarningsBreakdown {
    let rate = if hourly_rate.is_finite() { hourly_rate } else { 0.0 };
    let mut regular_hours = total_hours;
    let mut overtime_hours = 0.0;

    if settings.overtime_enabled {
        match (settings.overtime_type, hours_by_day) {
            (Some(OvertimeType::Daily8), Some(by_day)) => {
                (regular_hours, overtime_hours) = daily_overtime(by_day, DAILY_OVERTIME_THRESHOLD);
            }
            (Some(OvertimeType::Weekly40), _) if total_hours > WEEKLY_OVERTIME_THRESHOLD => {
                regular_hours = WEEKLY_OVERTIME_THRESHOLD;
                overtime_hours = total_hours - WEEKLY_OVERTIME_THRESHOLD;
            }
            _ => {}
        }
    }

    let regular_pay = regular_hours * rate;
    let overtime_pay = overtime_hours * rate * settings.overtime_multiplier();

    EarningsBreakdown {
        regular_hours: round_cents(regular_hours),
        overtime_hours: round_cents(overtime_hours),
        regular_pay: round_cents(regular_pay),
        overtime_pay: round_cents(overtime_pay),
        total_pay: round_cents(regular_pay + overtime_pay),
    }
}

/// Sums hours per local calendar day of the given instants.
pub fn group_hours_by_day<Tz, I>(items: I, tz: &Tz) -> BTreeMap<NaiveDate, f64>
where
    Tz: TimeZone,
    I: IntoIterator<Item = (DateTime<Utc>, f64)>,
{
    let mut by_day = BTreeMap::new();
    for (instant, hours) in items {
        *by_day.entry(instant.with_timezone(tz).date_naive()).or_insert(0.0) += hours;
    }
    by_day
}

/// Buckets recorded `duration_hours` by the local date of each clock-in.
/// Entries without a duration count as zero. Payable hours go through
/// [`group_hours_by_day`] with the soft cap applied instead.
pub fn group_entries_by_day<Tz: TimeZone>(entries: &[TimeEntry], tz: &Tz) -> BTreeMap<NaiveDate, f64> {
    group_hours_by_day(entries.iter().map(|e| (e.clock_in, e.duration_hours.unwrap_or(0.0))), tz)
}
