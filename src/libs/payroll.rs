//! Organization payroll summary.
//!
//! For each employee the amount owed covers the pay period, starting the
//! day after their last recorded payment if that falls inside the period.

use crate::db::time_entries::EntryStore;
use crate::db::users::{User, Users};
use crate::libs::clock::Clock;
use crate::libs::error::{StoreError, TimeClockError};
use crate::libs::pay_period::{round_cents, EarningsBreakdown, PayPeriod, PayrollSettings};
use crate::libs::time_clock::TimeClock;
use chrono::{Duration, NaiveDate, TimeZone};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollLine {
    pub user_id: String,
    pub name: String,
    pub hourly_rate: f64,
    /// First local date counted for this employee.
    pub since: NaiveDate,
    pub earnings: EarningsBreakdown,
    /// Still clocked in; the running entry is not part of the amount.
    pub open_entry: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayrollSummary {
    pub organization_id: String,
    pub period: PayPeriod,
    pub lines: Vec<PayrollLine>,
    pub total_hours: f64,
    pub total_pay: f64,
}

/// First date still owed to `user` within `period`.
pub fn owed_since(user: &User, period: &PayPeriod) -> NaiveDate {
    match user.last_paid_date {
        Some(paid) if paid >= period.start => paid + Duration::days(1),
        _ => period.start,
    }
}

pub fn payroll_summary<S: EntryStore, C: Clock, Tz: TimeZone>(
    time_clock: &TimeClock<S, C>,
    organization_id: &str,
    users: &[User],
    period: &PayPeriod,
    settings: &PayrollSettings,
    tz: &Tz,
) -> Result<PayrollSummary, TimeClockError> {
    let mut lines = Vec::with_capacity(users.len());

    for user in users.iter().filter(|u| u.organization_id == organization_id) {
        let since = owed_since(user, period);
        let earnings = time_clock.earnings_between(user, since, period.end, settings, tz)?;
        let open_entry = time_clock.store().find_open_entry_for_user(&user.id)?.is_some();
        lines.push(PayrollLine {
            user_id: user.id.clone(),
            name: user.name.clone(),
            hourly_rate: user.hourly_rate,
            since,
            earnings,
            open_entry,
        });
    }

    let total_hours = round_cents(lines.iter().map(|l| l.earnings.paid_hours()).sum());
    let total_pay = round_cents(lines.iter().map(|l| l.earnings.total_pay).sum());

    Ok(PayrollSummary {
        organization_id: organization_id.to_string(),
        period: period.clone(),
        lines,
        total_hours,
        total_pay,
    })
}

/// Records that `user_id` was paid through `date` and returns the updated
/// user.
pub fn mark_paid(users: &Users, user_id: &str, date: NaiveDate) -> Result<User, StoreError> {
    users.mark_paid(user_id, date)?;
    users.get(user_id)?.ok_or_else(|| StoreError::NotFound(user_id.to_string()))
}
