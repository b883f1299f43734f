//! End-of-day labor report for an organization.

use crate::db::time_entries::EntryStore;
use crate::db::users::User;
use crate::libs::clock::Clock;
use crate::libs::error::TimeClockError;
use crate::libs::pay_period::{round_cents, PayPeriod};
use crate::libs::soft_cap;
use crate::libs::time_clock::TimeClock;
use crate::libs::time_entry::{FlagStatus, TimeEntry};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFlag {
    OpenEntry,
    OverCap,
    ForgotClockOut,
    MissingNotes,
}

impl ReportFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFlag::OpenEntry => "open_entry",
            ReportFlag::OverCap => "over_cap",
            ReportFlag::ForgotClockOut => "forgot_clock_out",
            ReportFlag::MissingNotes => "missing_notes",
        }
    }

    /// Flags that need a manager's attention.
    pub fn is_exception(&self) -> bool {
        !matches!(self, ReportFlag::MissingNotes)
    }
}

impl fmt::Display for ReportFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeDay {
    pub user_id: String,
    pub name: String,
    pub entries: usize,
    pub net_hours: f64,
    pub break_hours: f64,
    pub paid_hours: f64,
    pub labor_cost: f64,
    pub jobs: BTreeSet<String>,
    pub flags: BTreeSet<ReportFlag>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportException {
    pub name: String,
    pub flag: ReportFlag,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EodReport {
    pub organization_id: String,
    pub date: NaiveDate,
    pub employees: Vec<EmployeeDay>,
    pub total_hours: f64,
    pub total_cost: f64,
    pub flag_count: usize,
    pub exceptions: Vec<ReportException>,
}

fn entry_flags(entry: &TimeEntry, now: DateTime<Utc>) -> Vec<ReportFlag> {
    let mut flags = Vec::new();
    if entry.is_open() {
        flags.push(ReportFlag::OpenEntry);
    }
    if entry.flag_status == FlagStatus::OverCap || (entry.is_open() && soft_cap::is_over_cap(entry, now)) {
        flags.push(ReportFlag::OverCap);
    }
    if entry.flag_status == FlagStatus::ForgotClockOut {
        flags.push(ReportFlag::ForgotClockOut);
    }
    if !entry.is_open() && entry.notes.as_deref().map_or(true, |n| n.trim().is_empty()) {
        flags.push(ReportFlag::MissingNotes);
    }
    flags
}

/// Gross time on the clock minus net work; running entries count up to `now`.
fn break_seconds(entry: &TimeEntry, now: DateTime<Utc>) -> i64 {
    let end = entry.clock_out.unwrap_or(now);
    ((end - entry.clock_in).num_seconds() - soft_cap::net_work_seconds(entry, now)).max(0)
}

/// Report for entries clocked in on local `date`.
pub fn end_of_day_report<S: EntryStore, C: Clock, Tz: TimeZone>(
    time_clock: &TimeClock<S, C>,
    organization_id: &str,
    users: &[User],
    date: NaiveDate,
    tz: &Tz,
) -> Result<EodReport, TimeClockError> {
    let day = PayPeriod {
        start: date,
        end: date,
        label: String::new(),
    };
    let (from, to) = day.bounds(tz);
    let now = time_clock.clock().now();
    let directory: BTreeMap<&str, &User> = users.iter().map(|u| (u.id.as_str(), u)).collect();

    let mut by_user: BTreeMap<String, Vec<TimeEntry>> = BTreeMap::new();
    for entry in time_clock.store().find_organization_entries(organization_id, from, to)? {
        by_user.entry(entry.user_id.clone()).or_default().push(entry);
    }

    let mut employees = Vec::with_capacity(by_user.len());
    for (user_id, entries) in by_user {
        let user = directory.get(user_id.as_str());
        let name = user.map(|u| u.name.clone()).unwrap_or_else(|| user_id.clone());
        let rate = user.map(|u| u.hourly_rate).unwrap_or(0.0);

        let net: i64 = entries.iter().map(|e| soft_cap::net_work_seconds(e, now)).sum();
        let paid: i64 = entries.iter().map(|e| soft_cap::effective_net_work_seconds(e, now)).sum();
        let breaks: i64 = entries.iter().map(|e| break_seconds(e, now)).sum();
        let paid_hours = paid as f64 / 3600.0;

        employees.push(EmployeeDay {
            user_id,
            name,
            entries: entries.len(),
            net_hours: round_cents(net as f64 / 3600.0),
            break_hours: round_cents(breaks as f64 / 3600.0),
            paid_hours: round_cents(paid_hours),
            labor_cost: round_cents(paid_hours * rate),
            jobs: entries.iter().filter_map(|e| e.job_id.clone()).collect(),
            flags: entries.iter().flat_map(|e| entry_flags(e, now)).collect(),
        });
    }
    employees.sort_by(|a, b| a.name.cmp(&b.name));

    let exceptions: Vec<ReportException> = employees
        .iter()
        .flat_map(|e| {
            e.flags.iter().filter(|f| f.is_exception()).map(|&flag| ReportException {
                name: e.name.clone(),
                flag,
            })
        })
        .collect();

    Ok(EodReport {
        organization_id: organization_id.to_string(),
        date,
        total_hours: round_cents(employees.iter().map(|e| e.paid_hours).sum()),
        total_cost: round_cents(employees.iter().map(|e| e.labor_cost).sum()),
        flag_count: employees.iter().map(|e| e.flags.len()).sum(),
        employees,
        exceptions,
    })
}
