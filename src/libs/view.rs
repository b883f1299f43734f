use crate::db::users::User;
use crate::libs::formatter::{format_currency, format_datetime, format_hours, format_seconds, format_time};
use crate::libs::pay_period::EarningsBreakdown;
use crate::libs::payroll::PayrollSummary;
use crate::libs::report::EodReport;
use crate::libs::soft_cap;
use crate::libs::time_clock::EntryStatus;
use crate::libs::time_entry::{FlagStatus, TimeEntry};
use chrono::{DateTime, NaiveDate, Utc};
use prettytable::{row, Table};
use std::collections::BTreeMap;

pub struct View {}

fn optional(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

impl View {
    pub fn entries(entries: &[TimeEntry], now: DateTime<Utc>) -> Table {
        let mut table = Table::new();
        table.add_row(row!["ID", "CLOCK IN", "CLOCK OUT", "STATE", "NET", "PAID", "FLAG", "JOB", "NOTES"]);
        for entry in entries {
            let flag = match entry.flag_status {
                FlagStatus::None => String::new(),
                other => other.to_string(),
            };
            table.add_row(row![
                entry.id,
                format_datetime(&entry.clock_in),
                entry.clock_out.as_ref().map(format_datetime).unwrap_or_else(|| "-".to_string()),
                entry.state,
                format_seconds(soft_cap::net_work_seconds(entry, now)),
                format_seconds(soft_cap::effective_net_work_seconds(entry, now)),
                flag,
                optional(entry.job_id.as_deref()),
                optional(entry.notes.as_deref())
            ]);
        }
        table
    }

    pub fn daily_hours(by_day: &BTreeMap<NaiveDate, f64>) -> Table {
        let mut table = Table::new();
        table.add_row(row!["DATE", "HOURS"]);
        for (date, hours) in by_day {
            table.add_row(row![date.format("%a %b %-d"), format_hours(*hours)]);
        }
        table
    }

    pub fn status(status: &EntryStatus) -> Table {
        let entry = &status.entry;
        let mut table = Table::new();
        table.add_row(row!["Entry", entry.id]);
        table.add_row(row!["Clocked in", format_time(&entry.clock_in)]);
        table.add_row(row!["State", entry.state]);
        table.add_row(row!["Net work", format_seconds(status.net_seconds)]);
        table.add_row(row!["Payable", format_seconds(status.effective_seconds)]);
        table.add_row(row!["Cap", format_seconds(soft_cap::cap_seconds(entry))]);
        if let Some(over_cap_at) = entry.over_cap_at {
            table.add_row(row!["Over cap since", format_time(&over_cap_at)]);
        }
        if let Some(job_id) = &entry.job_id {
            table.add_row(row!["Job", job_id]);
        }
        table
    }

    pub fn users(users: &[User]) -> Table {
        let mut table = Table::new();
        table.add_row(row!["ID", "ORGANIZATION", "NAME", "EMAIL", "RATE", "LAST PAID"]);
        for user in users {
            table.add_row(row![
                user.id,
                user.organization_id,
                user.name,
                optional(user.email.as_deref()),
                format_currency(user.hourly_rate),
                user.last_paid_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
            ]);
        }
        table
    }

    pub fn earnings(earnings: &EarningsBreakdown) -> Table {
        let mut table = Table::new();
        table.add_row(row!["", "HOURS", "PAY"]);
        table.add_row(row!["Regular", format_hours(earnings.regular_hours), format_currency(earnings.regular_pay)]);
        table.add_row(row!["Overtime", format_hours(earnings.overtime_hours), format_currency(earnings.overtime_pay)]);
        table.add_row(row!["Total", format_hours(earnings.paid_hours()), format_currency(earnings.total_pay)]);
        table
    }

    pub fn payroll(summary: &PayrollSummary) -> Table {
        let mut table = Table::new();
        table.add_row(row!["EMPLOYEE", "SINCE", "RATE", "REGULAR", "OVERTIME", "OWED", ""]);
        for line in &summary.lines {
            table.add_row(row![
                line.name,
                line.since,
                format_currency(line.hourly_rate),
                format_hours(line.earnings.regular_hours),
                format_hours(line.earnings.overtime_hours),
                format_currency(line.earnings.total_pay),
                if line.open_entry { "clocked in" } else { "" }
            ]);
        }
        table.add_row(row![
            "TOTAL",
            "",
            "",
            format_hours(summary.total_hours),
            "",
            format_currency(summary.total_pay),
            ""
        ]);
        table
    }

    pub fn report(report: &EodReport) -> Table {
        let mut table = Table::new();
        table.add_row(row!["EMPLOYEE", "ENTRIES", "NET", "BREAKS", "PAID", "COST", "JOBS", "FLAGS"]);
        for employee in &report.employees {
            let jobs: Vec<&str> = employee.jobs.iter().map(String::as_str).collect();
            let flags: Vec<&str> = employee.flags.iter().map(|f| f.as_str()).collect();
            table.add_row(row![
                employee.name,
                employee.entries,
                format_hours(employee.net_hours),
                format_hours(employee.break_hours),
                format_hours(employee.paid_hours),
                format_currency(employee.labor_cost),
                jobs.join(", "),
                flags.join(", ")
            ]);
        }
        table
    }
}
