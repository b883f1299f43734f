use super::{parse_date, AppContext};
use crate::libs::formatter::{format_currency, format_hours};
use crate::libs::messages::Message;
use crate::libs::report::{end_of_day_report, ReportFlag};
use crate::libs::view::View;
use crate::{msg_info, msg_print, msg_success, msg_warning};
use anyhow::Result;
use chrono::Local;
use clap::Args;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Organization id.
    #[arg(long)]
    org: String,

    #[arg(long, short, default_value = "today", help = "Report date (YYYY-MM-DD or 'today')")]
    date: String,
}

pub fn cmd(args: ReportArgs) -> Result<()> {
    let ctx = AppContext::new()?;
    let date = parse_date(&args.date, ctx.time_clock.clock(), &Local)?;
    let users = ctx.users().list(Some(&args.org))?;

    let report = end_of_day_report(&ctx.time_clock, &args.org, &users, date, &Local)?;
    msg_print!(Message::ReportHeader(args.org.clone(), date.to_string()), true);
    if report.employees.is_empty() {
        msg_info!(Message::NoEntriesFound);
        return Ok(());
    }

    View::report(&report).printstd();
    msg_print!(Message::ReportTotals {
        hours: format_hours(report.total_hours),
        cost: format_currency(report.total_cost),
        employees: report.employees.len(),
        flags: report.flag_count,
    });

    if report.exceptions.is_empty() {
        msg_success!(Message::ReportNoExceptions);
        return Ok(());
    }
    msg_print!(Message::ReportExceptionsHeader);
    for exception in report.exceptions {
        let message = match exception.flag {
            ReportFlag::OpenEntry => Message::ExceptionOpenEntry(exception.name),
            ReportFlag::OverCap => Message::ExceptionOverCap(exception.name),
            ReportFlag::ForgotClockOut => Message::ExceptionForgotClockOut(exception.name),
            ReportFlag::MissingNotes => continue,
        };
        msg_warning!(message);
    }
    Ok(())
}
