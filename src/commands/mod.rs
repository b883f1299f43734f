//! Command-line interface.
//!
//! Every subcommand lives in its own module with an `Args` struct and a
//! `cmd` function. [`AppContext`] gathers what most of them need: the
//! configuration, the database and a time clock on the system clock.

pub mod breaks;
pub mod clock_in;
pub mod clock_out;
pub mod correct;
pub mod earnings;
pub mod entries;
pub mod init;
pub mod payroll;
pub mod report;
pub mod status;
pub mod sweep;
pub mod user;

use crate::db::db::Db;
use crate::db::time_entries::TimeEntries;
use crate::db::users::{User, Users};
use crate::libs::clock::{Clock, SystemClock};
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::time_clock::TimeClock;
use crate::{msg_bail_anyhow, msg_error_anyhow};
use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configure default user, soft cap and payroll settings")]
    Init(init::InitArgs),
    #[command(about = "Manage employees", arg_required_else_help = true)]
    User(user::UserArgs),
    #[command(about = "Clock in")]
    In(clock_in::ClockInArgs),
    #[command(about = "Clock out")]
    Out(clock_out::ClockOutArgs),
    #[command(about = "Start or end a break", arg_required_else_help = true)]
    Break(breaks::BreakArgs),
    #[command(about = "Show the open time entry")]
    Status,
    #[command(about = "List recent time entries")]
    Entries(entries::EntriesArgs),
    #[command(about = "Close a forgotten open entry at the real end time")]
    Correct(correct::CorrectArgs),
    #[command(about = "Flag open entries that passed the soft cap")]
    Sweep(sweep::SweepArgs),
    #[command(about = "Show earnings for the pay period")]
    Earnings(earnings::EarningsArgs),
    #[command(about = "Show what an organization owes for the pay period")]
    Payroll(payroll::PayrollArgs),
    #[command(about = "End of day labor report")]
    Report(report::ReportArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// Act as this user instead of the configured default.
    #[arg(long, short, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        let user = cli.user;
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::User(args) => user::cmd(args),
            Commands::In(args) => clock_in::cmd(user, args),
            Commands::Out(args) => clock_out::cmd(user, args),
            Commands::Break(args) => breaks::cmd(user, args),
            Commands::Status => status::cmd(user),
            Commands::Entries(args) => entries::cmd(user, args),
            Commands::Correct(args) => correct::cmd(user, args),
            Commands::Sweep(args) => sweep::cmd(args).await,
            Commands::Earnings(args) => earnings::cmd(user, args),
            Commands::Payroll(args) => payroll::cmd(args),
            Commands::Report(args) => report::cmd(args),
        }
    }
}

/// Shared state of a single CLI invocation.
pub struct AppContext {
    pub config: Config,
    pub db: Db,
    pub time_clock: TimeClock<TimeEntries, SystemClock>,
}

impl AppContext {
    pub fn new() -> Result<Self> {
        let config = Config::read()?;
        let db = Db::new()?;
        let time_clock = TimeClock::with_config(TimeEntries::new(db.clone()), SystemClock, config.time_clock());
        Ok(AppContext { config, db, time_clock })
    }

    pub fn users(&self) -> Users {
        Users::new(self.db.clone())
    }

    /// Resolves `--user` or the configured default to a known employee.
    pub fn user(&self, requested: Option<String>) -> Result<User> {
        let id = match requested.or_else(|| self.config.user.clone()) {
            Some(id) if !id.trim().is_empty() => id,
            _ => msg_bail_anyhow!(Message::NoUserSelected),
        };
        self.users()
            .get(&id)?
            .ok_or_else(|| msg_error_anyhow!(Message::UserNotFound(id)))
    }
}

/// `YYYY-MM-DD` or `today`, where today is the clock's date in `tz`.
pub fn parse_date<C: Clock + ?Sized, Tz: TimeZone>(value: &str, clock: &C, tz: &Tz) -> Result<NaiveDate> {
    if value.eq_ignore_ascii_case("today") {
        return Ok(clock.now().with_timezone(tz).date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| msg_error_anyhow!(Message::InvalidDate(value.to_string())))
}

/// `YYYY-MM-DD HH:MM` in the given zone.
pub fn parse_local_datetime<Tz: TimeZone>(value: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%d %H:%M")
        .ok()
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| msg_error_anyhow!(Message::InvalidDateTime(value.to_string())))
}
