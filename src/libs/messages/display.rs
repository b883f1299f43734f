//! Text for every [`Message`] variant.
//!
//! Keeping all wording in one match makes the CLI output consistent and
//! leaves the call sites free of string literals.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TIME CLOCK MESSAGES ===
            Message::ClockedIn(id, time) => format!("Clocked in at {} (entry #{})", time, id),
            Message::ClockedOut(net) => format!("Clocked out. Net work: {}", net),
            Message::ClockedOutOverCap(net, payable) => {
                format!("Clocked out over the soft cap. Net work: {}, payable: {}. The entry is flagged for review.", net, payable)
            }
            Message::BreakStarted(time) => format!("Break started at {}", time),
            Message::BreakEnded(time) => format!("Break ended at {}, back to work", time),
            Message::StatusNotClockedIn => "You are not clocked in.".to_string(),
            Message::StatusWorking(since, net) => format!("Working since {}. Net work so far: {}", since, net),
            Message::StatusOnBreak(since, net) => format!("On break since {}. Net work so far: {}", since, net),
            Message::StatusApproachingCap(remaining) => format!("Approaching the soft cap: {} left", remaining),
            Message::StatusOverCap(at) => format!("Over the soft cap since {}", at),
            Message::StaleEntryWarning(hours) => {
                format!("This entry has been open for {} hours. If you forgot to clock out, use 'shopclock correct'.", hours)
            }

            // === CORRECTION MESSAGES ===
            Message::CorrectionApplied(wrong, corrected) => {
                format!("Correction applied. Recorded {} would have been paid; corrected to {}.", wrong, corrected)
            }
            Message::CorrectionWrongExceededCap => "The uncorrected time had already passed the soft cap.".to_string(),

            // === SWEEP MESSAGES ===
            Message::SweepCompleted {
                processed,
                flagged,
                approaching,
            } => format!(
                "Processed {} open entries, flagged {}, {} approaching the cap",
                processed, flagged, approaching
            ),
            Message::SweepStarted(interval) => format!("Soft-cap sweep running every {} seconds", interval),
            Message::SweepShuttingDown => "Soft-cap sweep shutting down".to_string(),
            Message::SweepReceivedSigterm => "Received SIGTERM".to_string(),
            Message::SweepReceivedSigint => "Received SIGINT".to_string(),
            Message::SweepReceivedCtrlC => "Received Ctrl+C".to_string(),
            Message::SweepSignalListenFailed(error) => format!("Failed to listen for shutdown signals: {}", error),
            Message::SweepFailed(error) => format!("Soft-cap sweep failed: {}", error),
            Message::SweepTaskPanicked(error) => format!("Soft-cap sweep task panicked: {}", error),

            // === USER MESSAGES ===
            Message::UserAdded(id) => format!("User '{}' saved", id),
            Message::UserRateUpdated(id, rate) => format!("Hourly rate of '{}' set to {:.2}", id, rate),
            Message::UserMarkedPaid(id, date) => format!("'{}' marked as paid on {}", id, date),
            Message::UserNotFound(id) => format!("User '{}' not found", id),
            Message::NoUserSelected => "No user selected. Pass --user or set a default user with 'shopclock init'.".to_string(),
            Message::NoUsersFound(org) => format!("No users found in organization '{}'", org),

            // === ENTRY / REPORT MESSAGES ===
            Message::NoEntriesFound => "No time entries found.".to_string(),
            Message::EntriesHeader(user) => format!("Time entries of {}", user),
            Message::DailyTotalsHeader => "Recorded hours by day:".to_string(),
            Message::EarningsHeader(user, label) => format!("Earnings of {} for {}", user, label),
            Message::PayrollHeader(org, label) => format!("Payroll of {} for {}", org, label),
            Message::ReportHeader(org, date) => format!("End of day report for {} on {}", org, date),
            Message::ReportTotals {
                hours,
                cost,
                employees,
                flags,
            } => format!(
                "Labor: {} across {} employees, cost {}. Flags: {}",
                hours, employees, cost, flags
            ),
            Message::ReportExceptionsHeader => "Exceptions:".to_string(),
            Message::ReportNoExceptions => "No exceptions.".to_string(),
            Message::ExceptionOpenEntry(name) => format!("{}: Open time entry (not clocked out)", name),
            Message::ExceptionOverCap(name) => format!("{}: Over the soft cap, payable time capped", name),
            Message::ExceptionForgotClockOut(name) => format!("{}: Forgot-clock-out correction applied", name),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigModuleTimeClock => "Time clock settings".to_string(),
            Message::ConfigModulePayroll => "Payroll settings".to_string(),
            Message::ConfigModuleUser => "Default user".to_string(),

            // === INPUT MESSAGES ===
            Message::InvalidDateTime(value) => format!("Invalid date/time '{}', expected YYYY-MM-DD HH:MM", value),
            Message::InvalidDate(value) => format!("Invalid date '{}', expected YYYY-MM-DD or 'today'", value),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select settings to configure".to_string(),
            Message::PromptDefaultUser => "User id to act as by default".to_string(),
            Message::PromptCapMinutes => "Soft cap in minutes of net work".to_string(),
            Message::PromptReminderMinutes => "Reminder window before the cap (minutes)".to_string(),
            Message::PromptSweepInterval => "Sweep interval (seconds)".to_string(),
            Message::PromptStaleAfterHours => "Warn about open entries after (hours)".to_string(),
            Message::PromptPayPeriodType => "Pay period".to_string(),
            Message::PromptPayDay => "Pay day".to_string(),
            Message::PromptAnchorDate => "Bi-weekly anchor date (YYYY-MM-DD, empty for default)".to_string(),
            Message::PromptOvertimeEnabled => "Pay overtime?".to_string(),
            Message::PromptOvertimeType => "Overtime rule".to_string(),
            Message::PromptOvertimeRate => "Overtime multiplier".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All migrations completed".to_string(),
            Message::DatabaseUpToDate => "Database is up to date".to_string(),
        };
        write!(f, "{}", text)
    }
}
