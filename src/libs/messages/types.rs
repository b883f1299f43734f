/// Every user-facing message in shopclock.
///
/// Text lives in `display.rs`; call sites only pick a variant and supply
/// its parameters.
#[derive(Debug, Clone)]
pub enum Message {
    // === TIME CLOCK MESSAGES ===
    ClockedIn(i64, String), // entry id, time
    ClockedOut(String),     // net work
    ClockedOutOverCap(String, String), // net work, payable
    BreakStarted(String),   // time
    BreakEnded(String),     // time
    StatusNotClockedIn,
    StatusWorking(String, String), // since, net work
    StatusOnBreak(String, String), // since, net work
    StatusApproachingCap(String),  // remaining
    StatusOverCap(String),         // crossed at
    StaleEntryWarning(i64),        // hours open

    // === CORRECTION MESSAGES ===
    CorrectionApplied(String, String), // wrong net, corrected net
    CorrectionWrongExceededCap,

    // === SWEEP MESSAGES ===
    SweepCompleted {
        processed: usize,
        flagged: usize,
        approaching: usize,
    },
    SweepStarted(u64),                       // interval seconds
    SweepShuttingDown,
    SweepReceivedSigterm,
    SweepReceivedSigint,
    SweepReceivedCtrlC,
    SweepSignalListenFailed(String),
    SweepFailed(String),
    SweepTaskPanicked(String),

    // === USER MESSAGES ===
    UserAdded(String),
    UserRateUpdated(String, f64),
    UserMarkedPaid(String, String), // user, date
    UserNotFound(String),
    NoUserSelected,
    NoUsersFound(String), // organization

    // === ENTRY / REPORT MESSAGES ===
    NoEntriesFound,
    EntriesHeader(String),         // user
    DailyTotalsHeader,
    EarningsHeader(String, String), // user, period label
    PayrollHeader(String, String),  // organization, period label
    ReportHeader(String, String),   // organization, date
    ReportTotals {
        hours: String,
        cost: String,
        employees: usize,
        flags: usize,
    },
    ReportExceptionsHeader,
    ReportNoExceptions,
    ExceptionOpenEntry(String),
    ExceptionOverCap(String),
    ExceptionForgotClockOut(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigModuleTimeClock,
    ConfigModulePayroll,
    ConfigModuleUser,

    // === INPUT MESSAGES ===
    InvalidDateTime(String),
    InvalidDate(String),

    // === PROMPTS ===
    PromptSelectModules,
    PromptDefaultUser,
    PromptCapMinutes,
    PromptReminderMinutes,
    PromptSweepInterval,
    PromptStaleAfterHours,
    PromptPayPeriodType,
    PromptPayDay,
    PromptAnchorDate,
    PromptOvertimeEnabled,
    PromptOvertimeType,
    PromptOvertimeRate,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),        // count
    RunningMigration(u32, String), // version, name
    MigrationCompleted(u32),       // version
    MigrationFailed(u32, String),  // version, error
    AllMigrationsCompleted,
    DatabaseUpToDate,
}
