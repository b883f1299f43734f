//! Time entry record and its phase/flag enums.
//!
//! A [`TimeEntry`] is one attendance record opened by a clock-in. It carries
//! the settled-work accumulator and the soft-cap bookkeeping that
//! [`crate::libs::soft_cap`] operates on.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default soft cap: 16 hours of net work.
pub const DEFAULT_CAP_MINUTES: i64 = 960;

/// Reminder window before the cap is reached.
pub const CAP_REMINDER_OFFSET_MINUTES: i64 = 30;

/// Phase of an entry. `ClockedOut` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryState {
    Working,
    OnBreak,
    ClockedOut,
}

impl EntryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryState::Working => "WORKING",
            EntryState::OnBreak => "ON_BREAK",
            EntryState::ClockedOut => "CLOCKED_OUT",
        }
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WORKING" => Ok(EntryState::Working),
            "ON_BREAK" => Ok(EntryState::OnBreak),
            "CLOCKED_OUT" => Ok(EntryState::ClockedOut),
            other => Err(format!("unknown entry state '{}'", other)),
        }
    }
}

/// Review flag on an entry.
///
/// `OverCap` and `ForgotClockOut` are set by different paths and never
/// coexist on the same entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlagStatus {
    None,
    OverCap,
    EditRequestPending,
    Resolved,
    ForgotClockOut,
}

impl FlagStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagStatus::None => "NONE",
            FlagStatus::OverCap => "OVER_CAP",
            FlagStatus::EditRequestPending => "EDIT_REQUEST_PENDING",
            FlagStatus::Resolved => "RESOLVED",
            FlagStatus::ForgotClockOut => "FORGOT_CLOCK_OUT",
        }
    }
}

impl fmt::Display for FlagStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlagStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(FlagStatus::None),
            "OVER_CAP" => Ok(FlagStatus::OverCap),
            "EDIT_REQUEST_PENDING" => Ok(FlagStatus::EditRequestPending),
            "RESOLVED" => Ok(FlagStatus::Resolved),
            "FORGOT_CLOCK_OUT" => Ok(FlagStatus::ForgotClockOut),
            other => Err(format!("unknown flag status '{}'", other)),
        }
    }
}

/// One attendance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: i64,
    pub user_id: String,
    pub organization_id: String,
    pub job_id: Option<String>,
    /// Set at creation, never changed.
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    /// Legacy single-break markers, kept for display.
    pub break_start: Option<DateTime<Utc>>,
    pub break_end: Option<DateTime<Utc>>,
    pub state: EntryState,
    /// Net work seconds of settled segments only.
    pub work_accum_seconds: i64,
    pub last_state_change_at: Option<DateTime<Utc>>,
    pub cap_minutes: i64,
    pub flag_status: FlagStatus,
    /// First instant net work reached the cap. Written once.
    pub over_cap_at: Option<DateTime<Utc>>,
    /// Frozen audit snapshot written by a forgot-clock-out correction.
    pub wrong_recorded_net_seconds: Option<i64>,
    pub correction_note: Option<String>,
    pub correction_applied_at: Option<DateTime<Utc>>,
    pub duration_hours: Option<f64>,
    pub notes: Option<String>,
    /// Optimistic concurrency token, bumped by every persisted update.
    pub version: i64,
}

/// Fields needed to persist a freshly opened entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTimeEntry {
    pub user_id: String,
    pub organization_id: String,
    pub job_id: Option<String>,
    pub clock_in: DateTime<Utc>,
    pub cap_minutes: i64,
}

impl TimeEntry {
    /// Builds an unsaved entry in its initial phase: working, nothing
    /// settled, the cap clock starting at `clock_in`.
    pub fn open(new_entry: &NewTimeEntry) -> Self {
        TimeEntry {
            id: 0,
            user_id: new_entry.user_id.clone(),
            organization_id: new_entry.organization_id.clone(),
            job_id: new_entry.job_id.clone(),
            clock_in: new_entry.clock_in,
            clock_out: None,
            break_start: None,
            break_end: None,
            state: EntryState::Working,
            work_accum_seconds: 0,
            last_state_change_at: Some(new_entry.clock_in),
            cap_minutes: new_entry.cap_minutes,
            flag_status: FlagStatus::None,
            over_cap_at: None,
            wrong_recorded_net_seconds: None,
            correction_note: None,
            correction_applied_at: None,
            duration_hours: None,
            notes: None,
            version: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    /// Length of the last recorded break, running up to `now` while the
    /// entry is still on it.
    pub fn break_seconds(&self, now: DateTime<Utc>) -> i64 {
        match self.break_start {
            Some(start) => {
                let end = self.break_end.or(self.clock_out).unwrap_or(now);
                (end - start).num_seconds().max(0)
            }
            None => 0,
        }
    }

    /// An open entry running for longer than `stale_after` since clock-in is
    /// a forgot-clock-out candidate.
    pub fn is_stale(&self, now: DateTime<Utc>, stale_after: Duration) -> bool {
        self.is_open() && now - self.clock_in >= stale_after
    }

    /// True when the frozen wrong snapshot was itself past the cap.
    pub fn wrong_exceeded_cap(&self) -> bool {
        self.wrong_recorded_net_seconds
            .map(|seconds| seconds >= self.cap_minutes * 60)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn new_entry() -> NewTimeEntry {
        NewTimeEntry {
            user_id: "u-1".to_string(),
            organization_id: "org-1".to_string(),
            job_id: None,
            clock_in: Utc.with_ymd_and_hms(2025, 2, 3, 7, 0, 0).unwrap(),
            cap_minutes: DEFAULT_CAP_MINUTES,
        }
    }

    #[test]
    fn open_sets_initial_cap_fields() {
        let entry = TimeEntry::open(&new_entry());
        assert_eq!(entry.state, EntryState::Working);
        assert_eq!(entry.work_accum_seconds, 0);
        assert_eq!(entry.last_state_change_at, Some(entry.clock_in));
        assert_eq!(entry.flag_status, FlagStatus::None);
        assert!(entry.over_cap_at.is_none());
        assert!(entry.is_open());
    }

    #[test]
    fn enums_round_trip_through_strings() {
        for state in [EntryState::Working, EntryState::OnBreak, EntryState::ClockedOut] {
            assert_eq!(state.as_str().parse::<EntryState>().unwrap(), state);
        }
        assert_eq!("FORGOT_CLOCK_OUT".parse::<FlagStatus>().unwrap(), FlagStatus::ForgotClockOut);
        assert!("LATE".parse::<FlagStatus>().is_err());
    }

    #[test]
    fn break_seconds_runs_until_now_when_open() {
        let mut entry = TimeEntry::open(&new_entry());
        let start = entry.clock_in + Duration::hours(4);
        entry.break_start = Some(start);
        assert_eq!(entry.break_seconds(start + Duration::minutes(10)), 600);

        entry.break_end = Some(start + Duration::minutes(30));
        assert_eq!(entry.break_seconds(start + Duration::hours(3)), 1800);
    }

    #[test]
    fn stale_only_when_open_and_old() {
        let mut entry = TimeEntry::open(&new_entry());
        let later = entry.clock_in + Duration::hours(21);
        assert!(entry.is_stale(later, Duration::hours(20)));
        assert!(!entry.is_stale(entry.clock_in + Duration::hours(9), Duration::hours(20)));

        entry.clock_out = Some(later);
        assert!(!entry.is_stale(later, Duration::hours(20)));
    }
}
