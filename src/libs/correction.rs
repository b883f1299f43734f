//! Forgot-clock-out correction.
//!
//! Closes a stale open entry at an employee-supplied end time. The net work
//! a naive clock-out would have recorded at the moment of correction is
//! frozen in `wrong_recorded_net_seconds` for audit and is never recomputed.

use crate::libs::error::ValidationError;
use crate::libs::soft_cap::{self, settle};
use crate::libs::time_entry::{EntryState, FlagStatus, TimeEntry};
use chrono::{DateTime, Utc};

/// Seconds of the last recorded break that fall before `end`. A break still
/// open at `end` runs until `end`.
fn recorded_break_seconds(entry: &TimeEntry, end: DateTime<Utc>) -> i64 {
    match entry.break_start {
        Some(start) if start < end => {
            let stop = entry.break_end.unwrap_or(end).min(end);
            (stop - start).num_seconds().max(0)
        }
        _ => 0,
    }
}

/// Net work from `clock_in` to `end`, read from the unsettled entry.
///
/// When `end` falls in the current segment the accumulator already excludes
/// every break taken so far. An earlier `end` only knows the last break
/// interval, so earlier breaks before it are not subtracted.
fn net_seconds_until(entry: &TimeEntry, end: DateTime<Utc>) -> i64 {
    match entry.last_state_change_at {
        Some(since) if since <= end => {
            let running = match entry.state {
                EntryState::Working => (end - since).num_seconds().max(0),
                _ => 0,
            };
            entry.work_accum_seconds + running
        }
        _ => ((end - entry.clock_in).num_seconds() - recorded_break_seconds(entry, end)).max(0),
    }
}

/// Applies the correction to an open entry.
///
/// `corrected_end` must lie strictly between `clock_in` and `now`. On error
/// the entry is left untouched.
pub fn correct_forgot_clock_out(
    entry: &mut TimeEntry,
    corrected_end: DateTime<Utc>,
    note: &str,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if corrected_end <= entry.clock_in {
        return Err(ValidationError::CorrectedEndNotAfterClockIn);
    }
    if corrected_end >= now {
        return Err(ValidationError::CorrectedEndNotBeforeNow);
    }

    let corrected_net = net_seconds_until(entry, corrected_end);
    settle(entry, now);
    if entry.wrong_recorded_net_seconds.is_none() {
        entry.wrong_recorded_net_seconds = Some(entry.work_accum_seconds);
    }
    entry.work_accum_seconds = corrected_net;

    if entry.state == EntryState::OnBreak && entry.break_end.is_none() {
        entry.break_end = entry.break_start.map(|start| start.max(corrected_end));
    }
    entry.duration_hours = Some(soft_cap::duration_hours(entry));
    entry.clock_out = Some(corrected_end);
    entry.last_state_change_at = Some(corrected_end);
    entry.state = EntryState::ClockedOut;
    entry.flag_status = FlagStatus::ForgotClockOut;
    entry.correction_note = Some(note.to_string());
    entry.correction_applied_at = Some(now);
    Ok(())
}
