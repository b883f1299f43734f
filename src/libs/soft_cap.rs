//! Soft-cap accounting for time entries.
//!
//! Net work time is kept as a settled accumulator (`work_accum_seconds`) plus
//! the not-yet-settled tail of the current segment, measured from
//! `last_state_change_at`. Only `WORKING` segments ever reach the
//! accumulator, so break time is excluded without being tracked separately.
//!
//! Elapsed time is truncated to whole seconds, never rounded up, so an entry
//! is never credited with work that did not elapse.
//!
//! Once net work reaches the cap (16 hours by default) the entry is flagged
//! `OVER_CAP` and the crossing instant is recorded in `over_cap_at`. The
//! entry keeps running; payroll reads [`effective_net_work_seconds`], which
//! clamps flagged entries at the cap.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use shopclock::libs::soft_cap;
//! use shopclock::libs::time_entry::{NewTimeEntry, TimeEntry, DEFAULT_CAP_MINUTES};
//!
//! let t0 = Utc.with_ymd_and_hms(2025, 3, 3, 7, 0, 0).unwrap();
//! let mut entry = TimeEntry::open(&NewTimeEntry {
//!     user_id: "u-1".into(),
//!     organization_id: "org-1".into(),
//!     job_id: None,
//!     clock_in: t0,
//!     cap_minutes: DEFAULT_CAP_MINUTES,
//! });
//! soft_cap::start_break(&mut entry, t0 + Duration::hours(4));
//! soft_cap::end_break(&mut entry, t0 + Duration::minutes(270));
//! soft_cap::clock_out(&mut entry, t0 + Duration::minutes(510));
//! assert_eq!(entry.work_accum_seconds, 8 * 3600);
//! ```

use crate::libs::time_entry::{EntryState, FlagStatus, TimeEntry, CAP_REMINDER_OFFSET_MINUTES};
use chrono::{DateTime, Duration, Utc};

fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_seconds().max(0)
}

/// Commits the running segment into the accumulator and restarts the
/// segment at `now`.
///
/// Only a `WORKING` segment adds time; `last_state_change_at` moves to `now`
/// in every phase. Settling twice at the same instant adds nothing the
/// second time.
pub fn settle(entry: &mut TimeEntry, now: DateTime<Utc>) {
    if entry.state == EntryState::Working {
        if let Some(since) = entry.last_state_change_at {
            entry.work_accum_seconds += elapsed_seconds(since, now);
        }
    }
    entry.last_state_change_at = Some(now);
}

/// Net work seconds as of `now`, without committing anything.
pub fn net_work_seconds(entry: &TimeEntry, now: DateTime<Utc>) -> i64 {
    match (entry.state, entry.last_state_change_at) {
        (EntryState::Working, Some(since)) => entry.work_accum_seconds + elapsed_seconds(since, now),
        _ => entry.work_accum_seconds,
    }
}

pub fn net_work_hours(entry: &TimeEntry, now: DateTime<Utc>) -> f64 {
    net_work_seconds(entry, now) as f64 / 3600.0
}

pub fn cap_seconds(entry: &TimeEntry) -> i64 {
    entry.cap_minutes * 60
}

/// Instant at which the running segment reaches (or reached) the cap.
///
/// Outside a `WORKING` segment nothing is projected and the stored
/// `over_cap_at` is returned as is.
pub fn compute_over_cap_at(entry: &TimeEntry) -> Option<DateTime<Utc>> {
    let since = match (entry.state, entry.last_state_change_at) {
        (EntryState::Working, Some(since)) => since,
        _ => return entry.over_cap_at,
    };

    let remaining = cap_seconds(entry) - entry.work_accum_seconds;
    if remaining <= 0 {
        // The cap was already behind us when this segment started.
        return Some(since);
    }
    Some(since + Duration::seconds(remaining))
}

/// Flags the entry `OVER_CAP` once net work reaches the cap.
///
/// Returns `true` only when this call changed the flag. Re-applying to an
/// entry that is already flagged is a no-op, `over_cap_at` included.
pub fn apply_soft_cap_flag(entry: &mut TimeEntry, now: DateTime<Utc>) -> bool {
    let net = net_work_seconds(entry, now);
    let cap = cap_seconds(entry);

    if net < cap || entry.flag_status == FlagStatus::OverCap {
        return false;
    }

    entry.flag_status = FlagStatus::OverCap;
    if entry.over_cap_at.is_none() {
        entry.over_cap_at = match (entry.state, entry.last_state_change_at) {
            (EntryState::Working, Some(_)) => Some(now - Duration::seconds(net - cap)),
            _ => compute_over_cap_at(entry).or(Some(now)),
        };
    }
    true
}

/// Payroll-facing net work seconds: clamped at the cap for flagged entries.
pub fn effective_net_work_seconds(entry: &TimeEntry, now: DateTime<Utc>) -> i64 {
    let net = net_work_seconds(entry, now);
    if entry.flag_status == FlagStatus::OverCap {
        net.min(cap_seconds(entry))
    } else {
        net
    }
}

pub fn effective_net_work_hours(entry: &TimeEntry, now: DateTime<Utc>) -> f64 {
    effective_net_work_seconds(entry, now) as f64 / 3600.0
}

/// Within `reminder_minutes` of the cap but not at it, and not yet flagged.
pub fn is_approaching_cap(entry: &TimeEntry, now: DateTime<Utc>, reminder_minutes: i64) -> bool {
    if entry.flag_status == FlagStatus::OverCap {
        return false;
    }
    let net = net_work_seconds(entry, now);
    let cap = cap_seconds(entry);
    net >= cap - reminder_minutes * 60 && net < cap
}

/// [`is_approaching_cap`] with the default 30-minute window.
pub fn is_approaching_default_cap(entry: &TimeEntry, now: DateTime<Utc>) -> bool {
    is_approaching_cap(entry, now, CAP_REMINDER_OFFSET_MINUTES)
}

pub fn is_over_cap(entry: &TimeEntry, now: DateTime<Utc>) -> bool {
    net_work_seconds(entry, now) >= cap_seconds(entry)
}

/// Settles the work segment and enters a break.
///
/// The caller has already checked that the entry is `WORKING`.
pub fn start_break(entry: &mut TimeEntry, now: DateTime<Utc>) {
    settle(entry, now);
    entry.state = EntryState::OnBreak;
    entry.last_state_change_at = Some(now);
    entry.break_start = Some(now);
    entry.break_end = None;
}

/// Resumes work. Nothing is settled: break time never reaches the
/// accumulator.
pub fn end_break(entry: &mut TimeEntry, now: DateTime<Utc>) {
    entry.state = EntryState::Working;
    entry.last_state_change_at = Some(now);
    entry.break_end = Some(now);
}

/// Closes the entry at `now`.
///
/// A trailing break is excluded because only a `WORKING` segment is
/// settled. The cap flag is evaluated before the entry leaves the working
/// phase so a running segment can still be back-computed.
pub fn clock_out(entry: &mut TimeEntry, now: DateTime<Utc>) {
    if entry.state == EntryState::Working {
        settle(entry, now);
    }
    apply_soft_cap_flag(entry, now);

    if entry.state == EntryState::OnBreak && entry.break_end.is_none() {
        entry.break_end = Some(now);
    }
    entry.state = EntryState::ClockedOut;
    entry.clock_out = Some(now);
    entry.duration_hours = Some(duration_hours(entry));
}

/// Settled net work in hours.
pub fn duration_hours(entry: &TimeEntry) -> f64 {
    entry.work_accum_seconds as f64 / 3600.0
}
