//! The time-clock state machine.
//!
//! [`TimeClock`] is what request handlers and CLI commands call. Each
//! operation reads the user's open entry, checks the transition is legal,
//! lets [`soft_cap`] do the arithmetic on an owned copy and persists the
//! result through the [`EntryStore`] compare-and-set. A rejected transition
//! never writes anything.

use crate::db::time_entries::EntryStore;
use crate::db::users::User;
use crate::libs::clock::Clock;
use crate::libs::config::TimeClockConfig;
use crate::libs::correction;
use crate::libs::error::{Precondition, StoreError, TimeClockError};
use crate::libs::pay_period::{calculate_earnings, group_hours_by_day, EarningsBreakdown, PayPeriod, PayrollSettings};
use crate::libs::soft_cap;
use crate::libs::time_entry::{EntryState, FlagStatus, NewTimeEntry, TimeEntry};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Outcome of one soft-cap sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub processed: usize,
    pub flagged: usize,
    pub approaching: usize,
}

/// Live view of an open entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryStatus {
    pub entry: TimeEntry,
    pub net_seconds: i64,
    pub effective_seconds: i64,
    /// Net work left before the cap; negative once past it.
    pub remaining_seconds: i64,
    pub approaching_cap: bool,
    pub over_cap: bool,
    pub stale: bool,
}

pub struct TimeClock<S: EntryStore, C: Clock> {
    store: S,
    clock: C,
    config: TimeClockConfig,
}

impl<S: EntryStore, C: Clock> TimeClock<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self::with_config(store, clock, TimeClockConfig::default())
    }

    pub fn with_config(store: S, clock: C, config: TimeClockConfig) -> Self {
        TimeClock { store, clock, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &TimeClockConfig {
        &self.config
    }

    fn authenticated(user: &User) -> Result<(), TimeClockError> {
        if user.id.trim().is_empty() {
            return Err(TimeClockError::NotAuthenticated);
        }
        Ok(())
    }

    fn open_entry(&self, user: &User) -> Result<TimeEntry, TimeClockError> {
        Self::authenticated(user)?;
        self.store
            .find_open_entry_for_user(&user.id)?
            .ok_or_else(|| Precondition::NotClockedIn.into())
    }

    fn persist(&self, entry: &TimeEntry) -> Result<TimeEntry, TimeClockError> {
        match self.store.update_entry(entry) {
            Ok(saved) => Ok(saved),
            Err(StoreError::Conflict) => Err(Precondition::EntryChanged(entry.id).into()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn clock_in(&self, user: &User, job_id: Option<&str>) -> Result<TimeEntry, TimeClockError> {
        Self::authenticated(user)?;
        if self.store.find_open_entry_for_user(&user.id)?.is_some() {
            return Err(Precondition::AlreadyClockedIn.into());
        }

        let new_entry = NewTimeEntry {
            user_id: user.id.clone(),
            organization_id: user.organization_id.clone(),
            job_id: job_id.map(str::to_string),
            clock_in: self.clock.now(),
            cap_minutes: self.config.cap_minutes,
        };
        let entry = match self.store.create_entry(&new_entry) {
            Ok(entry) => entry,
            // Lost a race against another clock-in for the same user.
            Err(StoreError::Conflict) => return Err(Precondition::AlreadyClockedIn.into()),
            Err(e) => return Err(e.into()),
        };

        info!(user_id = %user.id, entry_id = entry.id, job_id = ?entry.job_id, "clocked in");
        Ok(entry)
    }

    pub fn clock_out(&self, user: &User, notes: Option<&str>) -> Result<TimeEntry, TimeClockError> {
        let mut entry = self.open_entry(user)?;
        let now = self.clock.now();

        soft_cap::clock_out(&mut entry, now);
        if let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) {
            entry.notes = Some(notes.to_string());
        }
        let entry = self.persist(&entry)?;

        info!(
            user_id = %user.id,
            entry_id = entry.id,
            net_seconds = entry.work_accum_seconds,
            flag_status = %entry.flag_status,
            "clocked out"
        );
        Ok(entry)
    }

    /// The cap is evaluated before the working segment ends so a crossing
    /// instant inside that segment is recorded exactly.
    pub fn start_break(&self, user: &User) -> Result<TimeEntry, TimeClockError> {
        let mut entry = self.open_entry(user)?;
        if entry.state == EntryState::OnBreak {
            return Err(Precondition::AlreadyOnBreak.into());
        }
        let now = self.clock.now();

        soft_cap::apply_soft_cap_flag(&mut entry, now);
        soft_cap::start_break(&mut entry, now);
        let entry = self.persist(&entry)?;

        info!(user_id = %user.id, entry_id = entry.id, state = %entry.state, "break started");
        Ok(entry)
    }

    pub fn end_break(&self, user: &User) -> Result<TimeEntry, TimeClockError> {
        Self::authenticated(user)?;
        let mut entry = match self.store.find_open_entry_for_user(&user.id)? {
            Some(entry) if entry.state == EntryState::OnBreak => entry,
            _ => return Err(Precondition::NotOnBreak.into()),
        };

        soft_cap::end_break(&mut entry, self.clock.now());
        let entry = self.persist(&entry)?;

        info!(user_id = %user.id, entry_id = entry.id, state = %entry.state, "break ended");
        Ok(entry)
    }

    pub fn correct_forgot_clock_out(&self, user: &User, corrected_end: DateTime<Utc>, note: &str) -> Result<TimeEntry, TimeClockError> {
        let mut entry = self.open_entry(user)?;
        correction::correct_forgot_clock_out(&mut entry, corrected_end, note, self.clock.now())?;
        let entry = self.persist(&entry)?;

        info!(
            user_id = %user.id,
            entry_id = entry.id,
            wrong_seconds = ?entry.wrong_recorded_net_seconds,
            net_seconds = entry.work_accum_seconds,
            flag_status = %entry.flag_status,
            "forgot-clock-out correction applied"
        );
        Ok(entry)
    }

    /// Flags every open entry that has reached its cap and counts the ones
    /// inside the reminder window. Entries already flagged are only counted
    /// as processed; an entry changed concurrently is skipped and picked up
    /// by the next sweep.
    pub fn evaluate_soft_cap_for_open_entries(&self) -> Result<SweepReport, TimeClockError> {
        let now = self.clock.now();
        let mut report = SweepReport::default();

        for mut entry in self.store.find_open_entries()? {
            report.processed += 1;
            if entry.flag_status == FlagStatus::OverCap {
                continue;
            }

            if soft_cap::apply_soft_cap_flag(&mut entry, now) {
                match self.store.update_entry(&entry) {
                    Ok(_) => {
                        report.flagged += 1;
                        warn!(
                            user_id = %entry.user_id,
                            entry_id = entry.id,
                            over_cap_at = ?entry.over_cap_at,
                            flag_status = %entry.flag_status,
                            "entry passed the soft cap"
                        );
                    }
                    Err(StoreError::Conflict) => {
                        debug!(entry_id = entry.id, "entry changed during sweep, skipped");
                    }
                    Err(e) => return Err(e.into()),
                }
            } else if soft_cap::is_approaching_cap(&entry, now, self.config.reminder_minutes) {
                report.approaching += 1;
                info!(
                    user_id = %entry.user_id,
                    entry_id = entry.id,
                    remaining_seconds = soft_cap::cap_seconds(&entry) - soft_cap::net_work_seconds(&entry, now),
                    "entry approaching the soft cap"
                );
            }
        }

        debug!(processed = report.processed, flagged = report.flagged, approaching = report.approaching, "sweep finished");
        Ok(report)
    }

    pub fn current_status(&self, user: &User) -> Result<Option<EntryStatus>, TimeClockError> {
        Self::authenticated(user)?;
        let now = self.clock.now();
        let status = self.store.find_open_entry_for_user(&user.id)?.map(|entry| {
            let net_seconds = soft_cap::net_work_seconds(&entry, now);
            EntryStatus {
                net_seconds,
                effective_seconds: soft_cap::effective_net_work_seconds(&entry, now),
                remaining_seconds: soft_cap::cap_seconds(&entry) - net_seconds,
                approaching_cap: soft_cap::is_approaching_cap(&entry, now, self.config.reminder_minutes),
                over_cap: soft_cap::is_over_cap(&entry, now),
                stale: entry.is_stale(now, Duration::hours(self.config.stale_after_hours)),
                entry,
            }
        });
        Ok(status)
    }

    pub fn recent_entries(&self, user: &User, limit: usize) -> Result<Vec<TimeEntry>, TimeClockError> {
        Self::authenticated(user)?;
        Ok(self.store.recent_entries(&user.id, limit)?)
    }

    pub fn earnings_for_period<Tz: TimeZone>(
        &self,
        user: &User,
        period: &PayPeriod,
        settings: &PayrollSettings,
        tz: &Tz,
    ) -> Result<EarningsBreakdown, TimeClockError> {
        self.earnings_between(user, period.start, period.end, settings, tz)
    }

    /// Earnings from settled entries whose clock-in falls on a local date in
    /// `[start, end]`. Flagged entries count at their capped hours, so days are
    /// bucketed from effective hours rather than the recorded `duration_hours`
    /// that `group_entries_by_day` sums.
    pub fn earnings_between<Tz: TimeZone>(
        &self,
        user: &User,
        start: NaiveDate,
        end: NaiveDate,
        settings: &PayrollSettings,
        tz: &Tz,
    ) -> Result<EarningsBreakdown, TimeClockError> {
        Self::authenticated(user)?;
        if start > end {
            return Ok(EarningsBreakdown::default());
        }

        let window = PayPeriod {
            start,
            end,
            label: String::new(),
        };
        let (from, to) = window.bounds(tz);
        let now = self.clock.now();

        let entries = self.store.find_settled_entries(&user.id, from, to)?;
        let by_day = group_hours_by_day(
            entries
                .iter()
                .map(|entry| (entry.clock_in, soft_cap::effective_net_work_hours(entry, now))),
            tz,
        );
        let total_hours: f64 = by_day.values().sum();

        Ok(calculate_earnings(total_hours, user.hourly_rate, settings, Some(&by_day)))
    }
}
