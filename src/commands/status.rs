use super::AppContext;
use crate::libs::clock::Clock;
use crate::libs::formatter::{format_seconds, format_time};
use crate::libs::messages::Message;
use crate::libs::soft_cap;
use crate::libs::time_entry::EntryState;
use crate::libs::view::View;
use crate::{msg_info, msg_print, msg_warning};
use anyhow::Result;

pub fn cmd(user: Option<String>) -> Result<()> {
    let ctx = AppContext::new()?;
    let user = ctx.user(user)?;

    let Some(status) = ctx.time_clock.current_status(&user)? else {
        msg_info!(Message::StatusNotClockedIn);
        return Ok(());
    };
    let now = ctx.time_clock.clock().now();

    let entry = &status.entry;
    let net = format_seconds(status.net_seconds);
    match entry.state {
        EntryState::OnBreak => {
            let since = entry.break_start.unwrap_or(entry.clock_in);
            msg_print!(Message::StatusOnBreak(format_time(&since), net));
        }
        _ => msg_print!(Message::StatusWorking(format_time(&entry.clock_in), net)),
    }
    View::status(&status).printstd();

    if status.over_cap {
        // The sweep may not have flagged it yet.
        let crossed = entry.over_cap_at.or_else(|| soft_cap::compute_over_cap_at(entry)).unwrap_or(now);
        msg_warning!(Message::StatusOverCap(format_time(&crossed)));
    } else if status.approaching_cap {
        msg_warning!(Message::StatusApproachingCap(format_seconds(status.remaining_seconds)));
    }
    if status.stale {
        msg_warning!(Message::StaleEntryWarning((now - entry.clock_in).num_hours()));
    }
    Ok(())
}
