use super::AppContext;
use crate::libs::formatter::format_seconds;
use crate::libs::messages::Message;
use crate::libs::soft_cap;
use crate::libs::time_entry::FlagStatus;
use crate::{msg_success, msg_warning};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ClockOutArgs {
    /// What was done during the shift.
    #[arg(long, short)]
    notes: Option<String>,
}

pub fn cmd(user: Option<String>, args: ClockOutArgs) -> Result<()> {
    let ctx = AppContext::new()?;
    let user = ctx.user(user)?;
    let entry = ctx.time_clock.clock_out(&user, args.notes.as_deref())?;

    let now = entry.clock_out.unwrap_or(entry.clock_in);
    let net = format_seconds(soft_cap::net_work_seconds(&entry, now));
    if entry.flag_status == FlagStatus::OverCap {
        let payable = format_seconds(soft_cap::effective_net_work_seconds(&entry, now));
        msg_warning!(Message::ClockedOutOverCap(net, payable));
    } else {
        msg_success!(Message::ClockedOut(net));
    }
    Ok(())
}
