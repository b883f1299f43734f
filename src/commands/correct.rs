use super::{parse_local_datetime, AppContext};
use crate::libs::formatter::format_seconds;
use crate::libs::messages::Message;
use crate::{msg_info, msg_success};
use anyhow::Result;
use chrono::Local;
use clap::Args;

#[derive(Debug, Args)]
pub struct CorrectArgs {
    /// When you actually stopped working, local time (YYYY-MM-DD HH:MM).
    #[arg(long, short)]
    end: String,

    /// Why the entry is being corrected.
    #[arg(long, short)]
    note: String,
}

pub fn cmd(user: Option<String>, args: CorrectArgs) -> Result<()> {
    let ctx = AppContext::new()?;
    let user = ctx.user(user)?;
    let corrected_end = parse_local_datetime(&args.end, &Local)?;

    let entry = ctx.time_clock.correct_forgot_clock_out(&user, corrected_end, args.note.trim())?;

    let wrong = format_seconds(entry.wrong_recorded_net_seconds.unwrap_or_default());
    msg_success!(Message::CorrectionApplied(wrong, format_seconds(entry.work_accum_seconds)));
    if entry.wrong_exceeded_cap() {
        msg_info!(Message::CorrectionWrongExceededCap);
    }
    Ok(())
}
