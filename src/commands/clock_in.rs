use super::AppContext;
use crate::libs::formatter::format_time;
use crate::libs::messages::Message;
use crate::msg_success;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ClockInArgs {
    /// Job the time is worked on.
    #[arg(long, short)]
    job: Option<String>,
}

pub fn cmd(user: Option<String>, args: ClockInArgs) -> Result<()> {
    let ctx = AppContext::new()?;
    let user = ctx.user(user)?;
    let entry = ctx.time_clock.clock_in(&user, args.job.as_deref())?;
    msg_success!(Message::ClockedIn(entry.id, format_time(&entry.clock_in)));
    Ok(())
}
