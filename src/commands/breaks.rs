use super::AppContext;
use crate::libs::formatter::format_time;
use crate::libs::messages::Message;
use crate::msg_success;
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct BreakArgs {
    #[command(subcommand)]
    command: BreakCommand,
}

#[derive(Debug, Subcommand)]
enum BreakCommand {
    /// Start a break
    Start,
    /// End the current break
    End,
}

pub fn cmd(user: Option<String>, args: BreakArgs) -> Result<()> {
    let ctx = AppContext::new()?;
    let user = ctx.user(user)?;

    match args.command {
        BreakCommand::Start => {
            let entry = ctx.time_clock.start_break(&user)?;
            let at = entry.break_start.unwrap_or(entry.clock_in);
            msg_success!(Message::BreakStarted(format_time(&at)));
        }
        BreakCommand::End => {
            let entry = ctx.time_clock.end_break(&user)?;
            let at = entry.break_end.unwrap_or(entry.clock_in);
            msg_success!(Message::BreakEnded(format_time(&at)));
        }
    }
    Ok(())
}
