use super::AppContext;
use crate::libs::messages::Message;
use crate::libs::pay_period::{current_pay_period, previous_pay_period};
use crate::libs::payroll::payroll_summary;
use crate::libs::view::View;
use crate::{msg_info, msg_print};
use anyhow::Result;
use chrono::Local;
use clap::Args;

#[derive(Debug, Args)]
pub struct PayrollArgs {
    /// Organization id.
    #[arg(long)]
    org: String,

    /// Use the previous pay period.
    #[arg(long, short)]
    previous: bool,
}

pub fn cmd(args: PayrollArgs) -> Result<()> {
    let ctx = AppContext::new()?;
    let settings = ctx.config.payroll();
    let users = ctx.users().list(Some(&args.org))?;
    if users.is_empty() {
        msg_info!(Message::NoUsersFound(args.org));
        return Ok(());
    }

    let clock = ctx.time_clock.clock();
    let period = if args.previous {
        previous_pay_period(&settings, clock, &Local)
    } else {
        current_pay_period(&settings, clock, &Local)
    };

    let summary = payroll_summary(&ctx.time_clock, &args.org, &users, &period, &settings, &Local)?;
    msg_print!(Message::PayrollHeader(args.org, period.label), true);
    View::payroll(&summary).printstd();
    Ok(())
}
