use super::AppContext;
use crate::libs::messages::Message;
use crate::libs::pay_period::{current_pay_period, previous_pay_period};
use crate::libs::view::View;
use crate::msg_print;
use anyhow::Result;
use chrono::Local;
use clap::Args;

#[derive(Debug, Args)]
pub struct EarningsArgs {
    /// Use the previous pay period.
    #[arg(long, short)]
    previous: bool,
}

pub fn cmd(user: Option<String>, args: EarningsArgs) -> Result<()> {
    let ctx = AppContext::new()?;
    let user = ctx.user(user)?;
    let settings = ctx.config.payroll();

    let clock = ctx.time_clock.clock();
    let period = if args.previous {
        previous_pay_period(&settings, clock, &Local)
    } else {
        current_pay_period(&settings, clock, &Local)
    };

    let earnings = ctx.time_clock.earnings_for_period(&user, &period, &settings, &Local)?;
    msg_print!(Message::EarningsHeader(user.name.clone(), period.label.clone()), true);
    View::earnings(&earnings).printstd();
    Ok(())
}
