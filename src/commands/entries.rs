use super::AppContext;
use crate::libs::clock::Clock;
use crate::libs::messages::Message;
use crate::libs::pay_period::group_entries_by_day;
use crate::libs::view::View;
use crate::{msg_info, msg_print};
use anyhow::Result;
use chrono::Local;
use clap::Args;

#[derive(Debug, Args)]
pub struct EntriesArgs {
    #[arg(long, short, default_value_t = 10)]
    limit: usize,
}

pub fn cmd(user: Option<String>, args: EntriesArgs) -> Result<()> {
    let ctx = AppContext::new()?;
    let user = ctx.user(user)?;
    let entries = ctx.time_clock.recent_entries(&user, args.limit)?;

    if entries.is_empty() {
        msg_info!(Message::NoEntriesFound);
        return Ok(());
    }
    msg_print!(Message::EntriesHeader(user.name.clone()), true);
    View::entries(&entries, ctx.time_clock.clock().now()).printstd();

    let by_day = group_entries_by_day(&entries, &Local);
    msg_print!(Message::DailyTotalsHeader, true);
    View::daily_hours(&by_day).printstd();
    Ok(())
}
