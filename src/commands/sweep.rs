use super::AppContext;
use crate::libs::sweeper;
use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct SweepArgs {
    /// Keep sweeping every N seconds until interrupted. Without a value the
    /// configured interval is used.
    #[arg(long, num_args = 0..=1, default_missing_value = "0")]
    every: Option<u64>,
}

pub async fn cmd(args: SweepArgs) -> Result<()> {
    let ctx = AppContext::new()?;

    match args.every {
        None => {
            sweeper::sweep_once(&ctx.time_clock)?;
            Ok(())
        }
        Some(seconds) => {
            let seconds = if seconds == 0 { ctx.config.time_clock().sweep_interval } else { seconds };
            let every = Duration::from_secs(seconds.max(1));
            sweeper::run_with_signal_handling(Arc::new(ctx.time_clock), every).await
        }
    }
}
