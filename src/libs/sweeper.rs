//! Periodic soft-cap sweep.
//!
//! Runs [`TimeClock::evaluate_soft_cap_for_open_entries`] on a tokio
//! interval until SIGINT/SIGTERM (Ctrl+C on Windows). A failed sweep is
//! logged and retried on the next tick.

use crate::db::time_entries::EntryStore;
use crate::libs::clock::Clock;
use crate::libs::messages::Message;
use crate::libs::time_clock::{SweepReport, TimeClock};
use crate::{msg_error, msg_info, msg_warning};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// One sweep with its outcome reported to the user.
pub fn sweep_once<S: EntryStore, C: Clock>(time_clock: &TimeClock<S, C>) -> Result<SweepReport> {
    let report = time_clock.evaluate_soft_cap_for_open_entries()?;
    msg_info!(Message::SweepCompleted {
        processed: report.processed,
        flagged: report.flagged,
        approaching: report.approaching,
    });
    Ok(report)
}

fn spawn_signal_listener(shutdown_tx: oneshot::Sender<()>) {
    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    msg_error!(Message::SweepSignalListenFailed(e.to_string()));
                    return;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => msg_info!(Message::SweepReceivedSigterm),
                _ = sigint.recv() => msg_info!(Message::SweepReceivedSigint),
            }
            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => msg_info!(Message::SweepReceivedCtrlC),
                Err(e) => msg_error!(Message::SweepSignalListenFailed(e.to_string())),
            }
            let _ = shutdown_tx.send(());
        });
    }
}

/// Sweeps every `every` until `shutdown` resolves.
pub async fn run_until<S, C>(time_clock: Arc<TimeClock<S, C>>, every: Duration, shutdown: oneshot::Receiver<()>) -> Result<()>
where
    S: EntryStore + Send + Sync + 'static,
    C: Clock + 'static,
{
    let mut sweeps = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let time_clock = Arc::clone(&time_clock);
            match tokio::task::spawn_blocking(move || sweep_once(&time_clock)).await {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => msg_warning!(Message::SweepFailed(e.to_string())),
                Err(e) => msg_error!(Message::SweepTaskPanicked(e.to_string())),
            }
        }
    });

    tokio::select! {
        result = &mut sweeps => {
            if let Err(e) = result {
                msg_error!(Message::SweepTaskPanicked(e.to_string()));
            }
        }
        _ = shutdown => {
            msg_info!(Message::SweepShuttingDown);
            sweeps.abort();
        }
    }
    Ok(())
}

/// Sweeps every `every` until the process is asked to stop.
pub async fn run_with_signal_handling<S, C>(time_clock: Arc<TimeClock<S, C>>, every: Duration) -> Result<()>
where
    S: EntryStore + Send + Sync + 'static,
    C: Clock + 'static,
{
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    spawn_signal_listener(shutdown_tx);
    msg_info!(Message::SweepStarted(every.as_secs()));
    run_until(time_clock, every, shutdown_rx).await
}
