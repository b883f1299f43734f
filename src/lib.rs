//! # shopclock
//!
//! Shop-floor time clock: clock in and out, breaks, a soft cap on net work
//! per entry, forgot-clock-out corrections and pay-period earnings with
//! overtime.
//!
//! ## Features
//!
//! - **Time clock**: one open entry per employee, breaks excluded from net
//!   work time
//! - **Soft cap**: entries past the cap (16h by default) are flagged and
//!   their payable time is clamped
//! - **Corrections**: close a forgotten entry at the real end time while
//!   keeping an audit snapshot of what would have been paid
//! - **Payroll**: weekly or bi-weekly pay periods, daily-8 or weekly-40
//!   overtime, organization summaries and end-of-day reports
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shopclock::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
