pub mod clock;
pub mod config;
pub mod correction;
pub mod data_storage;
pub mod error;
pub mod formatter;
pub mod messages;
pub mod pay_period;
pub mod payroll;
pub mod report;
pub mod soft_cap;
pub mod sweeper;
pub mod time_clock;
pub mod time_entry;
pub mod view;
