//! Application configuration.
//!
//! Stored as pretty-printed JSON in `config.json` inside the data directory
//! (see [`DataStorage`]). A missing file means defaults everywhere, so the
//! tool works before `shopclock init` has ever run.

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::pay_period::{OvertimeType, PayPeriodType, PayrollSettings};
use crate::libs::time_entry::{CAP_REMINDER_OFFSET_MINUTES, DEFAULT_CAP_MINUTES};
use crate::msg_print;
use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "config.json";

const WEEKDAYS: [&str; 7] = ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];

#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: &'static str,
    pub name: String,
}

/// Soft-cap and sweep tuning.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TimeClockConfig {
    /// Net work minutes after which an entry is flagged.
    pub cap_minutes: i64,

    /// Minutes before the cap at which the sweep starts reminding.
    pub reminder_minutes: i64,

    /// Seconds between sweeps in `shopclock sweep --every`.
    pub sweep_interval: u64,

    /// Hours after which an open entry is reported as stale.
    pub stale_after_hours: i64,
}

impl Default for TimeClockConfig {
    fn default() -> Self {
        TimeClockConfig {
            cap_minutes: DEFAULT_CAP_MINUTES,
            reminder_minutes: CAP_REMINDER_OFFSET_MINUTES,
            sweep_interval: 300,
            stale_after_hours: 20,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// User id commands act as when `--user` is omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_clock: Option<TimeClockConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payroll: Option<PayrollSettings>,
}

impl Config {
    pub fn read() -> Result<Config> {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&path)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let config_str = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&config_str)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(&file, &self)?;
        Ok(())
    }

    pub fn time_clock(&self) -> TimeClockConfig {
        self.time_clock.clone().unwrap_or_default()
    }

    pub fn payroll(&self) -> PayrollSettings {
        self.payroll.clone().unwrap_or_default()
    }

    /// Interactive setup wizard. Existing values become the prompt defaults.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = [
            ConfigModule {
                key: "user",
                name: Message::ConfigModuleUser.to_string(),
            },
            ConfigModule {
                key: "time_clock",
                name: Message::ConfigModuleTimeClock.to_string(),
            },
            ConfigModule {
                key: "payroll",
                name: Message::ConfigModulePayroll.to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key {
                "user" => {
                    msg_print!(Message::ConfigModuleUser);
                    let user: String = Input::with_theme(&ColorfulTheme::default())
                        .with_prompt(Message::PromptDefaultUser.to_string())
                        .default(config.user.clone().unwrap_or_default())
                        .allow_empty(true)
                        .interact_text()?;
                    config.user = Some(user.trim().to_string()).filter(|u| !u.is_empty());
                }
                "time_clock" => {
                    msg_print!(Message::ConfigModuleTimeClock);
                    config.time_clock = Some(Self::prompt_time_clock(&config.time_clock())?);
                }
                "payroll" => {
                    msg_print!(Message::ConfigModulePayroll);
                    config.payroll = Some(Self::prompt_payroll(&config.payroll())?);
                }
                _ => {}
            }
        }

        Ok(config)
    }

    fn prompt_time_clock(default: &TimeClockConfig) -> Result<TimeClockConfig> {
        Ok(TimeClockConfig {
            cap_minutes: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptCapMinutes.to_string())
                .default(default.cap_minutes)
                .interact_text()?,
            reminder_minutes: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptReminderMinutes.to_string())
                .default(default.reminder_minutes)
                .interact_text()?,
            sweep_interval: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSweepInterval.to_string())
                .default(default.sweep_interval)
                .interact_text()?,
            stale_after_hours: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptStaleAfterHours.to_string())
                .default(default.stale_after_hours)
                .interact_text()?,
        })
    }

    fn prompt_payroll(default: &PayrollSettings) -> Result<PayrollSettings> {
        let period_types = ["weekly", "biweekly"];
        let period_type = match Select::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptPayPeriodType.to_string())
            .items(&period_types)
            .default(usize::from(default.period_type == PayPeriodType::Biweekly))
            .interact()?
        {
            1 => PayPeriodType::Biweekly,
            _ => PayPeriodType::Weekly,
        };

        let current_day = default.pay_weekday().num_days_from_monday() as usize;
        let pay_day = WEEKDAYS[Select::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptPayDay.to_string())
            .items(&WEEKDAYS)
            .default(current_day)
            .interact()?]
        .to_string();

        let anchor_date = if period_type == PayPeriodType::Biweekly {
            let anchor: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptAnchorDate.to_string())
                .default(default.anchor_date.map(|d| d.to_string()).unwrap_or_default())
                .allow_empty(true)
                .validate_with(|input: &String| -> Result<(), String> {
                    if input.trim().is_empty() || NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").is_ok() {
                        Ok(())
                    } else {
                        Err(Message::InvalidDate(input.clone()).to_string())
                    }
                })
                .interact_text()?;
            NaiveDate::parse_from_str(anchor.trim(), "%Y-%m-%d").ok()
        } else {
            None
        };

        let overtime_enabled = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptOvertimeEnabled.to_string())
            .default(default.overtime_enabled)
            .interact()?;

        let (overtime_type, overtime_rate) = if overtime_enabled {
            let rules = ["weekly40", "daily8"];
            let overtime_type = match Select::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptOvertimeType.to_string())
                .items(&rules)
                .default(usize::from(default.overtime_type == Some(OvertimeType::Daily8)))
                .interact()?
            {
                1 => OvertimeType::Daily8,
                _ => OvertimeType::Weekly40,
            };
            let rate: f64 = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptOvertimeRate.to_string())
                .default(default.overtime_multiplier())
                .interact_text()?;
            (Some(overtime_type), Some(rate))
        } else {
            (default.overtime_type, default.overtime_rate)
        };

        Ok(PayrollSettings {
            period_type,
            pay_day: Some(pay_day),
            anchor_date,
            overtime_enabled,
            overtime_type,
            overtime_rate,
        })
    }
}
