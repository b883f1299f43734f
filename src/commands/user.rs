use crate::db::db::Db;
use crate::db::users::{User, Users};
use crate::libs::clock::SystemClock;
use crate::libs::messages::Message;
use crate::libs::payroll;
use crate::libs::view::View;
use crate::{msg_info, msg_success};
use anyhow::Result;
use chrono::Local;
use clap::{Args, Subcommand};

use super::parse_date;

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// Add or update an employee
    Add {
        id: String,
        #[arg(long)]
        org: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, default_value_t = 0.0)]
        rate: f64,
    },
    /// List employees
    List {
        #[arg(long)]
        org: Option<String>,
    },
    /// Set an hourly rate
    Rate { id: String, rate: f64 },
    /// Record that an employee was paid through a date
    Paid {
        id: String,
        #[arg(long, short, default_value = "today")]
        date: String,
    },
}

pub fn cmd(args: UserArgs) -> Result<()> {
    let users = Users::new(Db::new()?);

    match args.command {
        UserCommand::Add {
            id,
            org,
            name,
            email,
            rate,
        } => {
            let mut user = User::new(&id, &org, &name, rate);
            user.email = email;
            users.save(&user)?;
            msg_success!(Message::UserAdded(id));
        }
        UserCommand::List { org } => {
            let list = users.list(org.as_deref())?;
            if list.is_empty() {
                msg_info!(Message::NoUsersFound(org.unwrap_or_default()));
            } else {
                View::users(&list).printstd();
            }
        }
        UserCommand::Rate { id, rate } => {
            users.set_rate(&id, rate)?;
            msg_success!(Message::UserRateUpdated(id, rate));
        }
        UserCommand::Paid { id, date } => {
            let date = parse_date(&date, &SystemClock, &Local)?;
            let user = payroll::mark_paid(&users, &id, date)?;
            msg_success!(Message::UserMarkedPaid(user.name, date.to_string()));
        }
    }
    Ok(())
}
