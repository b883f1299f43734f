use crate::libs::config::{Config, CONFIG_FILE_NAME};
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_success;
use anyhow::Result;
use clap::Args;
use std::fs;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Remove the configuration file instead of editing it.
    #[arg(short, long)]
    delete: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.delete {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        msg_success!(Message::ConfigDeleted);
        return Ok(());
    }

    Config::init()?.save()?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}
