//! Location of shopclock's data files.
//!
//! Files live in the platform's per-user data directory:
//!
//! - Windows: `%LOCALAPPDATA%\shopclock`
//! - macOS: `~/Library/Application Support/shopclock`
//! - elsewhere: `~/.local/share/shopclock`
//!
//! `SHOPCLOCK_HOME` overrides the directory entirely.

use anyhow::Result;
use std::env::consts::OS;
use std::env::var;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "shopclock";
pub const HOME_ENV: &str = "SHOPCLOCK_HOME";

#[derive(Clone, Debug)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl DataStorage {
    pub fn new() -> Self {
        if let Ok(home) = var(HOME_ENV) {
            return Self::at(home);
        }
        let base_path = match OS {
            "windows" => var("LOCALAPPDATA").unwrap_or_else(|_| ".".into()),
            "macos" => var("HOME").unwrap_or_else(|_| ".".into()) + "/Library/Application Support",
            _ => var("HOME").unwrap_or_else(|_| ".".into()) + "/.local/share",
        };
        Self::at(Path::new(&base_path).join(APP_NAME))
    }

    /// Storage rooted at an explicit directory.
    pub fn at(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of `file_name`, creating the directory on first use.
    pub fn get_path(&self, file_name: &str) -> Result<PathBuf> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(self.base_path.join(file_name))
    }
}

impl Default for DataStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_path_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DataStorage::at(dir.path().join("nested").join("data"));
        let path = storage.get_path("shopclock.db").unwrap();
        assert!(storage.base_path().exists());
        assert_eq!(path.file_name().unwrap(), "shopclock.db");
    }
}
