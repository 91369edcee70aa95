//! Configuration management for backup hooks
//!
//! Configuration is read from a TOML file (by default `backup-hooks.toml`).
//! A missing or broken file never stops a backup from completing: it is
//! reported as a warning and an empty configuration is used instead, which
//! simply means no post-backup script runs.
//!
//! # File Format
//!
//! ```toml
//! [backup]
//! post_backup_script = "/usr/local/bin/notify-backup"
//! base_dir = "/var/lib/go-server/artifacts/serverBackups"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Backup settings
    #[serde(default)]
    pub backup: BackupConfig,
}

/// The `[backup]` table
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct BackupConfig {
    /// Executable run after every backup, successful or not
    ///
    /// Invoked without arguments. Outcome metadata is passed through
    /// `GOCD_BACKUP_*` environment variables.
    pub post_backup_script: Option<String>,

    /// Root directory under which backups are written
    #[serde(default)]
    pub base_dir: String,
}

impl BackupConfig {
    /// Returns the configured script, or `None` when it is unset or blank
    pub fn post_backup_script(&self) -> Option<&str> {
        self.post_backup_script
            .as_deref()
            .map(str::trim)
            .filter(|script| !script.is_empty())
    }
}

impl Config {
    /// Parses configuration from TOML text
    ///
    /// Unlike [`Config::load_from_file`], parse errors are returned to the
    /// caller.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse backup hook configuration")
    }

    /// Loads configuration from a specific file path
    ///
    /// # Returns
    ///
    /// * `Ok(config)` - Configuration loaded from the file
    /// * `Ok(default)` - File missing, unreadable or unparsable (with warning
    ///   for the latter two)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use backup_hooks::config::Config;
    /// use std::path::Path;
    ///
    /// let config = Config::load_from_file(Path::new("backup-hooks.toml"))
    ///     .expect("Failed to load config");
    /// if let Some(script) = config.backup.post_backup_script() {
    ///     println!("Will run: {}", script);
    /// }
    /// ```
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return Ok(Config::default());
            }
        };

        match Self::from_toml_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Failed to parse {}: {:#}", path.display(), e);
                Ok(Config::default())
            }
        }
    }
}
