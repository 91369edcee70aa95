//! Backup outcome model consumed by the post-backup hook
//!
//! These values are produced by the backup subsystem when a backup finishes
//! and handed to [`crate::hooks::PostBackupScript`]. They are built fresh for
//! every completion event and never mutated afterwards.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// How the backup that just finished was started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitiationSource {
    /// Started by the backup schedule
    Scheduled,
    /// Started explicitly by a user
    UserInitiated,
}

impl fmt::Display for InitiationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitiationSource::Scheduled => write!(f, "scheduled"),
            InitiationSource::UserInitiated => write!(f, "user"),
        }
    }
}

/// Display name of the user who triggered a backup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Name reported when a user-initiated backup carries no identity
    pub const ANONYMOUS: &'static str = "anonymous";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn anonymous() -> Self {
        Self(Self::ANONYMOUS.to_string())
    }

    pub fn display_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A successfully written backup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerBackup {
    /// Directory the backup was written to
    pub path: String,
    /// When the backup completed
    pub time: DateTime<Utc>,
}

impl ServerBackup {
    pub fn new(path: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            time,
        }
    }

    /// Completion time as ISO-8601 in UTC with second precision,
    /// e.g. `2018-04-05T12:34:56Z`
    pub fn iso8601_time(&self) -> String {
        self.time.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Everything the backup subsystem knows once a backup has finished
///
/// `backup` is `None` when the backup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupCompletion {
    pub initiated_by: InitiationSource,
    pub username: Option<Username>,
    pub backup: Option<ServerBackup>,
    pub base_dir: String,
}

impl BackupCompletion {
    /// A completion event for a backup started by the schedule
    pub fn scheduled(base_dir: impl Into<String>) -> Self {
        Self {
            initiated_by: InitiationSource::Scheduled,
            username: None,
            backup: None,
            base_dir: base_dir.into(),
        }
    }

    /// A completion event for a backup started by `username`
    pub fn by_user(username: Username, base_dir: impl Into<String>) -> Self {
        Self {
            initiated_by: InitiationSource::UserInitiated,
            username: Some(username),
            backup: None,
            base_dir: base_dir.into(),
        }
    }

    /// Marks the backup as successful
    pub fn with_backup(mut self, backup: ServerBackup) -> Self {
        self.backup = Some(backup);
        self
    }

    pub fn succeeded(&self) -> bool {
        self.backup.is_some()
    }
}
