//! Backup Hooks - Post-backup script runner
//!
//! Runs an operator-configured script once a backup has finished, passing
//! the outcome of the backup through `GOCD_BACKUP_*` environment variables.
//!
//! # Architecture
//!
//! - [`backup`] - Backup outcome model handed over by the backup subsystem
//! - [`config`] - Configuration file management
//! - [`constants`] - Environment variable names and fixed values
//! - [`hooks`] - Post-backup script construction and execution
//! - [`logging`] - Subscriber setup for the `bhook` binary
//! - [`process`] - Process invocation with real and mock runners
//!
//! # Usage Example
//!
//! ```no_run
//! use backup_hooks::backup::{InitiationSource, ServerBackup};
//! use backup_hooks::hooks::PostBackupScript;
//! use chrono::Utc;
//!
//! let hook = PostBackupScript::new(
//!     "/usr/local/bin/notify-backup",
//!     InitiationSource::Scheduled,
//!     None,
//!     Some(ServerBackup::new("/backups/20180405", Utc::now())),
//!     "/backups",
//! );
//!
//! if !hook.execute() {
//!     eprintln!("post backup script failed, see log");
//! }
//! ```

pub mod backup;
pub mod config;
pub mod constants;
pub mod hooks;
pub mod logging;
pub mod process;
