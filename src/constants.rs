//! Constants used throughout the application
//!
//! Environment variable names and values are a stable contract with
//! operator-written scripts. Renaming any of them breaks existing hooks.
//!
//! # Organization
//!
//! - **Environment Keys**: Variables exported to the post-backup script
//! - **Environment Values**: Fixed values for status and initiation source
//! - **Process**: Labels and encodings used when invoking the script
//! - **Configuration**: File names and defaults
//! - **Output**: Timestamp and CLI formatting
//!
//! # Usage
//!
//! ```rust
//! use backup_hooks::constants::{ENV_BACKUP_STATUS, STATUS_SUCCESS};
//!
//! println!("{}={}", ENV_BACKUP_STATUS, STATUS_SUCCESS);
//! ```

// Environment Keys
pub const ENV_BACKUP_STATUS: &str = "GOCD_BACKUP_STATUS";
pub const ENV_BACKUP_BASE_DIR: &str = "GOCD_BACKUP_BASE_DIR";
pub const ENV_BACKUP_PATH: &str = "GOCD_BACKUP_PATH";
pub const ENV_BACKUP_TIMESTAMP: &str = "GOCD_BACKUP_TIMESTAMP";
pub const ENV_BACKUP_INITIATED_VIA: &str = "GOCD_BACKUP_INITIATED_VIA";
pub const ENV_BACKUP_INITIATED_BY_USER: &str = "GOCD_BACKUP_INITIATED_BY_USER";

// Environment Values
pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILURE: &str = "failure";
pub const INITIATED_VIA_TIMER: &str = "TIMER";

// Process
pub const POST_BACKUP_SCRIPT_LABEL: &str = "Post Backup Script";
pub const ENCODING_UTF8: &str = "UTF-8";

// Configuration
pub const CONFIG_FILE_NAME: &str = "backup-hooks.toml";

// Output
pub const SYNTHETIC_BACKUP_DIR_PREFIX: &str = "backup_";
pub const BACKUP_DIR_TIME_FORMAT: &str = "%Y%m%d-%H%M%S";

// Exit codes for the bhook binary
pub const EXIT_HOOK_FAILED: i32 = 1;
pub const EXIT_NOT_CONFIGURED: i32 = 2;
