//! Post-backup hook execution
//!
//! After every backup, successful or not, an operator-configured script is
//! run once with the outcome exported through environment variables:
//!
//! | Variable | When | Value |
//! |---|---|---|
//! | `GOCD_BACKUP_STATUS` | always | `success` or `failure` |
//! | `GOCD_BACKUP_BASE_DIR` | success | backup root directory |
//! | `GOCD_BACKUP_PATH` | success | directory of this backup |
//! | `GOCD_BACKUP_TIMESTAMP` | success | completion time, ISO-8601 UTC |
//! | `GOCD_BACKUP_INITIATED_VIA` | scheduled | `TIMER` |
//! | `GOCD_BACKUP_INITIATED_BY_USER` | user initiated | user's display name |
//!
//! # Error Handling
//!
//! A failing script is logged and reported as `false`, never as an error.
//! The backup outcome is already decided when the hook runs, so a broken
//! hook must not fail the flow that triggered it.

use std::collections::BTreeMap;
use tracing::{debug, error, info};

use crate::backup::{BackupCompletion, InitiationSource, ServerBackup, Username};
use crate::config::BackupConfig;
use crate::constants::{
    ENV_BACKUP_BASE_DIR, ENV_BACKUP_INITIATED_BY_USER, ENV_BACKUP_INITIATED_VIA,
    ENV_BACKUP_PATH, ENV_BACKUP_STATUS, ENV_BACKUP_TIMESTAMP, INITIATED_VIA_TIMER,
    POST_BACKUP_SCRIPT_LABEL, STATUS_FAILURE, STATUS_SUCCESS,
};
use crate::process::{
    CommandLine, CommandRunner, Encoding, ProcessOutput, RealCommandRunner,
    ScriptExecutionFailure,
};

/// A single run of the post-backup script for one completed backup
///
/// The script path is expected to be non-empty; use
/// [`run_post_backup_script`] to have that checked against configuration.
#[derive(Debug, Clone)]
pub struct PostBackupScript {
    script: String,
    initiated_by: InitiationSource,
    username: Option<Username>,
    backup: Option<ServerBackup>,
    base_dir: String,
}

impl PostBackupScript {
    /// Creates the hook run for one finished backup
    ///
    /// # Arguments
    ///
    /// * `script` - Executable to invoke, run without arguments
    /// * `initiated_by` - Whether the schedule or a user started the backup
    /// * `username` - Who started it; only reported for user-initiated
    ///   backups, where `None` is reported as `anonymous`
    /// * `backup` - The written backup, or `None` when the backup failed
    /// * `base_dir` - Backup root directory, reported on success
    ///
    /// # Example
    ///
    /// ```
    /// use backup_hooks::backup::{InitiationSource, Username};
    /// use backup_hooks::hooks::PostBackupScript;
    ///
    /// let hook = PostBackupScript::new(
    ///     "/usr/local/bin/notify-backup",
    ///     InitiationSource::UserInitiated,
    ///     Some(Username::new("alice")),
    ///     None,
    ///     "/backups",
    /// );
    ///
    /// let env = hook.environment();
    /// assert_eq!(env["GOCD_BACKUP_STATUS"], "failure");
    /// assert_eq!(env["GOCD_BACKUP_INITIATED_BY_USER"], "alice");
    /// ```
    pub fn new(
        script: impl Into<String>,
        initiated_by: InitiationSource,
        username: Option<Username>,
        backup: Option<ServerBackup>,
        base_dir: impl Into<String>,
    ) -> Self {
        Self {
            script: script.into(),
            initiated_by,
            username,
            backup,
            base_dir: base_dir.into(),
        }
    }

    /// Creates the hook run from a backup completion event
    ///
    /// Equivalent to [`PostBackupScript::new`] with the event's fields.
    ///
    /// # Arguments
    ///
    /// * `script` - Executable to invoke
    /// * `completion` - The event reported by the backup subsystem
    ///
    /// # Example
    ///
    /// ```
    /// use backup_hooks::backup::{BackupCompletion, ServerBackup};
    /// use backup_hooks::hooks::PostBackupScript;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let time = Utc.with_ymd_and_hms(2018, 4, 5, 0, 0, 0).unwrap();
    /// let completion = BackupCompletion::scheduled("/backups")
    ///     .with_backup(ServerBackup::new("/backups/20180405", time));
    ///
    /// let hook = PostBackupScript::from_completion("/opt/hook.sh", &completion);
    /// assert_eq!(hook.environment()["GOCD_BACKUP_TIMESTAMP"], "2018-04-05T00:00:00Z");
    /// ```
    pub fn from_completion(script: impl Into<String>, completion: &BackupCompletion) -> Self {
        Self::new(
            script,
            completion.initiated_by,
            completion.username.clone(),
            completion.backup.clone(),
            completion.base_dir.clone(),
        )
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    /// Runs the script and waits for it to exit
    ///
    /// Returns `true` when it exits with status 0. Any other outcome is
    /// logged at error level and returns `false`. Errors are never
    /// propagated.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use backup_hooks::backup::{InitiationSource, Username};
    /// use backup_hooks::hooks::PostBackupScript;
    ///
    /// let hook = PostBackupScript::new(
    ///     "/usr/local/bin/notify-backup",
    ///     InitiationSource::UserInitiated,
    ///     Some(Username::new("alice")),
    ///     None,
    ///     "/backups",
    /// );
    /// if !hook.execute() {
    ///     eprintln!("post backup script failed, see log");
    /// }
    /// ```
    pub fn execute(&self) -> bool {
        self.execute_with(&RealCommandRunner::new())
    }

    /// Runs the script through `runner` and waits for it to exit
    ///
    /// This is what [`PostBackupScript::execute`] does with a
    /// [`RealCommandRunner`]. Tests pass a mock runner instead.
    ///
    /// # Arguments
    ///
    /// * `runner` - Process runner used to invoke the script
    ///
    /// # Returns
    ///
    /// * `true` - The script exited with status 0
    /// * `false` - The script exited non-zero, was killed, or could not be
    ///   started. One error is logged with the command, its environment and
    ///   any captured output.
    ///
    /// # Example
    ///
    /// ```
    /// use backup_hooks::backup::InitiationSource;
    /// use backup_hooks::hooks::PostBackupScript;
    /// use backup_hooks::process::MockCommandRunner;
    ///
    /// let runner = MockCommandRunner::failing_with_exit(1, "disk full");
    /// let hook = PostBackupScript::new("/opt/hook.sh", InitiationSource::Scheduled, None, None, "/b");
    ///
    /// assert!(!hook.execute_with(&runner));
    /// assert_eq!(runner.invocation_count(), 1);
    /// ```
    pub fn execute_with(&self, runner: &dyn CommandRunner) -> bool {
        match self.try_execute(runner) {
            Ok(_) => true,
            Err(failure) => {
                error!(
                    error = %failure,
                    "Failed to execute post backup script.\n{}",
                    failure.describe()
                );
                false
            }
        }
    }

    fn try_execute(
        &self,
        runner: &dyn CommandRunner,
    ) -> Result<ProcessOutput, ScriptExecutionFailure> {
        runner.run(&self.command_line(), POST_BACKUP_SCRIPT_LABEL)
    }

    /// The command line the script is run with
    pub fn command_line(&self) -> CommandLine {
        CommandLine::new(self.script.as_str())
            .with_encoding(Encoding::Utf8)
            .with_env(self.environment())
    }

    /// Environment exported to the script, derived only from the backup
    /// outcome and how the backup was started
    pub fn environment(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();

        match &self.backup {
            None => {
                env.insert(ENV_BACKUP_STATUS.to_string(), STATUS_FAILURE.to_string());
            }
            Some(backup) => {
                env.insert(ENV_BACKUP_STATUS.to_string(), STATUS_SUCCESS.to_string());
                env.insert(ENV_BACKUP_BASE_DIR.to_string(), self.base_dir.clone());
                env.insert(ENV_BACKUP_PATH.to_string(), backup.path.clone());
                env.insert(ENV_BACKUP_TIMESTAMP.to_string(), backup.iso8601_time());
            }
        }

        match self.initiated_by {
            InitiationSource::Scheduled => {
                env.insert(
                    ENV_BACKUP_INITIATED_VIA.to_string(),
                    INITIATED_VIA_TIMER.to_string(),
                );
            }
            InitiationSource::UserInitiated => {
                let user = self.username.clone().unwrap_or_else(Username::anonymous);
                env.insert(
                    ENV_BACKUP_INITIATED_BY_USER.to_string(),
                    user.display_name().to_string(),
                );
            }
        }

        env
    }
}

/// Runs the configured post-backup script for a finished backup
///
/// Returns `None` without spawning anything when no script is configured,
/// otherwise whether the script succeeded.
///
/// # Example
///
/// ```no_run
/// use backup_hooks::backup::{BackupCompletion, ServerBackup};
/// use backup_hooks::config::Config;
/// use backup_hooks::hooks::run_post_backup_script;
/// use chrono::Utc;
/// use std::path::Path;
///
/// let config = Config::load_from_file(Path::new("backup-hooks.toml")).unwrap();
/// let completion = BackupCompletion::scheduled(config.backup.base_dir.clone())
///     .with_backup(ServerBackup::new("/backups/20180405", Utc::now()));
///
/// run_post_backup_script(&config.backup, &completion);
/// ```
pub fn run_post_backup_script(
    config: &BackupConfig,
    completion: &BackupCompletion,
) -> Option<bool> {
    run_post_backup_script_with(config, completion, &RealCommandRunner::new())
}

/// Same as [`run_post_backup_script`] with an explicit process runner
pub fn run_post_backup_script_with(
    config: &BackupConfig,
    completion: &BackupCompletion,
    runner: &dyn CommandRunner,
) -> Option<bool> {
    let Some(script) = config.post_backup_script() else {
        debug!("No post backup script configured");
        return None;
    };

    let hook = PostBackupScript::from_completion(script, completion);
    let succeeded = hook.execute_with(runner);
    if succeeded {
        info!(
            script,
            initiated_by = %completion.initiated_by,
            backup_succeeded = completion.succeeded(),
            "Post backup script completed"
        );
    }
    Some(succeeded)
}
