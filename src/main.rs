//! bhook - fire the post-backup script by hand
//!
//! Loads the backup hook configuration, fabricates a backup outcome from the
//! command-line flags and runs the configured script exactly as the backup
//! subsystem would. Useful for checking a hook before the next real backup.

use anyhow::Result;
use backup_hooks::backup::{BackupCompletion, ServerBackup, Username};
use backup_hooks::config::{BackupConfig, Config};
use backup_hooks::constants::{
    BACKUP_DIR_TIME_FORMAT, CONFIG_FILE_NAME, EXIT_HOOK_FAILED, EXIT_NOT_CONFIGURED,
    SYNTHETIC_BACKUP_DIR_PREFIX,
};
use backup_hooks::hooks::{run_post_backup_script, PostBackupScript};
use backup_hooks::logging;
use chrono::Utc;
use clap::Parser;
use std::path::{Path, PathBuf};

mod utils;

use utils::{print_env, print_error, print_success};

/// Command-line arguments for bhook
#[derive(Parser)]
#[command(name = "bhook")]
#[command(version, about = "Run the post-backup hook script", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Script to run instead of the configured one
    #[arg(short, long)]
    script: Option<String>,

    /// Report the backup as failed
    #[arg(long)]
    failed: bool,

    /// Report the backup as started by this user instead of the timer
    #[arg(short, long)]
    user: Option<String>,

    /// Backup directory to report (defaults to a fresh directory under the base dir)
    #[arg(long)]
    path: Option<String>,

    /// Backup base directory (overrides the configuration)
    #[arg(long)]
    base_dir: Option<String>,

    /// Print the environment the script would receive without running it
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let mut config = Config::load_from_file(&cli.config)?;
    if let Some(script) = &cli.script {
        config.backup.post_backup_script = Some(script.clone());
    }
    if let Some(base_dir) = &cli.base_dir {
        config.backup.base_dir = base_dir.clone();
    }

    let completion = build_completion(&cli, &config.backup);

    if cli.dry_run {
        let Some(script) = config.backup.post_backup_script() else {
            not_configured(&cli.config);
        };
        let hook = PostBackupScript::from_completion(script, &completion);
        println!("{}", hook.script());
        print_env(&hook.environment());
        return Ok(());
    }

    match run_post_backup_script(&config.backup, &completion) {
        None => not_configured(&cli.config),
        Some(true) => {
            print_success("Post backup script completed");
            Ok(())
        }
        Some(false) => {
            print_error("Post backup script failed");
            std::process::exit(EXIT_HOOK_FAILED);
        }
    }
}

/// Builds the backup outcome described by the flags
fn build_completion(cli: &Cli, config: &BackupConfig) -> BackupCompletion {
    let completion = match &cli.user {
        Some(user) => BackupCompletion::by_user(Username::new(user.as_str()), &*config.base_dir),
        None => BackupCompletion::scheduled(&*config.base_dir),
    };

    if cli.failed {
        return completion;
    }

    let now = Utc::now();
    let path = cli.path.clone().unwrap_or_else(|| {
        Path::new(&config.base_dir)
            .join(format!(
                "{}{}",
                SYNTHETIC_BACKUP_DIR_PREFIX,
                now.format(BACKUP_DIR_TIME_FORMAT)
            ))
            .display()
            .to_string()
    });
    completion.with_backup(ServerBackup::new(path, now))
}

fn not_configured(config_path: &Path) -> ! {
    print_error(&format!(
        "No post backup script configured (checked {}, pass --script to override)",
        config_path.display()
    ));
    std::process::exit(EXIT_NOT_CONFIGURED);
}
