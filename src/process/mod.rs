//! Process invocation layer used by hooks
//!
//! A [`CommandLine`] describes what to run. A [`CommandRunner`] runs it to
//! completion, and any non-zero exit or spawn error surfaces as a
//! [`ScriptExecutionFailure`]. The real runner talks to the OS, while the
//! mock runner records invocations so hook behavior can be tested without
//! spawning anything.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io;
use thiserror::Error;

use crate::constants::ENCODING_UTF8;

pub mod mock_process;
pub mod real_process;

pub use mock_process::{MockCommandRunner, MockOutcome};
pub use real_process::RealCommandRunner;

/// Text encoding used to decode a command's captured output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
}

impl Encoding {
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Utf8 => ENCODING_UTF8,
        }
    }

    /// Decodes captured bytes, replacing invalid sequences
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

/// An executable plus the environment it should run with
///
/// Environment entries are added on top of the inherited environment of the
/// current process; they never clear it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    executable: String,
    env: BTreeMap<String, String>,
    encoding: Encoding,
}

impl CommandLine {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            env: BTreeMap::new(),
            encoding: Encoding::default(),
        }
    }

    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env.extend(env);
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Renders the executable and its extra environment for diagnostics
    pub fn describe(&self) -> String {
        let mut out = format!("--- Command ---\n{}\n", self.executable);
        if !self.env.is_empty() {
            out.push_str("--- Environment ---\n");
            for (key, value) in &self.env {
                let _ = writeln!(out, "{key}={value}");
            }
        }
        out
    }
}

/// Captured result of a command that exited successfully
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Failure to run a hook script to a successful exit
#[derive(Debug, Error)]
pub enum ScriptExecutionFailure {
    /// The process could not be started (missing executable, permissions, I/O)
    #[error("{label}: failed to start '{command}': {source}")]
    Spawn {
        label: String,
        command: String,
        /// [`CommandLine::describe`] of the attempted invocation
        invocation: String,
        #[source]
        source: io::Error,
    },

    /// The process ran but did not exit with status 0
    #[error("{label}: '{command}' {}", exit_summary(.exit_code))]
    NonZeroExit {
        label: String,
        command: String,
        invocation: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

fn exit_summary(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exited with code {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

impl ScriptExecutionFailure {
    pub fn label(&self) -> &str {
        match self {
            ScriptExecutionFailure::Spawn { label, .. }
            | ScriptExecutionFailure::NonZeroExit { label, .. } => label,
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ScriptExecutionFailure::Spawn { .. } => None,
            ScriptExecutionFailure::NonZeroExit { exit_code, .. } => *exit_code,
        }
    }

    /// Human-readable account of the failed invocation, including any
    /// output the process produced
    pub fn describe(&self) -> String {
        match self {
            ScriptExecutionFailure::Spawn {
                label,
                invocation,
                source,
                ..
            } => format!("{label} could not be started\n{invocation}--- Error ---\n{source}\n"),
            ScriptExecutionFailure::NonZeroExit {
                label,
                invocation,
                exit_code,
                stdout,
                stderr,
                ..
            } => {
                let mut out = format!("{label} {}\n{invocation}", exit_summary(exit_code));
                if !stdout.is_empty() {
                    let _ = write!(out, "--- Standard output ---\n{}\n", stdout.trim_end());
                }
                if !stderr.is_empty() {
                    let _ = write!(out, "--- Standard error ---\n{}\n", stderr.trim_end());
                }
                out
            }
        }
    }
}

/// Runs a [`CommandLine`] to completion
///
/// Implementations block until the process exits and must release every
/// process handle and pipe before returning, on success and failure alike.
pub trait CommandRunner: Send + Sync {
    /// Runs the command and fails unless it exits with status 0
    ///
    /// `label` names the invocation in diagnostics, e.g. "Post Backup Script".
    fn run(
        &self,
        command: &CommandLine,
        label: &str,
    ) -> Result<ProcessOutput, ScriptExecutionFailure>;
}
