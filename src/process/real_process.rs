use super::*;
use std::process::{Command, Stdio};
use tracing::debug;

/// Implementation of CommandRunner that spawns real OS processes
#[derive(Debug, Default, Clone, Copy)]
pub struct RealCommandRunner;

impl RealCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for RealCommandRunner {
    fn run(
        &self,
        command: &CommandLine,
        label: &str,
    ) -> Result<ProcessOutput, ScriptExecutionFailure> {
        debug!(
            executable = command.executable(),
            encoding = command.encoding().name(),
            env_vars = command.env().len(),
            "running {label}"
        );

        // `output()` waits for exit and owns the child and its pipes, so they
        // are closed on every return path.
        let output = Command::new(command.executable())
            .envs(command.env())
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ScriptExecutionFailure::Spawn {
                label: label.to_string(),
                command: command.executable().to_string(),
                invocation: command.describe(),
                source,
            })?;

        let encoding = command.encoding();
        let stdout = encoding.decode(&output.stdout);
        let stderr = encoding.decode(&output.stderr);
        let exit_code = output.status.code();

        if !output.status.success() {
            return Err(ScriptExecutionFailure::NonZeroExit {
                label: label.to_string(),
                command: command.executable().to_string(),
                invocation: command.describe(),
                exit_code,
                stdout,
                stderr,
            });
        }

        debug!(executable = command.executable(), "{label} finished");
        Ok(ProcessOutput {
            exit_code,
            stdout,
            stderr,
        })
    }
}
