use super::*;
use std::sync::{Arc, Mutex};

/// What a [`MockCommandRunner`] reports for every invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOutcome {
    /// Exit status 0 with the given standard output
    Success { stdout: String },
    /// Non-zero exit with the given code and standard error
    Exit { code: i32, stderr: String },
    /// Terminated without an exit code
    Signal,
    /// The executable could not be started
    SpawnError(io::ErrorKind),
}

/// Mock implementation of CommandRunner for testing
///
/// Every invocation is recorded; none are executed.
#[derive(Debug, Clone)]
pub struct MockCommandRunner {
    outcome: MockOutcome,
    invocations: Arc<Mutex<Vec<CommandLine>>>,
}

impl Default for MockCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCommandRunner {
    /// Create a runner whose commands all succeed silently
    pub fn new() -> Self {
        Self::with_outcome(MockOutcome::Success {
            stdout: String::new(),
        })
    }

    pub fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_with_exit(code: i32, stderr: &str) -> Self {
        Self::with_outcome(MockOutcome::Exit {
            code,
            stderr: stderr.to_string(),
        })
    }

    pub fn failing_to_spawn(kind: io::ErrorKind) -> Self {
        Self::with_outcome(MockOutcome::SpawnError(kind))
    }

    /// All command lines run so far, oldest first
    pub fn invocations(&self) -> Vec<CommandLine> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn last_invocation(&self) -> Option<CommandLine> {
        self.invocations.lock().unwrap().last().cloned()
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(
        &self,
        command: &CommandLine,
        label: &str,
    ) -> Result<ProcessOutput, ScriptExecutionFailure> {
        self.invocations.lock().unwrap().push(command.clone());

        let executable = command.executable().to_string();
        match &self.outcome {
            MockOutcome::Success { stdout } => Ok(ProcessOutput {
                exit_code: Some(0),
                stdout: stdout.clone(),
                stderr: String::new(),
            }),
            MockOutcome::Exit { code, stderr } => Err(ScriptExecutionFailure::NonZeroExit {
                label: label.to_string(),
                command: executable,
                invocation: command.describe(),
                exit_code: Some(*code),
                stdout: String::new(),
                stderr: stderr.clone(),
            }),
            MockOutcome::Signal => Err(ScriptExecutionFailure::NonZeroExit {
                label: label.to_string(),
                command: executable,
                invocation: command.describe(),
                exit_code: None,
                stdout: String::new(),
                stderr: String::new(),
            }),
            MockOutcome::SpawnError(kind) => Err(ScriptExecutionFailure::Spawn {
                label: label.to_string(),
                command: executable,
                invocation: command.describe(),
                source: io::Error::new(*kind, "mock spawn failure"),
            }),
        }
    }
}
