//! Command runner abstraction for shell steps.
//!
//! The [`CommandRunner`] trait decouples the session from process spawning.
//! Tests use scripted runners that return predetermined reports without
//! spawning processes.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use crate::io::config::ShellConfig;
use crate::io::process::{ProcessLimits, run_command};

/// Parameters for one shell invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRequest {
    /// Command line passed to the shell verbatim.
    pub command: String,
    /// Working directory captured when the step was dispatched.
    pub workdir: PathBuf,
}

/// Outcome of a command that was launched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandReport {
    /// Set when the command exited non-zero or was killed.
    pub exit_error: Option<String>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandReport {
    pub fn succeeded(stdout: impl Into<String>) -> Self {
        Self {
            exit_error: None,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(exit_error: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_error: Some(exit_error.into()),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_error.is_none()
    }
}

/// Abstraction over command execution backends.
///
/// `Err` means the command could not be launched at all.
pub trait CommandRunner: Send + Sync {
    fn run(&self, request: &ShellRequest) -> Result<CommandReport>;
}

/// Runner that hands the command line to a system shell (`sh -c` by default).
#[derive(Debug, Clone)]
pub struct SystemShell {
    program: String,
    args: Vec<String>,
    limits: ProcessLimits,
}

impl SystemShell {
    pub fn new(shell: &ShellConfig, timeout: Option<Duration>, output_limit_bytes: usize) -> Self {
        Self {
            program: shell.program.clone(),
            args: shell.args.clone(),
            limits: ProcessLimits {
                timeout,
                output_limit_bytes,
            },
        }
    }
}

impl CommandRunner for SystemShell {
    #[instrument(skip_all, fields(program = %self.program, workdir = %request.workdir.display()))]
    fn run(&self, request: &ShellRequest) -> Result<CommandReport> {
        info!(command = %request.command, "running shell step");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(&request.command)
            .current_dir(&request.workdir);

        let output = run_command(cmd, self.limits)
            .with_context(|| format!("run `{}`", request.command))?;

        let exit_error = if output.success() {
            None
        } else if output.timed_out {
            let timeout = self.limits.timeout.unwrap_or_default();
            warn!(timeout_ms = timeout.as_millis() as u64, "shell step timed out");
            Some(format!("timed out after {timeout:?}"))
        } else {
            warn!(exit_code = ?output.status.code(), "shell step failed");
            Some(match output.status.code() {
                Some(code) => format!("exit status {code}"),
                None => "terminated by signal".to_string(),
            })
        };

        debug!(success = exit_error.is_none(), "shell step finished");
        let mut stdout = output.stdout_lossy();
        stdout.push_str(&output.stdout_truncated_notice());
        let mut stderr = output.stderr_lossy();
        stderr.push_str(&output.stderr_truncated_notice());
        Ok(CommandReport {
            exit_error,
            stdout,
            stderr,
        })
    }
}
