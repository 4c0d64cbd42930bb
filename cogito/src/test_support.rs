//! Test-only helpers for building roadmaps and scripting command runs.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Result, anyhow};

use crate::core::types::{Step, StepDraft, StepId, StepStatus};
use crate::io::shell::{CommandReport, CommandRunner, ShellRequest};
use crate::io::workdir::WorkingDirectory;
use crate::session::Session;

/// One draft per command, titled after its position.
pub fn drafts(cmds: &[&str]) -> Vec<StepDraft> {
    cmds.iter()
        .enumerate()
        .map(|(idx, cmd)| StepDraft {
            title: format!("step {}", idx + 1),
            cmd: cmd.to_string(),
            desc: format!("runs `{cmd}`"),
        })
        .collect()
}

/// A step with explicit status (useful for roadmap selection tests).
pub fn step_with_status(id: StepId, cmd: &str, status: StepStatus) -> Step {
    Step {
        id,
        title: format!("step {id}"),
        cmd: cmd.to_string(),
        desc: String::new(),
        status,
    }
}

/// A ready session rooted at `workdir` with one step per command.
pub fn session_with_plan(workdir: impl AsRef<Path>, cmds: &[&str]) -> Session {
    let mut session = Session::new(WorkingDirectory::new(workdir.as_ref()));
    session.apply_plan(drafts(cmds));
    session
}

/// Scripted command result: a report, or a launch failure message.
#[derive(Debug, Clone)]
pub enum ScriptedRun {
    Report(CommandReport),
    LaunchError(String),
}

/// Runner that replays scripted results in order and records every request.
///
/// Running out of scripted results is a launch error.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    script: Mutex<VecDeque<ScriptedRun>>,
    requests: Mutex<Vec<ShellRequest>>,
}

impl ScriptedRunner {
    pub fn new(script: Vec<ScriptedRun>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request succeeds with `stdout`.
    pub fn always_ok(count: usize, stdout: &str) -> Self {
        Self::new(
            (0..count)
                .map(|_| ScriptedRun::Report(CommandReport::succeeded(stdout)))
                .collect(),
        )
    }

    pub fn requests(&self) -> Vec<ShellRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, request: &ShellRequest) -> Result<CommandReport> {
        self.requests
            .lock()
            .map_err(|_| anyhow!("requests lock poisoned"))?
            .push(request.clone());
        let next = self
            .script
            .lock()
            .map_err(|_| anyhow!("script lock poisoned"))?
            .pop_front();
        match next {
            Some(ScriptedRun::Report(report)) => Ok(report),
            Some(ScriptedRun::LaunchError(msg)) => Err(anyhow!(msg)),
            None => Err(anyhow!("scripted runner exhausted")),
        }
    }
}
