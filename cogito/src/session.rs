//! The roadmap execution engine.
//!
//! A [`Session`] owns every piece of mutable state: mode, roadmap and focus,
//! engine status, the auto-run flag, the tracked working directory and the
//! feed. All mutation goes through its methods on one thread.
//!
//! Shell steps are split in two halves so the caller decides how to wait:
//! [`Session::execute_step`] hands back a [`ShellJob`] carrying the working
//! directory captured at dispatch, and the caller feeds the runner's result
//! into [`Session::complete`] exactly once.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::core::dispatch::{Dispatch, classify};
use crate::core::feed::{FEED_VIEW_LINES, Feed};
use crate::core::roadmap::{Roadmap, number_drafts};
use crate::core::transitions::{StatusError, can_begin};
use crate::core::types::{EngineStatus, Mode, Step, StepDraft, StepId, StepStatus};
use crate::io::shell::{CommandReport, ShellRequest};
use crate::io::workdir::WorkingDirectory;

pub const AWAITING_LINE: &str = "[Cogito] Awaiting your thoughts...";
pub const ROADMAP_DRAFTED_LINE: &str =
    "[Cogito] Roadmap drafted. Press \"b\" to switch to Build mode.";

/// A shell step waiting to be run outside the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellJob {
    pub step_id: StepId,
    pub request: ShellRequest,
}

/// Result of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Execution {
    /// Handled in-process (directory change); the step already has its final status.
    Settled(StepStatus),
    /// Must be run and reported back through [`Session::complete`].
    Running(ShellJob),
}

/// Why a dispatch request was refused. No state changes on refusal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecuteError {
    #[error("no step with id {0}")]
    UnknownStep(StepId),
    #[error("roadmap is empty")]
    EmptyRoadmap,
    #[error("engine is {0}")]
    Busy(EngineStatus),
    #[error("step {id} is {status} and cannot run")]
    NotRunnable { id: StepId, status: StepStatus },
}

/// Read-only view for presentation layers.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub status: EngineStatus,
    pub auto_run: bool,
    pub focus: usize,
    pub workdir: PathBuf,
    pub steps: Vec<Step>,
    pub feed: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    status: EngineStatus,
    auto_run: bool,
    roadmap: Roadmap,
    workdir: WorkingDirectory,
    feed: Feed,
}

impl Session {
    pub fn new(workdir: WorkingDirectory) -> Self {
        let mut feed = Feed::new();
        feed.append(AWAITING_LINE);
        Self {
            mode: Mode::Plan,
            status: EngineStatus::Idle,
            auto_run: false,
            roadmap: Roadmap::default(),
            workdir,
            feed,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    pub fn auto_run(&self) -> bool {
        self.auto_run
    }

    pub fn roadmap(&self) -> &Roadmap {
        &self.roadmap
    }

    pub fn focus(&self) -> usize {
        self.roadmap.focus()
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn recent_feed(&self) -> &[String] {
        self.feed.recent(FEED_VIEW_LINES)
    }

    pub fn workdir(&self) -> &Path {
        self.workdir.current()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            status: self.status,
            auto_run: self.auto_run,
            focus: self.roadmap.focus(),
            workdir: self.workdir.current().to_path_buf(),
            steps: self.roadmap.steps().to_vec(),
            feed: self.recent_feed().to_vec(),
        }
    }

    /// Accept a goal for planning.
    ///
    /// Returns the trimmed goal, or `None` when it is blank or the engine is busy.
    /// On acceptance the engine is `thinking` until [`Session::apply_plan`] or
    /// [`Session::abort_plan`].
    pub fn submit_goal(&mut self, goal: &str) -> Option<String> {
        let goal = goal.trim();
        if goal.is_empty() {
            debug!("ignoring blank goal");
            return None;
        }
        if self.status.is_busy() {
            warn!(status = %self.status, "goal submitted while busy");
            return None;
        }
        self.status = EngineStatus::Thinking;
        self.feed
            .append(format!("[Cogito] Received your thought: \"{goal}\""));
        Some(goal.to_string())
    }

    /// Replace the roadmap with freshly planned steps.
    pub fn apply_plan(&mut self, drafts: Vec<StepDraft>) {
        info!(steps = drafts.len(), "roadmap drafted");
        self.roadmap.set_roadmap(number_drafts(drafts));
        self.status = EngineStatus::Ready;
        self.feed.append(ROADMAP_DRAFTED_LINE);
    }

    /// Leave `thinking` after the planner failed.
    pub fn abort_plan(&mut self, err: &anyhow::Error) {
        warn!(err = %format!("{err:#}"), "planning failed");
        self.feed.append(format!("[Error] planning failed: {err:#}"));
        self.status = if self.roadmap.is_empty() {
            EngineStatus::Idle
        } else {
            EngineStatus::Ready
        };
    }

    /// Switch mode. Build mode needs a roadmap; returns whether the mode changed.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if mode == Mode::Build && self.roadmap.is_empty() {
            return false;
        }
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    pub fn set_auto_run(&mut self, enabled: bool) {
        if self.auto_run != enabled {
            info!(enabled, "auto-run toggled");
        }
        self.auto_run = enabled;
    }

    pub fn toggle_auto_run(&mut self) {
        self.set_auto_run(!self.auto_run);
    }

    pub fn set_focus(&mut self, index: usize) {
        self.roadmap.set_focus(index);
    }

    pub fn move_focus(&mut self, delta: isize) {
        self.roadmap.move_focus(delta);
    }

    /// Reset a failed step to `pending` so auto-run will pick it up again.
    pub fn reset_step(&mut self, id: StepId) -> Result<(), StatusError> {
        self.roadmap.update_status(id, StepStatus::Pending)
    }

    /// Execute the focused step if it is `pending` or `failed`.
    pub fn execute_focused(&mut self) -> Result<Execution, ExecuteError> {
        let id = self
            .roadmap
            .focused_step()
            .map(|step| step.id)
            .ok_or(ExecuteError::EmptyRoadmap)?;
        self.execute_step(id)
    }

    /// Start step `id`.
    ///
    /// Directory changes are applied to the tracked working directory before
    /// returning. Anything else becomes a [`ShellJob`]; the engine stays
    /// `executing` until [`Session::complete`] is called for it.
    #[instrument(skip(self))]
    pub fn execute_step(&mut self, id: StepId) -> Result<Execution, ExecuteError> {
        if self.status.is_busy() {
            warn!(status = %self.status, "dispatch refused while busy");
            return Err(ExecuteError::Busy(self.status));
        }
        let Some(step) = self.roadmap.find(id) else {
            warn!("dispatch for unknown step");
            return Err(ExecuteError::UnknownStep(id));
        };
        if !can_begin(step.status) {
            debug!(status = %step.status, "step not runnable");
            return Err(ExecuteError::NotRunnable {
                id,
                status: step.status,
            });
        }
        let dispatch = classify(&step.cmd);

        self.set_step_status(id, StepStatus::Executing);
        self.status = EngineStatus::Executing;

        match dispatch {
            Dispatch::ChangeDirectory(arg) => {
                let status = self.change_directory(id, &arg);
                self.status = EngineStatus::Ready;
                Ok(Execution::Settled(status))
            }
            Dispatch::Shell(command) => {
                debug!(command = %command, "dispatching shell step");
                Ok(Execution::Running(ShellJob {
                    step_id: id,
                    request: ShellRequest {
                        command,
                        workdir: self.workdir.current().to_path_buf(),
                    },
                }))
            }
        }
    }

    /// Record the outcome of a shell job.
    ///
    /// `Err` means the command never launched. Completions for steps that are
    /// not `executing` are stale and ignored.
    #[instrument(skip(self, result))]
    pub fn complete(&mut self, step_id: StepId, result: Result<CommandReport>) {
        let status = self.roadmap.find(step_id).map(|step| step.status);
        if status != Some(StepStatus::Executing) {
            warn!(status = ?status, "completion for step that is not executing");
            return;
        }

        match result {
            Ok(report) if report.is_success() => {
                self.feed
                    .append(format!("[Success] {}", report.stdout.trim()));
                self.set_step_status(step_id, StepStatus::Completed);
            }
            Ok(report) => {
                let detail = match report.stderr.trim_end() {
                    "" => format!(
                        "command failed: {}",
                        report.exit_error.as_deref().unwrap_or("unknown error")
                    ),
                    stderr => stderr.to_string(),
                };
                self.feed.append(format!("[Error] {detail}"));
                self.fail_step(step_id);
            }
            Err(err) => {
                self.feed.append(format!("[Error] {err:#}"));
                self.fail_step(step_id);
            }
        }
        self.status = EngineStatus::Ready;
    }

    fn change_directory(&mut self, id: StepId, arg: &str) -> StepStatus {
        let changed = self.workdir.resolve(arg).and_then(|target| {
            self.workdir.change_to(&target)?;
            Ok(target)
        });
        match changed {
            Ok(target) => {
                self.feed.append(format!(
                    "[Success] Changed directory to {}",
                    target.display()
                ));
                self.set_step_status(id, StepStatus::Completed);
                StepStatus::Completed
            }
            Err(err) => {
                debug!(err = %format!("{err:#}"), "directory change failed");
                self.feed
                    .append(format!("[Error] cd: no such file or directory: {arg}"));
                self.fail_step(id);
                StepStatus::Failed
            }
        }
    }

    /// A failure always disables auto-run; continuing from it is unsafe.
    fn fail_step(&mut self, id: StepId) {
        self.set_step_status(id, StepStatus::Failed);
        self.set_auto_run(false);
    }

    fn set_step_status(&mut self, id: StepId, status: StepStatus) {
        // Rejections are logged by the roadmap.
        let _ = self.roadmap.update_status(id, status);
    }
}
