//! Shared deterministic types for the roadmap engine.
//!
//! These types define stable contracts between core components. They should not
//! depend on external state or I/O.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a step, unique within one roadmap.
pub type StepId = u32;

/// Per-step lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Executing,
    Completed,
    Failed,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Executing => "executing",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse session status, distinct from per-step status.
///
/// Gates dispatch: a step may only start while the engine is `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    /// No roadmap has been planned yet.
    Idle,
    /// A goal was submitted and the planner has not answered.
    Thinking,
    /// Nothing is in flight.
    Ready,
    /// A step is running.
    Executing,
}

impl EngineStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineStatus::Idle => "idle",
            EngineStatus::Thinking => "thinking",
            EngineStatus::Ready => "ready",
            EngineStatus::Executing => "executing",
        }
    }

    /// True while a plan or a step is in flight.
    pub fn is_busy(self) -> bool {
        matches!(self, EngineStatus::Thinking | EngineStatus::Executing)
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two views is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Plan,
    Build,
}

/// Planner output for one step, before identity and status are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDraft {
    pub title: String,
    pub cmd: String,
    pub desc: String,
}

/// One unit of work in a roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub title: String,
    /// Literal command line; either a directory change or a shell command.
    pub cmd: String,
    /// Human-readable rationale. Not used by the engine.
    pub desc: String,
    pub status: StepStatus,
}

impl Step {
    pub fn from_draft(id: StepId, draft: StepDraft) -> Self {
        Self {
            id,
            title: draft.title,
            cmd: draft.cmd,
            desc: draft.desc,
            status: StepStatus::Pending,
        }
    }
}
