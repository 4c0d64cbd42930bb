//! Step status transition table.
//!
//! ```text
//! pending ──> executing ──> completed
//!    ^            │  ^
//!    │            v  │
//!    └──────── failed
//! ```
//!
//! `completed` is terminal. `failed -> executing` is a manual retry and
//! `failed -> pending` is an explicit reset.

use thiserror::Error;

use crate::core::types::{StepId, StepStatus};

/// Rejected status update.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("no step with id {0}")]
    UnknownStep(StepId),
    #[error("step {id}: illegal transition {from} -> {to}")]
    IllegalTransition {
        id: StepId,
        from: StepStatus,
        to: StepStatus,
    },
}

/// Returns true if a step in `status` may start executing.
pub fn can_begin(status: StepStatus) -> bool {
    matches!(status, StepStatus::Pending | StepStatus::Failed)
}

/// Returns true if `from -> to` is in the transition table.
pub fn is_allowed(from: StepStatus, to: StepStatus) -> bool {
    match (from, to) {
        (from, StepStatus::Executing) => can_begin(from),
        (StepStatus::Executing, StepStatus::Completed | StepStatus::Failed) => true,
        (StepStatus::Failed, StepStatus::Pending) => true,
        _ => false,
    }
}

/// Validate a transition for step `id`.
pub fn check_transition(id: StepId, from: StepStatus, to: StepStatus) -> Result<(), StatusError> {
    if is_allowed(from, to) {
        Ok(())
    } else {
        Err(StatusError::IllegalTransition { id, from, to })
    }
}
