//! In-memory roadmap store: ordered steps plus the focused index.

use tracing::warn;

use crate::core::transitions::{StatusError, check_transition};
use crate::core::types::{Step, StepDraft, StepId, StepStatus};

/// Turn planner drafts into `pending` steps with ids `1..=n` in order.
pub fn number_drafts(drafts: Vec<StepDraft>) -> Vec<Step> {
    drafts
        .into_iter()
        .zip(1..)
        .map(|(draft, id)| Step::from_draft(id, draft))
        .collect()
}

/// Ordered steps for one planning cycle.
///
/// Length and order are fixed once built; only per-step status changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roadmap {
    steps: Vec<Step>,
    focus: usize,
}

impl Roadmap {
    /// Build a roadmap from planner drafts.
    pub fn from_drafts(drafts: Vec<StepDraft>) -> Self {
        Self::from_steps(number_drafts(drafts))
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps, focus: 0 }
    }

    /// Replace every step and reset focus to the first one.
    pub fn set_roadmap(&mut self, steps: Vec<Step>) {
        self.steps = steps;
        self.focus = 0;
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn find(&self, id: StepId) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == id)
    }

    pub fn position(&self, id: StepId) -> Option<usize> {
        self.steps.iter().position(|step| step.id == id)
    }

    /// Apply `status` to the step with `id`, keeping all other fields.
    ///
    /// Unknown ids and transitions outside the table leave the roadmap untouched.
    pub fn update_status(&mut self, id: StepId, status: StepStatus) -> Result<(), StatusError> {
        let Some(step) = self.steps.iter_mut().find(|step| step.id == id) else {
            warn!(step_id = id, status = %status, "status update for unknown step");
            return Err(StatusError::UnknownStep(id));
        };
        if let Err(err) = check_transition(id, step.status, status) {
            warn!(err = %err, "rejected status update");
            return Err(err);
        }
        step.status = status;
        Ok(())
    }

    /// Index of the first `pending` step in roadmap order.
    ///
    /// `failed` steps are not considered: once auto-run is re-enabled it resumes
    /// past a failure rather than retrying it. A failed step is only picked up
    /// again after an explicit reset to `pending`.
    pub fn next_pending(&self) -> Option<usize> {
        self.steps
            .iter()
            .position(|step| step.status == StepStatus::Pending)
    }

    /// Number of steps currently `executing` (0 or 1 under the session's rules).
    pub fn executing_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.status == StepStatus::Executing)
            .count()
    }

    /// True if every step completed.
    pub fn is_complete(&self) -> bool {
        self.steps
            .iter()
            .all(|step| step.status == StepStatus::Completed)
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_step(&self) -> Option<&Step> {
        self.steps.get(self.focus)
    }

    /// Focus `index`, clamped to `[0, len-1]`.
    pub fn set_focus(&mut self, index: usize) {
        self.focus = index.min(self.steps.len().saturating_sub(1));
    }

    /// Move focus by `delta`, clamping at both ends.
    pub fn move_focus(&mut self, delta: isize) {
        let target = self.focus.saturating_add_signed(delta);
        self.set_focus(target);
    }
}
