//! Messages delivered to the interface's event loop from background tasks.

use anyhow::Result;
use cogito::core::types::{StepDraft, StepId};
use cogito::io::shell::CommandReport;

/// Completion of work started outside the event loop.
///
/// Each planning request and each shell job produces exactly one event.
#[derive(Debug)]
pub enum AppEvent {
    Planned {
        drafts: Result<Vec<StepDraft>>,
    },
    Completed {
        step_id: StepId,
        result: Result<CommandReport>,
    },
}
