//! Interface state wrapped around a cogito session.
//!
//! `App` never spawns work itself. Every handler returns [`Effect`]s for the
//! event loop to start, which keeps the handlers synchronous and testable.

use cogito::autorun;
use cogito::core::types::{EngineStatus, Mode};
use cogito::session::{Execution, Session, ShellJob};
use tracing::debug;

use crate::keys::Action;
use crate::state::AppEvent;

/// Braille spinner frames, advanced every tick while thinking.
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Background work requested by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Plan(String),
    Run(ShellJob),
}

pub struct App {
    pub session: Session,
    /// Goal text being edited in plan mode.
    pub input: String,
    pub should_quit: bool,
    spinner_frame: usize,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            input: String::new(),
            should_quit: false,
            spinner_frame: 0,
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }

    pub fn tick(&mut self) {
        if self.session.status() == EngineStatus::Thinking {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    /// Apply a user action.
    pub fn handle_action(&mut self, action: Action) -> Vec<Effect> {
        let mut effects = Vec::new();
        match action {
            Action::Quit => self.should_quit = true,
            Action::SwitchMode(mode) => {
                self.session.set_mode(mode);
            }
            Action::ToggleAutoRun => self.session.toggle_auto_run(),
            Action::FocusPrev => self.session.move_focus(-1),
            Action::FocusNext => self.session.move_focus(1),
            Action::ExecuteFocused => match self.session.execute_focused() {
                Ok(Execution::Running(job)) => effects.push(Effect::Run(job)),
                Ok(Execution::Settled(_)) => {}
                Err(err) => debug!(err = %err, "execute ignored"),
            },
            Action::ResetFocused => {
                if let Some(id) = self.session.roadmap().focused_step().map(|s| s.id)
                    && let Err(err) = self.session.reset_step(id)
                {
                    debug!(err = %err, "reset ignored");
                }
            }
            Action::InsertChar(c) => self.input.push(c),
            Action::DeleteChar => {
                self.input.pop();
            }
            Action::SubmitGoal => {
                if let Some(goal) = self.session.submit_goal(&self.input) {
                    self.input.clear();
                    effects.push(Effect::Plan(goal));
                }
            }
        }
        self.pump_auto_run(&mut effects);
        effects
    }

    /// Apply a background completion.
    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::Planned { drafts } => match drafts {
                Ok(drafts) => self.session.apply_plan(drafts),
                Err(err) => self.session.abort_plan(&err),
            },
            AppEvent::Completed { step_id, result } => self.session.complete(step_id, result),
        }
        let mut effects = Vec::new();
        self.pump_auto_run(&mut effects);
        effects
    }

    fn pump_auto_run(&mut self, effects: &mut Vec<Effect>) {
        if self.session.mode() != Mode::Build {
            return;
        }
        if let Some(job) = autorun::poll(&mut self.session) {
            effects.push(Effect::Run(job));
        }
    }
}
