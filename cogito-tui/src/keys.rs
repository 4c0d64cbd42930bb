//! Keypress to action mapping.

use cogito::core::types::Mode;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a keypress asks the interface to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SwitchMode(Mode),
    ToggleAutoRun,
    FocusPrev,
    FocusNext,
    ExecuteFocused,
    ResetFocused,
    InsertChar(char),
    DeleteChar,
    SubmitGoal,
}

/// Map a key event for the active mode.
///
/// In plan mode printable keys edit the goal, so mode and auto-run switches use
/// Tab and Ctrl+A there.
pub fn map_key(mode: Mode, key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match (key.code, ctrl) {
        (KeyCode::Char('c'), true) => return Some(Action::Quit),
        (KeyCode::Char('a'), true) => return Some(Action::ToggleAutoRun),
        _ => {}
    }

    match mode {
        Mode::Plan => match key.code {
            KeyCode::Enter => Some(Action::SubmitGoal),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Tab => Some(Action::SwitchMode(Mode::Build)),
            KeyCode::Char(c) if !ctrl => Some(Action::InsertChar(c)),
            _ => None,
        },
        Mode::Build => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('p') | KeyCode::Tab => Some(Action::SwitchMode(Mode::Plan)),
            KeyCode::Char('b') => Some(Action::SwitchMode(Mode::Build)),
            KeyCode::Char('a') => Some(Action::ToggleAutoRun),
            KeyCode::Char('r') => Some(Action::ResetFocused),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::FocusPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::FocusNext),
            KeyCode::Enter => Some(Action::ExecuteFocused),
            _ => None,
        },
    }
}
