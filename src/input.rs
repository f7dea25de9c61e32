//! Key bindings: arrows and vim-style h/l.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Pause,
    Restart,
    Quit,
    None,
}

/// Map key event to game action.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Action::None;
    }
    match code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p' | 'P') => Action::Pause,
        KeyCode::Char('r' | 'R') => Action::Restart,
        KeyCode::Left | KeyCode::Char('h') => Action::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::MoveRight,
        _ => Action::None,
    }
}
