//! Key bindings: arrows and vim-style letters.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RotateLeft,
    RotateRight,
    FastDrop,
    Pause,
    Restart,
    Confirm,
    Up,
    Down,
    Quit,
    None,
}

/// Map a key event to an action. Menu navigation reuses Up/Down; Down also
/// means fast drop while playing, so the caller decides by screen.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !(modifiers.is_empty() || modifiers == KeyModifiers::SHIFT) {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p') => Action::Pause,
        KeyCode::Char('r') => Action::Restart,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Left | KeyCode::Char('h') => Action::RotateLeft,
        KeyCode::Right | KeyCode::Char('l') => Action::RotateRight,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Char(' ') => Action::FastDrop,
        _ => Action::None,
    }
}
