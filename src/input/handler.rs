use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::keybindings::{Action, KeyBindings};
use crate::app::state::{Screen, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Action(Action),
    Char(char),
    Backspace,
}

pub fn handle_input(key: KeyEvent, state: &SessionState, bindings: &KeyBindings) -> InputResult {
    // Release/repeat events would double every keystroke on kitty-protocol terminals
    if key.kind != KeyEventKind::Press {
        return InputResult::Continue;
    }

    match &state.screen {
        Screen::Confirm(_) => handle_confirm_input(key),
        Screen::Help { .. } => handle_help_input(key),
        _ if state.search.active => handle_search_input(key),
        _ => bindings
            .get(&key)
            .map_or(InputResult::Continue, InputResult::Action),
    }
}

fn handle_confirm_input(key: KeyEvent) -> InputResult {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => InputResult::Action(Action::ConfirmYes),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') | KeyCode::Esc => {
            InputResult::Action(Action::ConfirmNo)
        }
        _ => InputResult::Continue,
    }
}

fn handle_help_input(key: KeyEvent) -> InputResult {
    // Any of the usual exit keys closes help
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => InputResult::Action(Action::Back),
        _ => InputResult::Continue,
    }
}

fn handle_search_input(key: KeyEvent) -> InputResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => InputResult::Action(Action::Quit),
            _ => InputResult::Continue,
        };
    }

    match key.code {
        KeyCode::Char(c) => InputResult::Char(c),
        KeyCode::Backspace => InputResult::Backspace,
        KeyCode::Enter => InputResult::Action(Action::SubmitSearch),
        KeyCode::Esc => InputResult::Action(Action::CancelSearch),
        _ => InputResult::Continue,
    }
}
