use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Top,
    Bottom,
    PageUp,
    PageDown,

    // Actions
    Open,
    Back,
    Quit,
    Refresh,
    Search,
    ToggleAutoRefresh,
    CycleSort,
    ToggleBulk,
    ToggleSelect,
    Delete,
    Copy,
    OpenInBrowser,
    /// Zero-based attachment index
    Download(u8),
    DownloadAll,

    // Search field
    SubmitSearch,
    CancelSearch,

    // Confirmation dialog
    ConfirmYes,
    ConfirmNo,

    // Help
    Help,
}

pub struct KeyBindings {
    bindings: HashMap<KeyEvent, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            bindings: Self::default_bindings(),
        }
    }

    pub fn get(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings.get(&normalize(event)).copied()
    }

    fn default_bindings() -> HashMap<KeyEvent, Action> {
        let mut map = HashMap::new();

        // Navigation
        map.insert(key('j'), Action::Down);
        map.insert(key('k'), Action::Up);
        map.insert(key_code(KeyCode::Down), Action::Down);
        map.insert(key_code(KeyCode::Up), Action::Up);
        map.insert(key('g'), Action::Top);
        map.insert(key('G'), Action::Bottom);
        map.insert(key_code(KeyCode::Home), Action::Top);
        map.insert(key_code(KeyCode::End), Action::Bottom);
        map.insert(key_code(KeyCode::PageDown), Action::PageDown);
        map.insert(key_code(KeyCode::PageUp), Action::PageUp);
        map.insert(ctrl_key('d'), Action::PageDown);
        map.insert(ctrl_key('u'), Action::PageUp);

        // Actions
        map.insert(key_code(KeyCode::Enter), Action::Open);
        map.insert(key_code(KeyCode::Esc), Action::Back);
        map.insert(key('q'), Action::Quit);
        map.insert(ctrl_key('c'), Action::Quit);
        map.insert(key('r'), Action::Refresh);
        map.insert(key('/'), Action::Search);
        map.insert(key('a'), Action::ToggleAutoRefresh);
        map.insert(key('s'), Action::CycleSort);
        map.insert(key('v'), Action::ToggleBulk);
        map.insert(key(' '), Action::ToggleSelect);
        map.insert(key('d'), Action::Delete);
        map.insert(key('c'), Action::Copy);
        map.insert(key('o'), Action::OpenInBrowser);
        map.insert(key('A'), Action::DownloadAll);
        for (i, c) in ('1'..='9').enumerate() {
            map.insert(key(c), Action::Download(i as u8));
        }

        // Help
        map.insert(key('?'), Action::Help);

        map
    }
}

/// Terminals disagree on whether shifted characters carry SHIFT; the
/// character itself already encodes it, so drop the modifier for chars.
fn normalize(event: &KeyEvent) -> KeyEvent {
    match event.code {
        KeyCode::Char(c) => {
            let modifiers = event.modifiers.difference(KeyModifiers::SHIFT);
            KeyEvent::new(KeyCode::Char(c), modifiers)
        }
        code => KeyEvent::new(code, event.modifiers),
    }
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}
