use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Represents the result of handling a key event. Actions are mapped
/// without screen context; the event loop interprets them against the
/// current navigation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Open the status gallery from the home screen
    ViewGallery,
    /// Activate the highlighted item
    Activate,
    /// Leave the current screen (grid -> home, detail -> grid)
    Back,
    /// Open the selected media externally
    Open,
    /// Move the grid highlight up
    Up,
    /// Move the grid highlight down
    Down,
    /// No action
    None,
}

/// Maps keyboard events to actions
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,

        // Leave the current screen
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Back,
        (KeyCode::Backspace, KeyModifiers::NONE) => KeyAction::Back,
        (KeyCode::Char('b'), KeyModifiers::NONE) => KeyAction::Back,

        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Activate,
        (KeyCode::Char('v'), KeyModifiers::NONE) => KeyAction::ViewGallery,
        (KeyCode::Char('o'), KeyModifiers::NONE) => KeyAction::Open,

        // Grid navigation
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::Up,
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Up,
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::Down,
        (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::Down,

        _ => KeyAction::None,
    }
}
