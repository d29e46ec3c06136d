//! Key mapping from terminal events to runtime input events.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tuidom_types::{KeyPress, UiEvent};

/// Conventional name for a key code: characters as-is, named keys in
/// their usual form. Keys outside the mapped set return `None` and are
/// dropped by the pump.
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => return None,
    };
    Some(name)
}

/// Build a [`KeyPress`] payload from a terminal key event.
pub fn key_press(key: &KeyEvent) -> Option<KeyPress> {
    let name = key_name(key.code)?;
    Some(KeyPress {
        key: name,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        shift: key.modifiers.contains(KeyModifiers::SHIFT),
    })
}

/// Translate a terminal key event into a runtime input event: press and
/// auto-repeat become key-down, release becomes key-up.
pub fn translate_key(key: &KeyEvent) -> Option<UiEvent> {
    let press = key_press(key)?;
    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => Some(UiEvent::key_down(press)),
        KeyEventKind::Release => Some(UiEvent::key_up(press)),
    }
}

/// Check if a translated key press should interrupt the application
/// (Ctrl-C).
pub fn is_interrupt(press: &KeyPress) -> bool {
    press.ctrl && press.key == "c"
}
