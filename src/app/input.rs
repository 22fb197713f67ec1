use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::keymap::{KeyAction, Keymap, KeymapContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Action(KeyAction),
    Insert(char),
    Backspace,
    None,
}

/// Keymap bindings win; otherwise printable characters and Backspace edit text.
pub fn classify(keymap: &Keymap, key: &KeyEvent, context: KeymapContext) -> KeyCommand {
    if let Some(action) = keymap.resolve(key, context) {
        return KeyCommand::Action(action);
    }
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return KeyCommand::None;
    }
    match key.code {
        KeyCode::Char(ch) => KeyCommand::Insert(ch),
        KeyCode::Backspace => KeyCommand::Backspace,
        _ => KeyCommand::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_characters_become_text() {
        let keymap = Keymap::builtin().expect("keymap");
        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(
            classify(&keymap, &shifted, KeymapContext::Form),
            KeyCommand::Insert('A')
        );
        let ctrl = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(classify(&keymap, &ctrl, KeymapContext::Form), KeyCommand::None);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(
            classify(&keymap, &enter, KeymapContext::Popup),
            KeyCommand::Action(KeyAction::Activate)
        );
    }
}
