use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Modifier {
    Shift,
    Alt,
    Control,
    Meta,
}

/// A keystroke as seen by a typing session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Modifier(Modifier),
    /// Function keys, arrows and other named keys; they count as activity
    /// but are never scored.
    Other,
}

impl Key {
    pub fn is_modifier(&self) -> bool {
        matches!(self, Key::Modifier(_))
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        if c.is_control() {
            Key::Other
        } else {
            Key::Char(c)
        }
    }
}

impl From<ModifierKeyCode> for Modifier {
    fn from(code: ModifierKeyCode) -> Self {
        match code {
            ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => Modifier::Shift,
            ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => Modifier::Alt,
            ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => Modifier::Control,
            ModifierKeyCode::LeftSuper
            | ModifierKeyCode::RightSuper
            | ModifierKeyCode::LeftHyper
            | ModifierKeyCode::RightHyper
            | ModifierKeyCode::LeftMeta
            | ModifierKeyCode::RightMeta
            | ModifierKeyCode::IsoLevel3Shift
            | ModifierKeyCode::IsoLevel5Shift => Modifier::Meta,
        }
    }
}

impl From<KeyEvent> for Key {
    fn from(event: KeyEvent) -> Self {
        match event.code {
            // ctrl chords are shortcuts; ctrl+alt is how some terminals report AltGr
            KeyCode::Char(_)
                if event.modifiers.contains(KeyModifiers::CONTROL)
                    && !event.modifiers.contains(KeyModifiers::ALT) =>
            {
                Key::Other
            }
            KeyCode::Char(c) => Key::from(c),
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Modifier(code) => Key::Modifier(code.into()),
            _ => Key::Other,
        }
    }
}
