//! Keyboard shortcuts for playback
//!
//! All shortcuts need the primary modifier (Ctrl, or Cmd on macOS):
//! - Enter plays
//! - Space pauses or resumes
//! - Escape stops

/// A key, independent of how the terminal encoded it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Char(char),
}

/// A key press with its modifier state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    /// Ctrl, or Cmd on macOS
    pub primary: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            primary: false,
        }
    }

    pub fn primary(key: Key) -> Self {
        Self { key, primary: true }
    }
}

/// What a shortcut asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Play,
    TogglePause,
    Stop,
    Quit,
}

/// Action bound to `press`, if any
pub fn shortcut_for(press: KeyPress) -> Option<ShortcutAction> {
    match (press.key, press.primary) {
        (Key::Enter, true) => Some(ShortcutAction::Play),
        (Key::Space, true) => Some(ShortcutAction::TogglePause),
        (Key::Escape, true) => Some(ShortcutAction::Stop),
        (Key::Char('c'), true) | (Key::Char('q'), false) => Some(ShortcutAction::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_primary_modifier() {
        assert_eq!(
            shortcut_for(KeyPress::primary(Key::Enter)),
            Some(ShortcutAction::Play)
        );
        assert_eq!(shortcut_for(KeyPress::plain(Key::Enter)), None);
        assert_eq!(shortcut_for(KeyPress::plain(Key::Space)), None);
        assert_eq!(shortcut_for(KeyPress::plain(Key::Escape)), None);
    }
}
