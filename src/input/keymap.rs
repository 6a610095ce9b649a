//! Terminal byte sequences for the shortcut keys
//!
//! A raw-mode terminal cannot report Ctrl+Enter or Ctrl+Escape directly.
//! The control bytes a terminal does send stand in for them:
//! Ctrl+J (LF) for Enter, Ctrl+Space (NUL) for Space and Ctrl+[ (ESC) for
//! Escape.

use super::shortcuts::{Key, KeyPress};
use std::collections::HashMap;

/// Key sequence type
pub type KeySequence = Vec<u8>;

/// Create the default keymap
pub fn create_default_keymap() -> HashMap<KeySequence, KeyPress> {
    let mut map = HashMap::new();

    // Primary-modifier forms
    map.insert(b"\n".to_vec(), KeyPress::primary(Key::Enter));
    map.insert(b"\x00".to_vec(), KeyPress::primary(Key::Space));
    map.insert(b"\x1b".to_vec(), KeyPress::primary(Key::Escape));
    map.insert(b"\x03".to_vec(), KeyPress::primary(Key::Char('c')));

    // Plain keys
    map.insert(b"\r".to_vec(), KeyPress::plain(Key::Enter));
    map.insert(b" ".to_vec(), KeyPress::plain(Key::Space));
    map.insert(b"q".to_vec(), KeyPress::plain(Key::Char('q')));

    map
}
