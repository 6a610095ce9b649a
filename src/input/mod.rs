//! Keyboard input and shortcut bindings

pub mod keymap;
pub mod shortcuts;

pub use keymap::{create_default_keymap, KeySequence};
pub use shortcuts::{shortcut_for, Key, KeyPress, ShortcutAction};

use log::trace;
use std::collections::HashMap;

/// Shortcut action for raw terminal input
pub fn action_for_input(
    keymap: &HashMap<KeySequence, KeyPress>,
    input: &[u8],
) -> Option<ShortcutAction> {
    let press = keymap.get(input)?;
    trace!("Key press: {:?}", press);
    shortcut_for(*press)
}
