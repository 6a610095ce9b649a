//! Terminal handling for the interactive front-end

pub mod render;
pub mod util;

pub use render::{pad_to_width, status_line, truncate_to_width};
pub use util::{get_terminal_size, is_tty, restore_termios, set_raw_mode};
