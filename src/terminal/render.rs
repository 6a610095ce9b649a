//! Status line and waveform drawing
//!
//! Both lines are redrawn in place with a carriage return, so they must
//! never be wider than the terminal. Widths are measured in terminal
//! columns; Japanese text takes two columns per character.

use crate::playback::{ControlSurface, Status, StatusKind};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `text` to at most `columns` terminal columns
pub fn truncate_to_width(text: &str, columns: usize) -> String {
    if text.width() <= columns {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > columns.saturating_sub(1) {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Pad `text` with spaces up to `columns` terminal columns
pub fn pad_to_width(text: &str, columns: usize) -> String {
    let text = truncate_to_width(text, columns);
    let pad = columns.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(pad))
}

/// One-line summary, e.g. "[Speaking...] [Play] (Pause) (Stop) | 12 / 10,000"
pub fn status_line(status: &Status, controls: &ControlSurface, extra: &str) -> String {
    let marker = match status.kind {
        StatusKind::Error => "!",
        _ => "",
    };
    let button = |label: &str, enabled: bool| {
        if enabled {
            format!("({})", label)
        } else {
            format!("[{}]", label)
        }
    };

    let mut line = format!(
        "{}[{}] {} {} {}",
        marker,
        status.message,
        button(controls.play_label, controls.play_enabled),
        button("Pause", controls.pause_enabled),
        button("Stop", controls.stop_enabled),
    );
    if !extra.is_empty() {
        line.push_str(" | ");
        line.push_str(extra);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::PlaybackState;

    #[test]
    fn test_truncate_wide_chars() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
        // Each kana is two columns
        assert_eq!(truncate_to_width("こんにちは", 5), "こん…");
        assert_eq!(pad_to_width("ab", 4), "ab  ");
    }

    #[test]
    fn test_status_line() {
        let controls = ControlSurface::for_state(PlaybackState::Paused);
        let line = status_line(&Status::paused(), &controls, "");
        assert_eq!(line, "[Paused] (Resume) [Pause] (Stop)");

        let controls = ControlSurface::for_state(PlaybackState::Idle);
        let line = status_line(&Status::error("oops"), &controls, "3 / 10,000");
        assert_eq!(line, "![oops] (Play) [Pause] [Stop] | 3 / 10,000");
    }
}
