//! Playback states and what the controls show for them

use std::fmt;

pub const READY_MESSAGE: &str = "Ready";
pub const SPEAKING_MESSAGE: &str = "Speaking...";
pub const PAUSED_MESSAGE: &str = "Paused";
pub const NO_TEXT_MESSAGE: &str = "Please enter some text.";

/// Where playback currently is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    Speaking,
    Paused,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlaybackState::Idle => "idle",
            PlaybackState::Speaking => "speaking",
            PlaybackState::Paused => "paused",
        };
        f.write_str(s)
    }
}

/// Kind of message on the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Ready,
    Speaking,
    Paused,
    Error,
}

/// The status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn ready() -> Self {
        Self::new(StatusKind::Ready, READY_MESSAGE)
    }

    pub fn speaking() -> Self {
        Self::new(StatusKind::Speaking, SPEAKING_MESSAGE)
    }

    pub fn paused() -> Self {
        Self::new(StatusKind::Paused, PAUSED_MESSAGE)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(StatusKind::Error, message)
    }

    fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::ready()
    }
}

/// Which playback controls are usable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSurface {
    pub play_enabled: bool,
    pub pause_enabled: bool,
    pub stop_enabled: bool,
    /// "Play", or "Resume" while paused
    pub play_label: &'static str,
}

impl ControlSurface {
    /// Controls for `state`
    pub fn for_state(state: PlaybackState) -> Self {
        Self {
            play_enabled: state != PlaybackState::Speaking,
            pause_enabled: state == PlaybackState::Speaking,
            stop_enabled: state != PlaybackState::Idle,
            play_label: if state == PlaybackState::Paused {
                "Resume"
            } else {
                "Play"
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_surface() {
        let idle = ControlSurface::for_state(PlaybackState::Idle);
        assert!(idle.play_enabled && !idle.pause_enabled && !idle.stop_enabled);
        assert_eq!(idle.play_label, "Play");

        let speaking = ControlSurface::for_state(PlaybackState::Speaking);
        assert!(!speaking.play_enabled && speaking.pause_enabled && speaking.stop_enabled);

        let paused = ControlSurface::for_state(PlaybackState::Paused);
        assert!(paused.play_enabled && !paused.pause_enabled && paused.stop_enabled);
        assert_eq!(paused.play_label, "Resume");
    }
}
