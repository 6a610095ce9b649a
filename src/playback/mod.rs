//! Playback control: state machine, status line and visualizer

pub mod controller;
pub mod state;
pub mod visualizer;

pub use controller::PlaybackController;
pub use state::{ControlSurface, PlaybackState, Status, StatusKind};
pub use visualizer::{Frame, FrameTask};
