//! maru-tts - speak typed text
//!
//! Detects whether text is Japanese or English, picks a fitting voice from
//! the platform synthesizer, and tracks play/pause/stop against it.
//! Also carries the offline cache used when the UI is served as a web app.

pub mod app;
pub mod cache;
pub mod error;
pub mod input;
pub mod language;
pub mod playback;
pub mod speech;
pub mod terminal;
pub mod text;
pub mod voice;

pub use error::{MaruError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "maru-tts";
