//! Speech engine seam and utterance requests

pub mod backends;
pub mod engine;
pub mod utterance;

pub use engine::{EngineEvent, EngineEventKind, SpeechEngine};
pub use utterance::{SpeechParams, UtteranceId, UtteranceRequest};

use crate::Result;
use log::info;

/// Create the platform speech engine
pub fn create_engine() -> Result<backends::native::NativeEngine> {
    info!(
        "Creating native speech engine for platform: {}",
        std::env::consts::OS
    );
    let engine = backends::native::NativeEngine::new().map_err(|e| {
        crate::MaruError::Speech(format!(
            "No speech backend available on '{}'. On Linux install speech-dispatcher \
             (sudo apt install speech-dispatcher). Error: {}",
            std::env::consts::OS,
            e
        ))
    })?;
    info!("✓ Successfully initialized native TTS backend");
    Ok(engine)
}
