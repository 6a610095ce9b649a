//! Error types for maru-tts

use std::io;
use thiserror::Error;

/// Main error type for maru-tts
#[derive(Error, Debug)]
pub enum MaruError {
    /// Play was requested with nothing but whitespace in the text box
    #[error("No text to speak")]
    NoText,

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Offline and not cached: {0}")]
    Offline(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for maru-tts operations
pub type Result<T> = std::result::Result<T, MaruError>;

impl From<String> for MaruError {
    fn from(s: String) -> Self {
        MaruError::Other(s)
    }
}

impl From<&str> for MaruError {
    fn from(s: &str) -> Self {
        MaruError::Other(s.to_string())
    }
}

impl From<tts::Error> for MaruError {
    fn from(e: tts::Error) -> Self {
        MaruError::Speech(e.to_string())
    }
}
