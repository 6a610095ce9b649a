//! Configuration loading tests
//!
//! Tests that settings load from disk, fall back to defaults and survive a
//! save and reload

use maru_tts::app::config::Config;
use maru_tts::language::LanguageMode;
use maru_tts::voice::{Gender, GenderFilter};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_missing_config_is_created() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".maru-tts.cfg");
    assert!(!path.exists());

    let config = Config::load_from(&path).expect("Failed to load config");
    assert!(path.exists());
    assert_eq!(config.path(), path.as_path());

    // Defaults
    assert_eq!(config.language(), LanguageMode::Auto);
    assert_eq!(config.gender(), GenderFilter::All);
    assert_eq!(config.voice(), None);
    assert_eq!(config.volume(), 100);
    assert_eq!(config.frame_interval(), Duration::from_millis(50));
    assert_eq!(config.voice_retry_attempts(), 50);
}

#[test]
fn test_values_survive_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.cfg");

    let mut config = Config::load_from(&path).unwrap();
    config.set("speech", "language", "en-US");
    config.set("speech", "gender", "male");
    config.set("speech", "voice", "Alex");
    config.set("speech", "rate", "1.5");
    config.set("display", "visualizer", "false");
    config.save().expect("Failed to save config");

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.language(), LanguageMode::Fixed("en-US".to_string()));
    assert_eq!(config.gender(), GenderFilter::Only(Gender::Male));
    assert_eq!(config.voice().as_deref(), Some("Alex"));
    assert_eq!(config.rate(), 1.5);
    assert!(!config.visualizer());
}

#[test]
fn test_hand_written_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.cfg");
    std::fs::write(
        &path,
        "[speech]\nlanguage = ja-JP\nvolume = 40\npitch = 5\n\n[display]\nerror_display_ms = 1500\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.language(), LanguageMode::Fixed("ja-JP".to_string()));
    assert_eq!(config.volume(), 40);
    // Clamped to the allowed pitch range
    assert_eq!(config.pitch(), 2.0);
    assert_eq!(config.error_display(), Duration::from_millis(1500));

    // Keys the file leaves out fall back to defaults
    assert_eq!(config.rate(), 1.0);
    assert_eq!(config.voice_retry_delay(), Duration::from_millis(100));
}

#[test]
fn test_garbage_values_fall_back() {
    let mut config = Config::in_memory();
    config.set("speech", "rate", "fast");
    config.set("display", "frame_interval_ms", "-20");
    config.set("voices", "retry_attempts", "lots");

    assert_eq!(config.rate(), 1.0);
    assert_eq!(config.frame_interval(), Duration::from_millis(50));
    assert_eq!(config.voice_retry_attempts(), 50);
}
