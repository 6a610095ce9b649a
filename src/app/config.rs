//! Configuration management

use crate::language::LanguageMode;
use crate::speech::SpeechParams;
use crate::speech::utterance::{PITCH_RANGE, RATE_RANGE};
use crate::voice::GenderFilter;
use crate::{MaruError, Result};
use ini::Ini;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Persistent settings stored in ~/.maru-tts.cfg
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path
    path: PathBuf,
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| MaruError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| MaruError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Defaults only, nothing read from or written to disk
    pub fn in_memory() -> Self {
        Self {
            ini: Self::default_config(),
            path: Self::config_path(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| MaruError::Config(format!("Failed to save config: {}", e)))
    }

    /// Default config file path (~/.maru-tts.cfg)
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".maru-tts.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("speech"))
            .set("language", "auto")
            .set("gender", "all")
            .set("voice", "")
            .set("rate", "1.0")
            .set("pitch", "1.0")
            .set("volume", "100");

        ini.with_section(Some("display"))
            .set("visualizer", "true")
            .set("error_display_ms", "3000")
            .set("frame_interval_ms", "50");

        ini.with_section(Some("voices"))
            .set("retry_delay_ms", "100")
            .set("retry_attempts", "50");

        ini
    }

    /// Get a boolean value from config
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get an integer value from config
    pub fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get a float value from config
    pub fn get_float(&self, section: &str, key: &str, default: f32) -> f32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    fn get_millis(&self, section: &str, key: &str, default: u64) -> Duration {
        let ms = self.get_int(section, key, default as i64);
        Duration::from_millis(u64::try_from(ms).unwrap_or(default))
    }

    /// Language selector: "auto" or a tag
    pub fn language(&self) -> LanguageMode {
        LanguageMode::parse(&self.get_string("speech", "language", "auto"))
    }

    /// Gender selector
    pub fn gender(&self) -> GenderFilter {
        let value = self.get_string("speech", "gender", "all");
        GenderFilter::parse(&value).unwrap_or_else(|| {
            warn!("Unknown gender filter {:?}, using all", value);
            GenderFilter::All
        })
    }

    /// Preferred voice name, if any
    pub fn voice(&self) -> Option<String> {
        let name = self.get_string("speech", "voice", "");
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Speech rate, 1.0 is normal
    pub fn rate(&self) -> f32 {
        self.get_float("speech", "rate", 1.0)
            .clamp(RATE_RANGE.0, RATE_RANGE.1)
    }

    /// Speech pitch, 1.0 is normal
    pub fn pitch(&self) -> f32 {
        self.get_float("speech", "pitch", 1.0)
            .clamp(PITCH_RANGE.0, PITCH_RANGE.1)
    }

    /// Speech volume (0-100)
    pub fn volume(&self) -> u8 {
        self.get_int("speech", "volume", 100).clamp(0, 100) as u8
    }

    /// Rate, pitch and volume together
    pub fn speech_params(&self) -> SpeechParams {
        SpeechParams {
            rate: self.rate(),
            pitch: self.pitch(),
            volume: self.volume(),
        }
    }

    /// Should the waveform line be drawn?
    pub fn visualizer(&self) -> bool {
        self.get_bool("display", "visualizer", true)
    }

    /// How long errors stay on the status line
    pub fn error_display(&self) -> Duration {
        self.get_millis("display", "error_display_ms", 3000)
    }

    /// Time between waveform frames
    pub fn frame_interval(&self) -> Duration {
        self.get_millis("display", "frame_interval_ms", 50)
            .max(Duration::from_millis(1))
    }

    /// Delay between attempts to read the host's voice list
    pub fn voice_retry_delay(&self) -> Duration {
        self.get_millis("voices", "retry_delay_ms", 100)
    }

    /// How many times to ask for voices before giving up
    pub fn voice_retry_attempts(&self) -> u32 {
        self.get_int("voices", "retry_attempts", 50).clamp(0, u32::MAX as i64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::in_memory();
        assert_eq!(config.language(), LanguageMode::Auto);
        assert_eq!(config.gender(), GenderFilter::All);
        assert_eq!(config.voice(), None);
        assert_eq!(config.speech_params(), SpeechParams::default());
        assert_eq!(config.error_display(), Duration::from_millis(3000));
        assert_eq!(config.voice_retry_delay(), Duration::from_millis(100));
        assert!(config.visualizer());
    }

    #[test]
    fn test_values_clamped() {
        let mut config = Config::in_memory();
        config.set("speech", "rate", "50");
        config.set("speech", "pitch", "-3");
        config.set("speech", "volume", "400");
        config.set("speech", "gender", "robot");
        assert_eq!(config.rate(), 10.0);
        assert_eq!(config.pitch(), 0.0);
        assert_eq!(config.volume(), 100);
        assert_eq!(config.gender(), GenderFilter::All);
    }
}
