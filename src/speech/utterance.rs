//! Utterance requests handed to the speech engine

use crate::text::preprocess_text;
use crate::voice::{optimize_pitch_for_voice, optimize_rate_for_voice, Voice};
use crate::{MaruError, Result};

/// Allowed speaking rate, 1.0 is normal
pub const RATE_RANGE: (f32, f32) = (0.1, 10.0);

/// Allowed pitch, 1.0 is normal
pub const PITCH_RANGE: (f32, f32) = (0.0, 2.0);

/// Allowed volume
pub const VOLUME_RANGE: (f32, f32) = (0.0, 1.0);

/// Identifies one accepted utterance in engine notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

/// Speech parameters chosen by the user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechParams {
    pub rate: f32,
    pub pitch: f32,
    /// 0-100, as entered on the volume control
    pub volume: u8,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            volume: 100,
        }
    }
}

/// A single request to vocalize text
#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceRequest {
    pub text: String,
    pub voice: Option<Voice>,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl UtteranceRequest {
    /// Build a request from raw input text
    ///
    /// The text is trimmed and cleaned for speech. Rate and pitch are tuned
    /// for the chosen voice, volume is scaled from 0-100 to 0.0-1.0, and all
    /// three are clamped to their ranges.
    pub fn build(
        text: &str,
        voice: Option<&Voice>,
        lang: &str,
        params: SpeechParams,
    ) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MaruError::NoText);
        }

        let rate = optimize_rate_for_voice(params.rate, voice);
        let pitch = optimize_pitch_for_voice(params.pitch, voice);
        let volume = f32::from(params.volume.min(100)) / 100.0;

        Ok(Self {
            text: preprocess_text(text),
            voice: voice.cloned(),
            lang: lang.to_string(),
            rate: rate.clamp(RATE_RANGE.0, RATE_RANGE.1),
            pitch: pitch.clamp(PITCH_RANGE.0, PITCH_RANGE.1),
            volume: volume.clamp(VOLUME_RANGE.0, VOLUME_RANGE.1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_rejected() {
        let result = UtteranceRequest::build("   \n", None, "ja-JP", SpeechParams::default());
        assert!(matches!(result, Err(MaruError::NoText)));
    }

    #[test]
    fn test_build_with_japanese_voice() {
        let voice = Voice::new("Kyoko", "ja-JP").local();
        let params = SpeechParams {
            rate: 0.5,
            pitch: 1.5,
            volume: 50,
        };
        let request = UtteranceRequest::build(" 100% ", Some(&voice), "ja-JP", params).unwrap();
        assert_eq!(request.text, "100パーセント");
        assert_eq!(request.rate, 0.7);
        assert_eq!(request.pitch, 1.2);
        assert_eq!(request.volume, 0.5);
        assert_eq!(request.voice.as_ref().map(|v| v.name.as_str()), Some("Kyoko"));
    }

    #[test]
    fn test_parameters_clamped() {
        let params = SpeechParams {
            rate: 25.0,
            pitch: -1.0,
            volume: 200,
        };
        let request = UtteranceRequest::build("hello", None, "en-US", params).unwrap();
        assert_eq!(request.rate, 10.0);
        assert_eq!(request.pitch, 0.0);
        assert_eq!(request.volume, 1.0);
    }
}
