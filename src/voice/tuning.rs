//! Per-voice adjustment of rate and pitch
//!
//! Japanese voices sound more natural slightly slower than the requested
//! rate and with the pitch kept close to normal.

use super::Voice;

/// Lowest rate used for Japanese voices
const JAPANESE_MIN_RATE: f32 = 0.7;
const JAPANESE_RATE_SCALE: f32 = 0.9;
const JAPANESE_PITCH_RANGE: (f32, f32) = (0.8, 1.2);

/// Rate to request for `voice` when the user asked for `rate`
pub fn optimize_rate_for_voice(rate: f32, voice: Option<&Voice>) -> f32 {
    match voice {
        Some(voice) if voice.is_japanese() => (rate * JAPANESE_RATE_SCALE).max(JAPANESE_MIN_RATE),
        _ => rate,
    }
}

/// Pitch to request for `voice` when the user asked for `pitch`
pub fn optimize_pitch_for_voice(pitch: f32, voice: Option<&Voice>) -> f32 {
    match voice {
        Some(voice) if voice.is_japanese() => {
            pitch.clamp(JAPANESE_PITCH_RANGE.0, JAPANESE_PITCH_RANGE.1)
        }
        _ => pitch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_japanese_rate() {
        let voice = Voice::new("Kyoko", "ja-JP");
        assert!((optimize_rate_for_voice(1.0, Some(&voice)) - 0.9).abs() < 1e-6);
        assert!((optimize_rate_for_voice(2.0, Some(&voice)) - 1.8).abs() < 1e-6);
        assert_eq!(optimize_rate_for_voice(0.5, Some(&voice)), 0.7);
    }

    #[test]
    fn test_japanese_pitch() {
        let voice = Voice::new("Kyoko", "ja-JP");
        assert_eq!(optimize_pitch_for_voice(2.0, Some(&voice)), 1.2);
        assert_eq!(optimize_pitch_for_voice(0.1, Some(&voice)), 0.8);
        assert_eq!(optimize_pitch_for_voice(1.0, Some(&voice)), 1.0);
    }

    #[test]
    fn test_other_voices_untouched() {
        let voice = Voice::new("Daniel", "en-GB");
        assert_eq!(optimize_rate_for_voice(0.5, Some(&voice)), 0.5);
        assert_eq!(optimize_pitch_for_voice(2.0, Some(&voice)), 2.0);
        assert_eq!(optimize_rate_for_voice(0.5, None), 0.5);
        assert_eq!(optimize_pitch_for_voice(2.0, None), 2.0);
    }
}
