//! Voice descriptors and voice selection
//!
//! Voices come from the speech engine. This module decides which of them
//! suit the current language, guesses their gender from their names, and
//! picks a sensible default.

pub mod gender;
pub mod ranking;
pub mod tuning;

pub use gender::infer_gender;
pub use ranking::{rank_voices, select_preferred_voice};
pub use tuning::{optimize_pitch_for_voice, optimize_rate_for_voice};

use serde::Serialize;
use std::fmt;

/// A synthetic voice reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Voice {
    /// Engine handle used to select the voice
    pub id: String,
    /// Display name
    pub name: String,
    /// BCP 47 language tag, e.g. "ja-JP"
    pub lang: String,
    /// Installed on this machine rather than served remotely
    pub is_local: bool,
    /// The platform's default voice
    pub is_default: bool,
}

impl Voice {
    pub fn new(name: &str, lang: &str) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            lang: lang.to_string(),
            is_local: false,
            is_default: false,
        }
    }

    pub fn local(mut self) -> Self {
        self.is_local = true;
        self
    }

    pub fn default_voice(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Whether this voice speaks Japanese
    pub fn is_japanese(&self) -> bool {
        self.lang.starts_with("ja")
    }
}

/// Gender guessed from a voice name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Unknown,
}

impl Gender {
    /// Position in the voice list ordering (female, male, unknown)
    pub fn sort_rank(self) -> u8 {
        match self {
            Gender::Female => 0,
            Gender::Male => 1,
            Gender::Unknown => 2,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Gender selector value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenderFilter {
    #[default]
    All,
    Only(Gender),
}

impl GenderFilter {
    /// Parse a selector value ("all", "female", "male", "unknown")
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Some(GenderFilter::All),
            "female" => Some(GenderFilter::Only(Gender::Female)),
            "male" => Some(GenderFilter::Only(Gender::Male)),
            "unknown" => Some(GenderFilter::Only(Gender::Unknown)),
            _ => None,
        }
    }

    pub fn accepts(self, gender: Gender) -> bool {
        match self {
            GenderFilter::All => true,
            GenderFilter::Only(wanted) => wanted == gender,
        }
    }
}

/// One line of the voice selector, e.g. "[F] Kyoko (ja-JP) *local*"
pub fn voice_label(voice: &Voice) -> String {
    let gender = match infer_gender(&voice.name, &voice.lang) {
        Gender::Female => "[F]",
        Gender::Male => "[M]",
        Gender::Unknown => "[?]",
    };
    let quality = if voice.is_local {
        " *local*"
    } else if voice.is_default {
        " *default*"
    } else {
        ""
    };
    format!("{} {} ({}){}", gender, voice.name, voice.lang, quality)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_filter_parse() {
        assert_eq!(GenderFilter::parse("all"), Some(GenderFilter::All));
        assert_eq!(
            GenderFilter::parse("Female"),
            Some(GenderFilter::Only(Gender::Female))
        );
        assert_eq!(GenderFilter::parse("robot"), None);
        assert!(GenderFilter::All.accepts(Gender::Unknown));
        assert!(!GenderFilter::Only(Gender::Male).accepts(Gender::Female));
    }

    #[test]
    fn test_voice_label() {
        let voice = Voice::new("Kyoko", "ja-JP").local();
        assert_eq!(voice_label(&voice), "[F] Kyoko (ja-JP) *local*");

        let voice = Voice::new("Robot", "fr-FR").default_voice();
        assert_eq!(voice_label(&voice), "[?] Robot (fr-FR) *default*");
    }
}
