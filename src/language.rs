//! Language detection and language tag helpers
//!
//! Detection is a script heuristic: Japanese kana/kanji versus ASCII Latin
//! letters. It does not try to be a real language identifier.

use log::trace;

/// Tag used for Japanese text and voices
pub const JAPANESE: &str = "ja-JP";

/// Tag used for English text and voices
pub const ENGLISH: &str = "en-US";

/// Japanese share of non-whitespace characters above which mixed text is Japanese
const JAPANESE_RATIO_THRESHOLD: f64 = 0.3;

/// Hiragana, katakana or CJK unified ideograph
pub fn is_japanese_char(ch: char) -> bool {
    matches!(ch, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{4E00}'..='\u{9FAF}')
}

/// Detect whether `text` should be read as Japanese or English
///
/// Text with only Latin letters is English, text with only Japanese script
/// is Japanese. Mixed text is Japanese when more than 30% of its
/// non-whitespace characters are Japanese. Anything else defaults to Japanese.
pub fn detect_language(text: &str) -> &'static str {
    let has_japanese = text.chars().any(is_japanese_char);
    let has_latin = text.chars().any(|ch| ch.is_ascii_alphabetic());

    let detected = match (has_japanese, has_latin) {
        (true, true) => {
            let japanese = text.chars().filter(|&ch| is_japanese_char(ch)).count();
            let total = text.chars().filter(|ch| !ch.is_whitespace()).count();
            let ratio = japanese as f64 / total as f64;
            trace!("Mixed text: {} of {} chars Japanese", japanese, total);
            if ratio > JAPANESE_RATIO_THRESHOLD {
                JAPANESE
            } else {
                ENGLISH
            }
        }
        (false, true) => ENGLISH,
        _ => JAPANESE,
    };

    trace!("Detected language {}", detected);
    detected
}

/// Primary subtag of a BCP 47 tag ("ja" for "ja-JP")
pub fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}

/// Whether `tag` starts with the primary subtag of `language`
///
/// Matches the prefix test used for voice filtering, so "en" voices match
/// "en-US" and "en-GB" alike.
pub fn shares_primary_subtag(tag: &str, language: &str) -> bool {
    tag.starts_with(primary_subtag(language))
}

/// Name shown next to a detected or selected language
pub fn language_display_name(tag: &str) -> &str {
    match tag {
        "ja-JP" => "Japanese",
        "en-US" => "English (US)",
        "en-GB" => "English (UK)",
        other => other,
    }
}

/// Language choice made by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LanguageMode {
    /// Detect from the current text
    #[default]
    Auto,
    /// Always use this tag
    Fixed(String),
}

impl LanguageMode {
    /// Parse a selector value ("auto" or a tag)
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("auto") {
            LanguageMode::Auto
        } else {
            LanguageMode::Fixed(value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_script() {
        assert_eq!(detect_language("Hello world"), ENGLISH);
        assert_eq!(detect_language("こんにちは世界"), JAPANESE);
        assert_eq!(detect_language("カタカナ"), JAPANESE);
    }

    #[test]
    fn test_mixed_ratio() {
        // 5 Japanese of 24 non-whitespace chars
        assert_eq!(detect_language("Hello wonderful world こんにちは"), ENGLISH);
        // 5 of 15 is just over the threshold
        assert_eq!(detect_language("Hello world こんにちは"), JAPANESE);
        // 5 Japanese of 10
        assert_eq!(detect_language("こんにちは world"), JAPANESE);
        // Exactly 30% is not enough
        assert_eq!(detect_language("日本語abcdefg"), ENGLISH);
    }

    #[test]
    fn test_default_is_japanese() {
        assert_eq!(detect_language("12345 !!!"), JAPANESE);
        assert_eq!(detect_language("Привет"), JAPANESE);
        assert_eq!(detect_language(""), JAPANESE);
    }

    #[test]
    fn test_subtags() {
        assert_eq!(primary_subtag("ja-JP"), "ja");
        assert_eq!(primary_subtag("en_GB"), "en");
        assert_eq!(primary_subtag("fr"), "fr");
        assert!(shares_primary_subtag("en-GB", "en-US"));
        assert!(!shares_primary_subtag("ja-JP", "en-US"));
    }

    #[test]
    fn test_language_mode_parse() {
        assert_eq!(LanguageMode::parse("auto"), LanguageMode::Auto);
        assert_eq!(LanguageMode::parse(""), LanguageMode::Auto);
        assert_eq!(
            LanguageMode::parse("en-GB"),
            LanguageMode::Fixed("en-GB".to_string())
        );
        assert_eq!(language_display_name("en-GB"), "English (UK)");
        assert_eq!(language_display_name("fr-FR"), "fr-FR");
    }
}
