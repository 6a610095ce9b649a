//! Text cleanup before speaking and text length bookkeeping
//!
//! `preprocess_text` turns raw input into something a synthesizer reads
//! naturally:
//! - emoji and pictographs are dropped
//! - `& @ # $ % + =` are spelled out as spoken words
//! - repeated 。 and 、 are collapsed
//! - URLs and e-mail addresses become a single placeholder word
//! - dates like 3月14日 get kana reading hints
//!
//! The steps run in that order; the e-mail pattern expects the at-mark to
//! have been spelled out already.

use once_cell::sync::Lazy;
use regex::Regex;

/// Soft limit on input length, in characters
pub const MAX_TEXT_CHARS: usize = 10_000;

/// Length above which the counter shows a warning
pub const WARNING_CHARS: usize = 7_000;

/// Length above which the counter shows an error
pub const ERROR_CHARS: usize = 9_000;

/// Symbols and the words spoken in their place
pub const SPOKEN_SYMBOLS: &[(char, &str)] = &[
    ('&', "アンド"),
    ('@', "アットマーク"),
    ('#', "ハッシュ"),
    ('$', "ドル"),
    ('%', "パーセント"),
    ('+', "プラス"),
    ('=', "イコール"),
];

/// Spoken in place of a URL
pub const URL_PLACEHOLDER: &str = "リンク";

/// Spoken in place of an e-mail address
pub const EMAIL_PLACEHOLDER: &str = "メールアドレス";

static EMOJI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F1E0}-\x{1F1FF}\x{2600}-\x{26FF}\x{2700}-\x{27BF}]",
    )
    .expect("Failed to compile emoji regex")
});

static MARU_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"。{2,}").expect("Failed to compile 。 regex"));

static TEN_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"、{2,}").expect("Failed to compile 、 regex"));

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("Failed to compile URL regex"));

// Local part may contain spelled-out % and + as well
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:[a-zA-Z0-9._\-]|パーセント|プラス)+アットマーク[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}")
        .expect("Failed to compile e-mail regex")
});

static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)年").expect("Failed to compile year regex"));

static MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)月").expect("Failed to compile month regex"));

static DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)日").expect("Failed to compile day regex"));

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

/// Prepare text for the synthesizer
pub fn preprocess_text(text: &str) -> String {
    let text = EMOJI_RE.replace_all(text, "");
    let text = spell_out_symbols(&text);
    let text = MARU_RUN_RE.replace_all(&text, "。");
    let text = TEN_RUN_RE.replace_all(&text, "、");
    let text = URL_RE.replace_all(&text, URL_PLACEHOLDER);
    let text = EMAIL_RE.replace_all(&text, EMAIL_PLACEHOLDER);
    let text = YEAR_RE.replace_all(&text, "${1}ねん");
    let text = MONTH_RE.replace_all(&text, "${1}がつ");
    let text = DAY_RE.replace_all(&text, "${1}にち");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Replace every symbol in `SPOKEN_SYMBOLS` with its word
pub fn spell_out_symbols(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match SPOKEN_SYMBOLS.iter().find(|(symbol, _)| *symbol == ch) {
            Some((_, word)) => result.push_str(word),
            None => result.push(ch),
        }
    }
    result
}

/// How close the text is to the length limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthLevel {
    Normal,
    Warning,
    Error,
}

impl LengthLevel {
    /// Level for a text of `chars` characters
    pub fn for_len(chars: usize) -> Self {
        if chars > ERROR_CHARS {
            LengthLevel::Error
        } else if chars > WARNING_CHARS {
            LengthLevel::Warning
        } else {
            LengthLevel::Normal
        }
    }
}

/// Counter label such as "1,234 / 10,000"
pub fn char_count_label(chars: usize) -> String {
    format!(
        "{} / {}",
        group_thousands(chars),
        group_thousands(MAX_TEXT_CHARS)
    )
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
