//! Voice filtering, ordering and default selection

use super::{infer_gender, GenderFilter, Voice};
use crate::language::{primary_subtag, shares_primary_subtag};
use log::debug;
use std::cmp::Ordering;

/// Filter and order voices for the selector
///
/// Voices are narrowed to those sharing the primary subtag of `language`
/// (no narrowing when `language` is `None`) and then to `gender`. If nothing
/// survives, every voice is offered instead. The result is ordered local
/// voices first, then platform defaults, then female, male, unknown, then
/// by name.
pub fn rank_voices(voices: &[Voice], language: Option<&str>, gender: GenderFilter) -> Vec<Voice> {
    let mut ranked: Vec<Voice> = voices
        .iter()
        .filter(|voice| language.map_or(true, |lang| shares_primary_subtag(&voice.lang, lang)))
        .filter(|voice| gender.accepts(infer_gender(&voice.name, &voice.lang)))
        .cloned()
        .collect();

    if ranked.is_empty() {
        debug!(
            "No voices for {:?}/{:?}, offering all {}",
            language,
            gender,
            voices.len()
        );
        ranked = voices.to_vec();
    }

    ranked.sort_by(compare_voices);
    ranked
}

fn compare_voices(a: &Voice, b: &Voice) -> Ordering {
    // true sorts first
    b.is_local
        .cmp(&a.is_local)
        .then_with(|| b.is_default.cmp(&a.is_default))
        .then_with(|| {
            let a_gender = infer_gender(&a.name, &a.lang).sort_rank();
            let b_gender = infer_gender(&b.name, &b.lang).sort_rank();
            a_gender.cmp(&b_gender)
        })
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// Index of the voice to preselect in `ranked`
///
/// Tries a local voice with exactly `language`, a local voice with the same
/// primary subtag, a default voice with the same primary subtag, any local
/// voice, and finally falls back to the first entry.
pub fn select_preferred_voice(ranked: &[Voice], language: &str) -> usize {
    let primary = primary_subtag(language);

    ranked
        .iter()
        .position(|v| v.is_local && v.lang == language)
        .or_else(|| {
            ranked
                .iter()
                .position(|v| v.is_local && v.lang.starts_with(primary))
        })
        .or_else(|| {
            ranked
                .iter()
                .position(|v| v.is_default && v.lang.starts_with(primary))
        })
        .or_else(|| ranked.iter().position(|v| v.is_local))
        .unwrap_or(0)
}
