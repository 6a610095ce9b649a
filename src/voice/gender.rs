//! Gender guess from a voice's display name
//!
//! Engines rarely report a voice's gender, so it is guessed from fragments
//! of the name. The keyword lists include single letters ("f", "m") and
//! short words ("man") that also match unrelated names; those matches are
//! part of the expected behavior.

use super::Gender;

const FEMALE_KEYWORDS: &[&str] = &[
    "female",
    "woman",
    "girl",
    "lady",
    "f",
    "さくら",
    "はるか",
    "kyoko",
    "sara",
    "voice1",
    "voice3",
    "zira",
    "hazel",
    "susan",
    "helen",
    "karen",
    "samantha",
    "microsoft haruka",
    "microsoft sayaka",
    "microsoft ayumi",
];

const MALE_KEYWORDS: &[&str] = &[
    "male",
    "man",
    "boy",
    "gentleman",
    "m",
    "たろう",
    "takeshi",
    "ichiro",
    "voice2",
    "voice4",
    "david",
    "mark",
    "george",
    "alex",
    "daniel",
    "microsoft ichiro",
    "microsoft haruto",
];

/// Guess a voice's gender from its name and language
///
/// Japanese voices are checked against known Windows and Google voice
/// names first. Then the generic keyword lists apply, female before male.
/// Japanese voices nothing matched count as female, any other voice as
/// unknown.
pub fn infer_gender(name: &str, lang: &str) -> Gender {
    let name = name.to_lowercase();
    let japanese = lang.starts_with("ja");

    if japanese {
        if contains_any(&name, &["haruka", "sayaka", "ayumi"]) {
            return Gender::Female;
        }
        if contains_any(&name, &["ichiro", "haruto"]) {
            return Gender::Male;
        }
        if contains_any(&name, &["female", "woman"]) {
            return Gender::Female;
        }
        if contains_any(&name, &["male", "man"]) {
            return Gender::Male;
        }
    }

    if contains_any(&name, FEMALE_KEYWORDS) {
        return Gender::Female;
    }
    if contains_any(&name, MALE_KEYWORDS) {
        return Gender::Male;
    }

    if japanese {
        Gender::Female
    } else {
        Gender::Unknown
    }
}

fn contains_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| name.contains(keyword))
}
