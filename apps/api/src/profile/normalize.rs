//! Field Normalizers — turn loosely typed model output into canonical values.
//!
//! None of these fail. A present-but-unusable value degrades to absent (or
//! `Sex::Unknown`) for that field alone.

use serde_json::Value;

use crate::profile::models::Sex;

const MALE_CODES: &[&str] = &["m"];
const FEMALE_CODES: &[&str] = &["k", "f"];

const MALE_WORDS: &[&str] = &[
    "male",
    "man",
    "boy",
    "gentleman",
    "mężczyzna",
    "męzczyzna",
    "mezczyzna",
    "chłopak",
    "chlopak",
    "facet",
    "pan",
];

const FEMALE_WORDS: &[&str] = &[
    "female",
    "woman",
    "girl",
    "lady",
    "kobieta",
    "dziewczyna",
    "pani",
];

// Female roots go first: "female" and "woman" contain the male roots.
const FEMALE_ROOTS: &[&str] = &["female", "woman", "women", "kobiet", "dziewczyn"];
const MALE_ROOTS: &[&str] = &["male", "mężczyzn", "męzczyzn", "mezczyzn", "chłop", "chlop"];

/// Canonicalizes a raw sex value: letter codes, then whole words, then word roots.
pub fn normalize_sex(raw: &Value) -> Sex {
    match raw {
        Value::String(s) => sex_from_text(s),
        _ => Sex::Unknown,
    }
}

fn sex_from_text(text: &str) -> Sex {
    let cleaned = text
        .trim()
        .trim_matches(|c: char| c.is_ascii_punctuation())
        .trim()
        .to_lowercase();
    if cleaned.is_empty() {
        return Sex::Unknown;
    }

    if MALE_CODES.contains(&cleaned.as_str()) {
        return Sex::Male;
    }
    if FEMALE_CODES.contains(&cleaned.as_str()) {
        return Sex::Female;
    }

    if MALE_WORDS.contains(&cleaned.as_str()) {
        return Sex::Male;
    }
    if FEMALE_WORDS.contains(&cleaned.as_str()) {
        return Sex::Female;
    }

    if FEMALE_ROOTS.iter().any(|root| cleaned.contains(root)) {
        return Sex::Female;
    }
    if MALE_ROOTS.iter().any(|root| cleaned.contains(root)) {
        return Sex::Male;
    }

    Sex::Unknown
}

/// Coerces an age to whole years, truncating fractional values. No range check here.
pub fn normalize_age(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok().and_then(truncate)
        }
        _ => None,
    }
}

/// Coerces the `t5k_s` seconds value. Negative and non-finite values are unusable.
pub fn normalize_seconds(raw: &Value) -> Option<f64> {
    let seconds = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (seconds.is_finite() && seconds >= 0.0).then_some(seconds)
}

/// Keeps a non-blank `t5k` display string for the Time Codec to interpret.
pub fn normalize_display(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn truncate(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.trunc() as i64)
}
