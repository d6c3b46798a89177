//! Time Codec — conversion between elapsed-time strings and seconds.
//!
//! Decoding never fails: unrecognized or overflowing input is simply `None`.
//! Digit classes are ASCII-only; `str::parse` rejects other Unicode digits.

use std::sync::LazyLock;

use regex::Regex;

static MM_SS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2}):([0-5][0-9])$").expect("valid MM:SS regex")
});

static HH_MM_SS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2}):([0-5][0-9]):([0-5][0-9])$").expect("valid HH:MM:SS regex")
});

/// "25 minut", "25min", "25 Minutes." — Polish and English minute words.
static MINUTES_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([0-9]+)\s*(?:minutes|minuty|minuta|minut|min)[.,;:!?]*$")
        .expect("valid minutes regex")
});

/// "24m 30s" shorthand.
static MINUTES_SECONDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([0-9]+)\s*m\s*([0-9]+)\s*s[.,;:!?]*$").expect("valid m/s regex")
});

/// Renders seconds as `MM:SS`. Minutes are not wrapped at 60.
pub fn seconds_to_display(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Renders seconds as `HH:MM:SS`, used for half-marathon predictions.
pub fn seconds_to_hhmmss(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Parses a canonical or colloquial elapsed-time string into seconds.
pub fn display_to_seconds(text: &str) -> Option<f64> {
    let text = text.trim();

    if let Some(caps) = MM_SS.captures(text) {
        let minutes: u64 = caps[1].parse().ok()?;
        let seconds: u64 = caps[2].parse().ok()?;
        return Some((minutes * 60 + seconds) as f64);
    }

    if let Some(caps) = HH_MM_SS.captures(text) {
        let hours: u64 = caps[1].parse().ok()?;
        let minutes: u64 = caps[2].parse().ok()?;
        let seconds: u64 = caps[3].parse().ok()?;
        return Some((hours * 3600 + minutes * 60 + seconds) as f64);
    }

    if let Some(caps) = MINUTES_WORD.captures(text) {
        let minutes: u64 = caps[1].parse().ok()?;
        return Some(minutes.checked_mul(60)? as f64);
    }

    if let Some(caps) = MINUTES_SECONDS.captures(text) {
        let minutes: u64 = caps[1].parse().ok()?;
        // Overlong second counts saturate instead of failing the whole match.
        let seconds = caps[2].parse::<u64>().unwrap_or(u64::MAX).min(59);
        return Some(minutes.checked_mul(60)?.checked_add(seconds)? as f64);
    }

    None
}

fn whole_seconds(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    seconds.round() as u64
}
