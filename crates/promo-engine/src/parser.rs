//! Event-date text parsing.
//!
//! Converts the loosely formatted, human-authored date strings embedded in
//! promo page content (`"2nd March"`, `"March 2, 2030 18:00"`) into an
//! absolute local date-time. The function takes an explicit `now` anchor
//! (no system clock access) — the caller provides it, keeping the parser
//! pure and testable.
//!
//! # Grammar
//!
//! Tokens may appear in any order, separated by whitespace or commas:
//!
//! - a month name, full or abbreviated, case-insensitive (`"sep"`,
//!   `"sept"`, `"september"`);
//! - a day of month, bare or with an ordinal suffix (`1st`, `22nd`);
//! - an optional 4-digit year beginning with `20`;
//! - an optional `HH:MM` 24-hour time.
//!
//! When no year is given, the date resolves to its next occurrence strictly
//! after `now` — rolling forward one year if the current-year construction
//! already lies in the past or present.
//!
//! Every malformed input yields [`PromoError::UnparsableDate`]; the parser
//! never guesses and never panics.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::PromoError;

/// Compiled regex patterns for date-text scanning.
fn patterns() -> &'static DatePatterns {
    static PATTERNS: OnceLock<DatePatterns> = OnceLock::new();
    PATTERNS.get_or_init(DatePatterns::new)
}

struct DatePatterns {
    // "1st", "22nd", "3rd", "4th" — suffix stripped before numeric parsing
    ordinal_suffix: Regex,
    // "18:00", "9:30"
    time_hm: Regex,
    // standalone 4-digit year: "2030"
    year_20xx: Regex,
    // bare 1-2 digit day: "2", "31"
    bare_day: Regex,
}

impl DatePatterns {
    fn new() -> Self {
        Self {
            ordinal_suffix: Regex::new(r"(\d)(st|nd|rd|th)\b").unwrap(),
            time_hm: Regex::new(r"\b(\d{1,2}):(\d{2})\b").unwrap(),
            year_20xx: Regex::new(r"\b(20\d{2})\b").unwrap(),
            bare_day: Regex::new(r"\b(\d{1,2})\b").unwrap(),
        }
    }
}

/// Parse a human-authored event date into an absolute local date-time.
///
/// # Arguments
///
/// * `text` — The raw date text (e.g. `"March 2, 2030 18:00"`)
/// * `now` — The current local instant, used to resolve an omitted year
///
/// # Errors
///
/// Returns [`PromoError::UnparsableDate`] when the month name is missing or
/// unrecognized, when no in-range day number is present, or when the input
/// is empty. A day that overflows its month (e.g. Feb 30) is **not** an
/// error: it rolls into the next month per calendar arithmetic, matching
/// how the page content has always behaved.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use promo_engine::parse_event_date;
///
/// let now = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let target = parse_event_date("March 2, 2030 18:00", now).unwrap();
/// assert_eq!(target.to_string(), "2030-03-02 18:00:00");
/// ```
pub fn parse_event_date(text: &str, now: NaiveDateTime) -> Result<NaiveDateTime, PromoError> {
    let p = patterns();

    // Normalize: trim, lowercase, strip ordinal suffixes, commas → spaces.
    let cleaned = text.trim().to_lowercase();
    let cleaned = p.ordinal_suffix.replace_all(&cleaned, "$1").into_owned();
    let cleaned = cleaned.replace(',', " ");

    if cleaned.trim().is_empty() {
        return Err(PromoError::UnparsableDate(text.trim().to_string()));
    }

    // The day scan must not re-match digits already consumed by the time or
    // year tokens ("March 2030", "March 18:00" have no day). Matched spans
    // are blanked out before the day search.
    let mut scannable = cleaned.clone();

    // Optional HH:MM — clamped, defaulting to midnight. The match data is
    // copied out before blanking so no borrow of `scannable` survives.
    let time_match = p.time_hm.captures(&scannable).map(|caps| {
        (
            caps[1].parse::<u32>().unwrap_or(0),
            caps[2].parse::<u32>().unwrap_or(0),
            caps.get(0).map(|whole| whole.range()),
        )
    });
    let (hour, minute) = match time_match {
        Some((h, m, span)) => {
            if let Some(span) = span {
                blank_range(&mut scannable, span);
            }
            (h.min(23), m.min(59))
        }
        None => (0, 0),
    };

    // Optional explicit year ("20xx" only).
    let year_match = p
        .year_20xx
        .find(&scannable)
        .map(|m| (m.as_str().to_string(), m.range()));
    let explicit_year = match year_match {
        Some((digits, span)) => {
            blank_range(&mut scannable, span);
            Some(digits.parse::<i32>().unwrap_or(now.year()))
        }
        None => None,
    };

    // First token matching a month name wins.
    let month = cleaned
        .split_whitespace()
        .find_map(month_from_token)
        .ok_or_else(|| PromoError::UnparsableDate(text.trim().to_string()))?;

    // First bare 1-2 digit number in what remains.
    let day: u32 = p
        .bare_day
        .find(&scannable)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| PromoError::UnparsableDate(text.trim().to_string()))?;
    if !(1..=31).contains(&day) {
        return Err(PromoError::UnparsableDate(text.trim().to_string()));
    }

    let year = explicit_year.unwrap_or_else(|| now.year());
    let candidate = construct_datetime(year, month, day, hour, minute)
        .ok_or_else(|| PromoError::UnparsableDate(text.trim().to_string()))?;

    // No explicit year and already past (or exactly now): next occurrence.
    if explicit_year.is_none() && candidate <= now {
        return construct_datetime(year + 1, month, day, hour, minute)
            .ok_or_else(|| PromoError::UnparsableDate(text.trim().to_string()));
    }

    Ok(candidate)
}

/// Overwrite a matched span with spaces so later scans skip it.
fn blank_range(s: &mut String, range: std::ops::Range<usize>) {
    let blank = " ".repeat(range.len());
    s.replace_range(range, &blank);
}

/// Build the date as first-of-month plus (day − 1) days, so an overflowing
/// day rolls into the next month instead of failing.
fn construct_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> Option<NaiveDateTime> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let date = first + chrono::Duration::days(i64::from(day) - 1);
    date.and_hms_opt(hour, minute, 0)
}

/// Map a lowercased token to a month number (1-12).
fn month_from_token(s: &str) -> Option<u32> {
    match s {
        "january" | "jan" => Some(1),
        "february" | "feb" => Some(2),
        "march" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "may" => Some(5),
        "june" | "jun" => Some(6),
        "july" | "jul" => Some(7),
        "august" | "aug" => Some(8),
        "september" | "sep" | "sept" => Some(9),
        "october" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
