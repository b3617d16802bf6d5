//! Countdown display computation.
//!
//! A pure function from `(now, target, raw text)` to the strings a page (or
//! the CLI) shows for one countdown. Rendering side effects live with the
//! caller; this module only does arithmetic and formatting, so every state
//! is testable without a clock or a timer.

use chrono::NaiveDateTime;
use serde::Serialize;

/// Fixed diagnostic shown when the authored date text cannot be parsed.
pub const INVALID_DATE_MESSAGE: &str = "Invalid date. Use e.g. \"2nd March\" or \"March 2\".";

/// What a countdown shows at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    /// Zero-padded `"HH : MM : SS"`. Hours accumulate across days (no cap
    /// at 24). Exactly `"00 : 00 : 00"` once the target has passed.
    pub remaining: String,
    /// Status label: `"Counting down to <raw text>"` before the target,
    /// `"Event started"` after.
    pub label: String,
    /// Whether the target instant has been reached.
    pub expired: bool,
}

/// Compute the display state for one countdown at one instant.
///
/// Whole seconds only: the sub-second remainder of `target − now` is
/// discarded every call (floor division), so a displayed value can hold for
/// up to a second before decrementing. Once `now` reaches the target the
/// result is the stable terminal state on every subsequent call.
pub fn display_state(now: NaiveDateTime, target: NaiveDateTime, raw_text: &str) -> DisplayState {
    let remaining_secs = (target - now).num_seconds();

    if remaining_secs <= 0 {
        return DisplayState {
            remaining: "00 : 00 : 00".to_string(),
            label: "Event started".to_string(),
            expired: true,
        };
    }

    let hours = remaining_secs / 3600;
    let minutes = (remaining_secs % 3600) / 60;
    let seconds = remaining_secs % 60;

    DisplayState {
        remaining: format!("{hours:02} : {minutes:02} : {seconds:02}"),
        label: format!("Counting down to {}", raw_text.trim()),
        expired: false,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
