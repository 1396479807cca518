/*!
 * SRT timestamp conversions.
 *
 * Timestamps travel through the toolkit verbatim as `HH:MM:SS,mmm` strings and
 * are only converted to seconds when arithmetic is needed (CPS, durations,
 * split boundaries).
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::SubtitleError;

// Hours may exceed two digits for very long media; milliseconds are optional
// so that manual split markers can be typed as plain `HH:MM:SS`.
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,3}):([0-5]\d):([0-5]\d)(?:[,.](\d{3}))?$").unwrap()
});

/// Parse a timestamp into whole milliseconds
pub fn parse_timestamp_ms(timestamp: &str) -> Result<u64, SubtitleError> {
    let trimmed = timestamp.trim();
    let caps = TIMESTAMP_REGEX
        .captures(trimmed)
        .ok_or_else(|| SubtitleError::InvalidTimestamp(timestamp.to_string()))?;

    let field = |idx: usize| -> u64 {
        caps.get(idx)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    Ok(field(1) * 3_600_000 + field(2) * 60_000 + field(3) * 1_000 + field(4))
}

/// Parse a timestamp into seconds, failing on malformed input
pub fn parse_timestamp(timestamp: &str) -> Result<f64, SubtitleError> {
    parse_timestamp_ms(timestamp).map(|ms| ms as f64 / 1000.0)
}

/// Parse a timestamp into seconds.
///
/// Empty or malformed input yields `0.0`. Use [`parse_timestamp`] when a
/// corrupt timestamp must not be mistaken for the start of the file.
pub fn time_to_seconds(timestamp: &str) -> f64 {
    parse_timestamp(timestamp).unwrap_or(0.0)
}

/// Format milliseconds as `HH:MM:SS,mmm`
pub fn millis_to_time(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Format seconds as `HH:MM:SS,mmm`, rounding to the nearest millisecond.
/// Negative and non-finite inputs format as zero.
pub fn seconds_to_time(seconds: f64) -> String {
    millis_to_time(to_millis(seconds))
}

/// Format a duration as `HH:MM:SS`, dropping the fractional second
pub fn format_duration_hms(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// The `HH:MM:SS` part of an SRT timestamp
pub fn strip_millis(timestamp: &str) -> &str {
    timestamp.split([',', '.']).next().unwrap_or(timestamp).trim()
}

fn to_millis(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}
