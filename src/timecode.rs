//! Timestamp conversion between seconds-based floats and SRT display form.

use crate::error::{Result, SubalignError};
use regex::Regex;
use std::sync::LazyLock;

static DISPLAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2,}:\d{2}:\d{2},\d{3}$").unwrap());

static LEGACY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})\.(\d)$").unwrap());

/// Format a seconds-based timestamp as `HH:MM:SS,mmm`.
///
/// Milliseconds are truncated, not rounded. Durations beyond 24 hours fold
/// into the hour field, so the hour component can exceed 24.
pub fn seconds_to_display(seconds: f64) -> String {
    let total_millis = (seconds * 1000.0) as u64;
    let total = total_millis / 1000;
    let millis = total_millis % 1000;
    let minutes = total / 60;
    let secs = total % 60;
    let hours = minutes / 60;
    let minutes = minutes % 60;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Normalize a legacy `M:SS.f` / `MM:SS.f` timestamp into `HH:MM:SS,mmm`.
///
/// Input already in display form is returned unchanged. The single tenths
/// digit is scaled to milliseconds (`4:36.4` becomes `00:04:36,400`).
/// Anything matching neither form is a hard error; we never guess.
pub fn normalize_legacy(value: &str) -> Result<String> {
    if DISPLAY_RE.is_match(value) {
        return Ok(value.to_string());
    }

    let captures = LEGACY_RE
        .captures(value)
        .ok_or_else(|| SubalignError::MalformedTimestamp(value.to_string()))?;

    // The regex only admits digit groups, so these parses cannot fail.
    let minutes: u32 = captures[1].parse().unwrap_or_default();
    let seconds = &captures[2];
    let tenths: u32 = captures[3].parse().unwrap_or_default();

    Ok(format!("00:{:02}:{},{:03}", minutes, seconds, tenths * 100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_to_display() {
        assert_eq!(seconds_to_display(0.0), "00:00:00,000");
        assert_eq!(seconds_to_display(3661.25), "01:01:01,250");
        assert_eq!(seconds_to_display(1.5), "00:00:01,500");
    }

    #[test]
    fn test_seconds_to_display_truncates_millis() {
        assert_eq!(seconds_to_display(0.9999), "00:00:00,999");
    }

    #[test]
    fn test_hours_fold_past_midnight() {
        assert_eq!(seconds_to_display(90000.0), "25:00:00,000");
    }

    #[test]
    fn test_normalize_legacy_form() {
        assert_eq!(normalize_legacy("04:36.4").unwrap(), "00:04:36,400");
        assert_eq!(normalize_legacy("4:36.4").unwrap(), "00:04:36,400");
        assert_eq!(normalize_legacy("00:00.7").unwrap(), "00:00:00,700");
    }

    #[test]
    fn test_normalize_zero_tenths() {
        assert_eq!(normalize_legacy("12:05.0").unwrap(), "00:12:05,000");
    }

    #[test]
    fn test_normalize_is_idempotent_on_display_form() {
        assert_eq!(normalize_legacy("00:04:36,400").unwrap(), "00:04:36,400");
        assert_eq!(normalize_legacy("25:00:00,000").unwrap(), "25:00:00,000");
    }

    #[test]
    fn test_normalize_rejects_malformed_input() {
        assert!(normalize_legacy("4.5").is_err());
        assert!(normalize_legacy("04:36.45").is_err());
        assert!(normalize_legacy("not a timestamp").is_err());
        assert!(normalize_legacy("00:04:36.400").is_err());
    }
}
