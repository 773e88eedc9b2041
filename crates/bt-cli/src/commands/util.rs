//! Shared utilities for CLI commands.

use std::io::{self, Write};
use std::sync::LazyLock;

use anyhow::Context;
use bt_core::StorageError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use regex::Regex;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse the time an activity happened.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - Local date and time: "2026-01-15 10:30"
/// - Local time today: "10:30"
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(s: &str, now: &DateTime<Local>) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return local_to_utc(naive);
    }

    if let Ok(time) = NaiveTime::parse_from_str(s, "%H:%M") {
        return local_to_utc(now.date_naive().and_time(time));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid time: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z), local 'YYYY-MM-DD HH:MM', 'HH:MM' for today, or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    let duration = TimeDelta::minutes(n * minutes_per_unit);
    Ok(now.with_timezone(&Utc) - duration)
}

fn local_to_utc(naive: NaiveDateTime) -> anyhow::Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("{naive} does not exist in the local time zone"))
}

/// Parse a calendar day: "today", "yesterday", or "YYYY-MM-DD".
pub fn parse_day(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    match s.trim() {
        "today" => Ok(today),
        "yesterday" => today.pred_opt().context("date out of range"),
        other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
            .with_context(|| format!("invalid day: {other}, expected YYYY-MM-DD")),
    }
}

/// Formats minutes as duration string.
/// Returns "Xh Ym" if >= 1 hour, "Xm" if < 1 hour.
/// Negative durations are treated as 0m.
pub fn format_minutes(minutes: i64) -> String {
    if minutes < 0 {
        return "0m".to_string();
    }
    let hours = minutes / 60;
    let minutes = minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Generates a 10-character bar.
/// Values <5% of max get a single block for visibility.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value / max;
    let filled = if ratio < 0.05 && value > 0.0 {
        1
    } else {
        (ratio * 10.0).round().clamp(0.0, 10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Local date and time of an instant, e.g. `2025-01-29 08:00`.
pub fn format_local(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Reports a write-through failure without failing the command.
///
/// The change was applied in memory, so the command still succeeds.
pub fn report_unsaved<W: Write>(
    writer: &mut W,
    persisted: Result<(), StorageError>,
) -> io::Result<()> {
    if let Err(err) = persisted {
        tracing::warn!(error = %err, "change was applied but not saved");
        writeln!(writer, "Warning: change was not saved: {err}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(s: &str) -> DateTime<Local> {
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
        Local.from_local_datetime(&naive).unwrap()
    }

    #[test]
    fn test_parse_datetime_rfc3339() {
        let now = local("2025-01-29 12:00");
        let parsed = parse_datetime("2025-01-29T08:00:00Z", &now).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-01-29T08:00:00+00:00");
    }

    #[test]
    fn test_parse_datetime_local_forms() {
        let now = local("2025-01-29 12:00");

        let full = parse_datetime("2025-01-28 21:15", &now).unwrap();
        assert_eq!(full, local("2025-01-28 21:15").with_timezone(&Utc));

        let time_only = parse_datetime("07:45", &now).unwrap();
        assert_eq!(time_only, local("2025-01-29 07:45").with_timezone(&Utc));
    }

    #[test]
    fn test_parse_datetime_relative() {
        let now = local("2025-01-29 12:00");
        let parsed = parse_datetime("90 minutes ago", &now).unwrap();
        assert_eq!(parsed, local("2025-01-29 10:30").with_timezone(&Utc));

        let parsed = parse_datetime("1 day ago", &now).unwrap();
        assert_eq!(parsed, local("2025-01-28 12:00").with_timezone(&Utc));
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        let now = local("2025-01-29 12:00");
        assert!(parse_datetime("after lunch", &now).is_err());
        assert!(parse_datetime("999999999999 weeks ago", &now).is_err());
    }

    #[test]
    fn test_parse_day() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(parse_day("today", today).unwrap(), today);
        assert_eq!(
            parse_day("yesterday", today).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert_eq!(
            parse_day("2024-12-31", today).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
        assert!(parse_day("31/12/2024", today).is_err());
    }

    // ========== Duration Formatting Tests ==========

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(150), "2h 30m");
        assert_eq!(format_minutes(60), "1h 0m");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(-5), "0m");
    }

    // ========== Progress Bar Tests ==========

    #[test]
    fn test_progress_bar_full() {
        assert_eq!(progress_bar(14.0, 14.0), "██████████");
    }

    #[test]
    fn test_progress_bar_partial() {
        assert_eq!(progress_bar(7.0, 14.0), "█████░░░░░");
        assert_eq!(progress_bar(2.0, 10.0), "██░░░░░░░░");
    }

    #[test]
    fn test_progress_bar_minimum() {
        assert_eq!(progress_bar(0.4, 10.0), "█░░░░░░░░░");
    }

    #[test]
    fn test_progress_bar_empty() {
        assert_eq!(progress_bar(0.0, 1.0), "░░░░░░░░░░");
        assert_eq!(progress_bar(0.0, 0.0), "░░░░░░░░░░");
    }
}
