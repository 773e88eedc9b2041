//! Week command for the seven-day chart.

use std::io::Write;

use anyhow::{Result, bail};
use bt_core::summary::DAYS_PER_WEEK;
use bt_core::{KeyValueStore, Tracker, WeekOffset, WeekPoint, chart_max};
use chrono::{DateTime, Local};
use serde::Serialize;

use super::util::progress_bar;

/// JSON output for a week.
#[derive(Debug, Serialize)]
struct WeekReport<'a> {
    offset: WeekOffset,
    days: &'a [WeekPoint],
}

pub fn run<W: Write, S: KeyValueStore>(
    writer: &mut W,
    tracker: &Tracker<S>,
    requested: i64,
    json: bool,
    now: &DateTime<Local>,
) -> Result<[WeekPoint; DAYS_PER_WEEK]> {
    let offset = WeekOffset::from_signed(requested);
    let today = now.date_naive();
    if i64::from(offset.weeks_back()) != requested.max(0) || offset.first_day(today).is_none() {
        bail!("week offset {requested} is out of range");
    }
    let points = tracker.week(offset, now);

    if json {
        let report = WeekReport {
            offset,
            days: &points,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(points);
    }

    let first = &points[0];
    let last = &points[DAYS_PER_WEEK - 1];
    writeln!(
        writer,
        "WEEK: {} to {}",
        first.date.format("%b %-d"),
        last.date.format("%b %-d, %Y")
    )?;
    writeln!(writer)?;
    writeln!(writer, "DAY        POOP  PEE  FEEDS   SLEEP")?;

    let max = chart_max(points.iter().map(|p| p.sleep_hours));
    for point in &points {
        writeln!(
            writer,
            "{} {}  {:>4}  {:>3}  {:>5}  {:>5.1}h  {}",
            point.label,
            point.date.format("%m-%d"),
            point.poop,
            point.pee,
            point.feedings,
            point.sleep_hours,
            progress_bar(point.sleep_hours, max)
        )?;
    }

    let mut hints = Vec::new();
    let previous = offset.previous();
    if previous != offset && previous.first_day(today).is_some() {
        hints.push(format!(
            "Previous week: bt week --offset {}",
            previous.weeks_back()
        ));
    }
    if offset != WeekOffset::CURRENT {
        hints.push(format!(
            "Next week: bt week --offset {}",
            offset.next().weeks_back()
        ));
    }
    if !hints.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "{}", hints.join(" | "))?;
    }

    Ok(points)
}
