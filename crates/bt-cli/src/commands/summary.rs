//! Day summary command, shared by `today` and `day`.

use std::io::Write;

use anyhow::Result;
use bt_core::{BabyProfile, DaySummary, KeyValueStore, Tracker};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use super::util::format_minutes;

/// JSON output for one day.
#[derive(Debug, Serialize)]
struct DayReport<'a> {
    date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(flatten)]
    summary: DaySummary,
    feedings: u32,
    sleep_hours: f64,
}

pub fn run<W: Write, S: KeyValueStore>(
    writer: &mut W,
    tracker: &Tracker<S>,
    day: NaiveDate,
    json: bool,
    now: &DateTime<Local>,
) -> Result<DaySummary> {
    let summary = tracker.day(day, now);
    let profile = tracker.profile();

    if json {
        let report = DayReport {
            date: day,
            name: profile.name.as_deref(),
            summary,
            feedings: summary.feedings(),
            sleep_hours: summary.sleep_hours(),
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write_text(writer, profile, day, &summary, now)?;
    }

    Ok(summary)
}

fn write_text<W: Write>(
    writer: &mut W,
    profile: &BabyProfile,
    day: NaiveDate,
    summary: &DaySummary,
    now: &DateTime<Local>,
) -> Result<()> {
    let today = now.date_naive();
    let suffix = if day == today { " (today)" } else { "" };
    writeln!(writer, "{}{suffix}", day.format("%A, %B %-d, %Y"))?;
    if let Some(name) = &profile.name {
        writeln!(writer, "Baby: {name}")?;
    }
    writeln!(writer)?;

    let feeding = profile.feeding_type;
    writeln!(writer, "Poop           {}", summary.poop)?;
    writeln!(writer, "Pee            {}", summary.pee)?;
    if feeding.shows_breast() {
        writeln!(writer, "Breastfeeding  {}", summary.breast)?;
    }
    if feeding.shows_bottle() {
        writeln!(writer, "Bottle         {}", summary.bottle)?;
    }
    writeln!(writer, "Sleep          {}", format_minutes(summary.sleep_minutes))?;

    if day == today {
        if let Some(start) = summary.last_sleep_start {
            writeln!(writer)?;
            writeln!(writer, "{}", sleeping_since(start, now))?;
        }
    }

    Ok(())
}

/// "Sleeping since 21:00 (1h 15m)", with the date when it began on another day.
fn sleeping_since(start: DateTime<Utc>, now: &DateTime<Local>) -> String {
    let local_start = start.with_timezone(&Local);
    let started = if local_start.date_naive() == now.date_naive() {
        local_start.format("%H:%M").to_string()
    } else {
        local_start.format("%Y-%m-%d %H:%M").to_string()
    };
    let elapsed = (now.with_timezone(&Utc) - start).num_minutes();
    format!("Sleeping since {started} ({})", format_minutes(elapsed))
}
