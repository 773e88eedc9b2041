//! Log command for adding an activity.

use std::io::Write;

use anyhow::Result;
use bt_core::{Activity, ActivityType, KeyValueStore, Tracker};
use chrono::{DateTime, Local, Utc};

use super::util::{format_local, parse_datetime, report_unsaved};

pub fn run<W: Write, S: KeyValueStore>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    kind: ActivityType,
    at: Option<&str>,
    now: &DateTime<Local>,
) -> Result<Activity> {
    let timestamp = match at {
        Some(at) => parse_datetime(at, now)?,
        None => now.with_timezone(&Utc),
    };

    let outcome = tracker.add(kind, Some(timestamp));
    let activity = outcome.value;
    writeln!(
        writer,
        "Logged {} at {} (id {})",
        kind.label(),
        format_local(&activity.timestamp),
        activity.id
    )?;
    report_unsaved(writer, outcome.persisted)?;
    Ok(activity)
}
