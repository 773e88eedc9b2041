//! Status command for showing what the tracker holds.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use bt_core::{KeyValueStore, Tracker};
use chrono::{DateTime, Local, Utc};

use super::util::{format_local, format_minutes};

pub fn run<W: Write, S: KeyValueStore>(
    writer: &mut W,
    tracker: &Tracker<S>,
    database_path: &Path,
    now: &DateTime<Local>,
) -> Result<()> {
    let profile = tracker.profile();

    writeln!(writer, "Baby tracker status")?;
    writeln!(writer, "Database: {}", database_path.display())?;
    writeln!(
        writer,
        "Baby: {}",
        profile.name.as_deref().unwrap_or("(not set)")
    )?;
    writeln!(writer, "Feeding type: {}", profile.feeding_type)?;

    let activities = tracker.activities();
    if activities.is_empty() {
        writeln!(writer, "No activities recorded.")?;
        return Ok(());
    }

    writeln!(writer, "Activities: {}", activities.len())?;
    if let Some(latest) = activities.iter().max_by_key(|a| a.timestamp) {
        writeln!(
            writer,
            "Latest: {} at {}",
            latest.kind.label(),
            format_local(&latest.timestamp)
        )?;
    }

    if let Some(start) = tracker.today(now).last_sleep_start {
        let elapsed = (now.with_timezone(&Utc) - start).num_minutes();
        writeln!(
            writer,
            "Sleeping since {} ({})",
            format_local(&start),
            format_minutes(elapsed)
        )?;
    }

    Ok(())
}
