//! List command for showing logged activities.

use std::io::Write;

use anyhow::Result;
use bt_core::{KeyValueStore, Tracker};

use super::util::format_local;

pub fn run<W: Write, S: KeyValueStore>(
    writer: &mut W,
    tracker: &Tracker<S>,
    limit: Option<usize>,
) -> Result<()> {
    let activities = tracker.activities();
    if activities.is_empty() {
        writeln!(writer, "No activities logged.")?;
        return Ok(());
    }

    let shown = limit.unwrap_or(activities.len()).min(activities.len());
    let id_width = activities[..shown]
        .iter()
        .map(|a| a.id.as_str().len())
        .max()
        .unwrap_or(0);

    for activity in &activities[..shown] {
        writeln!(
            writer,
            "{:<id_width$}  {}  {}",
            activity.id.as_str(),
            format_local(&activity.timestamp),
            activity.kind.label()
        )?;
    }

    if shown < activities.len() {
        writeln!(writer, "... {} more", activities.len() - shown)?;
    }

    Ok(())
}
