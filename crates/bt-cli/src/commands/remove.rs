//! Remove command for deleting a single activity.

use std::io::Write;

use anyhow::Result;
use bt_core::{Activity, KeyValueStore, Tracker};

use super::util::{format_local, report_unsaved};

pub fn run<W: Write, S: KeyValueStore>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    id: &str,
) -> Result<Option<Activity>> {
    let outcome = tracker.remove(id);
    match &outcome.value {
        Some(removed) => writeln!(
            writer,
            "Removed {} at {}",
            removed.kind.label(),
            format_local(&removed.timestamp)
        )?,
        None => writeln!(writer, "No activity with id {id}")?,
    }
    report_unsaved(writer, outcome.persisted)?;
    Ok(outcome.value)
}
