//! Profile command for the baby's name and feeding type.

use std::io::Write;

use anyhow::{Context, Result};
use bt_core::{FeedingType, KeyValueStore, Tracker};

pub fn run<W: Write, S: KeyValueStore>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    name: Option<&str>,
    feeding_type: Option<FeedingType>,
) -> Result<()> {
    if let Some(name) = name {
        tracker.set_name(name).context("failed to save name")?;
    }
    if let Some(feeding_type) = feeding_type {
        tracker
            .set_feeding_type(feeding_type)
            .context("failed to save feeding type")?;
    }

    let profile = tracker.profile();
    writeln!(
        writer,
        "Name:         {}",
        profile.name.as_deref().unwrap_or("(not set)")
    )?;
    writeln!(writer, "Feeding type: {}", profile.feeding_type)?;
    Ok(())
}
