//! Clear command for deleting every activity.

use std::io::Write;

use anyhow::{Result, bail};
use bt_core::{KeyValueStore, Tracker};

use super::util::report_unsaved;

pub fn run<W: Write, S: KeyValueStore>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    confirmed: bool,
) -> Result<usize> {
    let count = tracker.activities().len();
    if !confirmed {
        bail!("refusing to delete {count} activities without --yes");
    }

    let outcome = tracker.clear_all();
    writeln!(writer, "Deleted {} activities", outcome.value)?;
    report_unsaved(writer, outcome.persisted)?;
    Ok(outcome.value)
}
