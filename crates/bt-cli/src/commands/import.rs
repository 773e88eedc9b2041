//! Import command for replacing the log from exported records.

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use bt_core::{KeyValueStore, RawActivity, Tracker};

use super::util::report_unsaved;

/// Reads `path` (or stdin for `-`) and replaces every activity with its records.
pub fn run<W: Write, S: KeyValueStore>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    path: &Path,
) -> Result<usize> {
    let records = if path == Path::new("-") {
        parse_records(io::stdin().lock())?
    } else {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        parse_records(file)?
    };
    import_records(writer, tracker, records)
}

/// Replaces the log with `records`, all or nothing.
pub fn import_records<W: Write, S: KeyValueStore>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    records: Vec<RawActivity>,
) -> Result<usize> {
    let previous = tracker.activities().len();
    let outcome = tracker
        .import_all(records)
        .context("import rejected, existing activities were kept")?;

    writeln!(
        writer,
        "Imported {} activities (replaced {previous})",
        outcome.value
    )?;
    report_unsaved(writer, outcome.persisted)?;
    Ok(outcome.value)
}

/// Parses a JSON array of records, or one record per line.
fn parse_records<R: Read>(mut reader: R) -> Result<Vec<RawActivity>> {
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .context("failed to read import data")?;

    if input.trim_start().starts_with('[') {
        return serde_json::from_str(&input).context("invalid JSON array of activities");
    }

    let mut records = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record: RawActivity = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid JSON on line {}", idx + 1))?;
        records.push(record);
    }
    Ok(records)
}
