//! Export command for writing every activity as a report or JSON.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use bt_core::{Activity, KeyValueStore, Tracker};
use chrono::{DateTime, FixedOffset, Local, SecondsFormat};

/// Everything the text export shows.
#[derive(Debug)]
pub struct ExportData {
    pub name: Option<String>,
    pub exported_at: DateTime<Local>,
    pub timezone: String,
    pub activities: Vec<Activity>,
}

/// Writes the human-readable export.
///
/// A header with the baby's name, export time and total, then one line per
/// activity in log order: label, type, local date, local time, and the stored
/// UTC timestamp.
pub fn write_report<W: Write>(writer: &mut W, data: &ExportData) -> std::io::Result<()> {
    writeln!(writer, "BABY ACTIVITY EXPORT")?;
    writeln!(
        writer,
        "Name: {}",
        data.name.as_deref().unwrap_or("(not set)")
    )?;
    writeln!(
        writer,
        "Exported: {} ({})",
        data.exported_at.format("%Y-%m-%d %H:%M"),
        data.timezone
    )?;
    writeln!(writer, "Total activities: {}", data.activities.len())?;
    writeln!(writer)?;

    let label_width = data
        .activities
        .iter()
        .map(|a| a.kind.label().len() + a.kind.as_str().len() + 3)
        .max()
        .unwrap_or(0);

    for activity in &data.activities {
        let local = activity.timestamp.with_timezone(&Local);
        let label = format!("{} ({})", activity.kind.label(), activity.kind);
        writeln!(
            writer,
            "{label:<label_width$}  {}  {}  {}",
            local.format("%Y-%m-%d"),
            local.format("%H:%M"),
            activity
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        )?;
    }

    Ok(())
}

/// Labels the zone rows are rendered in, e.g. `Europe/London, UTC+01:00`.
///
/// `TZ` takes precedence over the system zone, matching how local times are
/// resolved. The offset is the one in effect at export time.
fn describe_zone(tz_var: Option<String>, system: Option<String>, offset: FixedOffset) -> String {
    let name = tz_var
        .map(|tz| tz.trim_start_matches(':').to_string())
        .filter(|tz| !tz.is_empty() && !tz.starts_with('/'))
        .or(system);
    match name {
        Some(name) => format!("{name}, UTC{offset}"),
        None => format!("UTC{offset}"),
    }
}

pub fn run<W: Write, S: KeyValueStore>(
    writer: &mut W,
    tracker: &Tracker<S>,
    output: Option<&Path>,
    json: bool,
    now: &DateTime<Local>,
) -> Result<usize> {
    let activities = tracker.export_all();
    if activities.is_empty() {
        bail!("no activities to export");
    }
    let count = activities.len();

    let mut rendered: Vec<u8> = Vec::new();
    if json {
        serde_json::to_writer_pretty(&mut rendered, &activities)?;
        writeln!(rendered)?;
    } else {
        let data = ExportData {
            name: tracker.profile().name.clone(),
            exported_at: *now,
            timezone: describe_zone(
                std::env::var("TZ").ok(),
                iana_time_zone::get_timezone().ok(),
                *now.offset(),
            ),
            activities,
        };
        write_report(&mut rendered, &data)?;
    }

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("failed to write export to {}", path.display()))?;
            tracing::debug!(count, path = %path.display(), "exported activities");
            writeln!(writer, "Exported {count} activities to {}", path.display())?;
        }
        None => writer.write_all(&rendered)?,
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    use bt_core::{ActivityType, MemoryStore, RawActivity};
    use insta::assert_snapshot;

    use crate::commands::testing::{instant, local, render, tracker};

    fn seeded() -> Tracker<MemoryStore> {
        let mut tracker = tracker();
        for (kind, at) in [
            (ActivityType::SleepStart, "2025-01-28 21:00"),
            (ActivityType::Poop, "2025-01-29 07:10"),
        ] {
            tracker.add(kind, Some(instant(at))).into_result().unwrap();
        }
        tracker
    }

    #[test]
    fn text_report_layout() {
        let tracker = seeded();
        let data = ExportData {
            name: Some("Ada".to_string()),
            exported_at: local("2025-01-29 12:00"),
            timezone: "Test/Zone".to_string(),
            activities: tracker.export_all(),
        };

        let output = render(|out| write_report(out, &data).unwrap());
        let output = tracker.activities().iter().fold(output, |acc, a| {
            acc.replace(
                &a.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
                "<utc>",
            )
        });

        assert_snapshot!(output, @r"
        BABY ACTIVITY EXPORT
        Name: Ada
        Exported: 2025-01-29 12:00 (Test/Zone)
        Total activities: 2

        Poop (poop)                2025-01-29  07:10  <utc>
        Fell asleep (sleep_start)  2025-01-28  21:00  <utc>
        ");
    }

    #[test]
    fn zone_label_follows_tz_variable() {
        let bst = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(
            describe_zone(
                Some("Europe/London".to_string()),
                Some("Etc/UTC".to_string()),
                bst
            ),
            "Europe/London, UTC+01:00"
        );
        assert_eq!(
            describe_zone(None, Some("Etc/UTC".to_string()), FixedOffset::east_opt(0).unwrap()),
            "Etc/UTC, UTC+00:00"
        );
        assert_eq!(
            describe_zone(Some(":/etc/localtime".to_string()), None, bst),
            "UTC+01:00"
        );
    }

    #[test]
    fn empty_log_is_an_error() {
        let tracker = tracker();
        let now = local("2025-01-29 12:00");

        let err = run(&mut std::io::sink(), &tracker, None, false, &now).unwrap_err();

        assert_eq!(err.to_string(), "no activities to export");
    }

    #[test]
    fn json_export_reimports_identically() {
        let tracker = seeded();
        let now = local("2025-01-29 12:00");

        let output = render(|out| {
            assert_eq!(run(out, &tracker, None, true, &now).unwrap(), 2);
        });

        let records: Vec<RawActivity> = serde_json::from_str(&output).unwrap();
        let mut restored = crate::commands::testing::tracker();
        let imported = restored.import_all(records).unwrap().into_result().unwrap();
        assert_eq!(imported, 2);
        assert_eq!(restored.activities(), tracker.activities());
    }

    #[test]
    fn writes_to_output_file() {
        let tracker = seeded();
        let now = local("2025-01-29 12:00");
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("export.txt");

        let output = render(|out| {
            run(out, &tracker, Some(&path), false, &now).unwrap();
        });

        assert_eq!(
            output,
            format!("Exported 2 activities to {}\n", path.display())
        );
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("BABY ACTIVITY EXPORT\nName: (not set)\n"));
        assert!(written.contains("Total activities: 2"));
    }

    #[test]
    fn unwritable_output_path_is_an_error() {
        let tracker = seeded();
        let now = local("2025-01-29 12:00");
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing").join("export.txt");

        let err = run(&mut std::io::sink(), &tracker, Some(&path), false, &now).unwrap_err();

        assert!(err.to_string().starts_with("failed to write export to"));
    }
}
