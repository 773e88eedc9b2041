//! CLI subcommand implementations.
//!
//! Each command renders into a `Write` and takes the tracker plus the
//! current local time, so output is deterministic under test.

pub mod clear;
pub mod export;
pub mod import;
pub mod list;
pub mod log;
pub mod profile;
pub mod remove;
pub mod status;
pub mod summary;
pub mod util;
pub mod week;

#[cfg(test)]
pub(crate) mod testing {
    use bt_core::{MemoryStore, Tracker};
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

    /// A local time from `YYYY-MM-DD HH:MM`.
    pub fn local(s: &str) -> DateTime<Local> {
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
        Local.from_local_datetime(&naive).unwrap()
    }

    /// The UTC instant of a local `YYYY-MM-DD HH:MM`.
    pub fn instant(s: &str) -> DateTime<Utc> {
        local(s).with_timezone(&Utc)
    }

    pub fn tracker() -> Tracker<MemoryStore> {
        Tracker::load(MemoryStore::new())
    }

    pub fn render(f: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut output = Vec::new();
        f(&mut output);
        String::from_utf8(output).unwrap()
    }
}
