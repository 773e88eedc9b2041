//! The tracker context: activity log, baby profile and their storage.
//!
//! A [`Tracker`] is constructed once from a store and handed to whatever
//! needs it. Log mutations apply in memory first and then write through;
//! the write outcome travels back in a [`WriteThrough`] and never undoes the
//! in-memory change. Profile updates are explicit user saves and only apply
//! once the write succeeded.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use thiserror::Error;

use crate::activity::{Activity, RawActivity, parse_all};
use crate::activity_type::ActivityType;
use crate::log::ActivityLog;
use crate::storage::{ACTIVITIES_KEY, BABY_NAME_KEY, FEEDING_TYPE_KEY, KeyValueStore, StorageError};
use crate::summary::{
    DAYS_PER_WEEK, DaySummary, WeekOffset, WeekPoint, summarize_day, summarize_today, week_series,
};
use crate::types::{FeedingType, ValidationError};

/// Errors from tracker operations that validate before writing.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Who is being tracked and which feeding rows to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BabyProfile {
    pub name: Option<String>,
    pub feeding_type: FeedingType,
}

/// Result of a mutation that was applied in memory before being persisted.
#[derive(Debug)]
#[must_use = "the persistence outcome should be checked or explicitly ignored"]
pub struct WriteThrough<T> {
    /// What the in-memory transition produced.
    pub value: T,
    /// Whether the write-through to storage succeeded.
    pub persisted: Result<(), StorageError>,
}

impl<T> WriteThrough<T> {
    /// Treats a failed write as an error, discarding the value.
    pub fn into_result(self) -> Result<T, StorageError> {
        self.persisted.map(|()| self.value)
    }
}

/// Application state for one baby.
#[derive(Debug)]
pub struct Tracker<S> {
    store: S,
    log: ActivityLog,
    profile: BabyProfile,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Loads the log and profile from `store`.
    ///
    /// Never fails: missing, unreadable or corrupt values fall back to
    /// defaults and are logged.
    pub fn load(store: S) -> Self {
        let log = load_log(&store);
        let profile = load_profile(&store);
        tracing::debug!(
            activities = log.len(),
            feeding_type = %profile.feeding_type,
            "loaded tracker state"
        );
        Self {
            store,
            log,
            profile,
        }
    }

    /// Activities in display order (newest insertion first).
    pub fn activities(&self) -> &[Activity] {
        self.log.activities()
    }

    pub const fn profile(&self) -> &BabyProfile {
        &self.profile
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Logs an activity at `timestamp`, or now when `None`.
    pub fn add(
        &mut self,
        kind: ActivityType,
        timestamp: Option<DateTime<Utc>>,
    ) -> WriteThrough<Activity> {
        let activity = self.log.add(kind, timestamp.unwrap_or_else(Utc::now));
        tracing::debug!(id = %activity.id, kind = %kind, "activity added");
        WriteThrough {
            value: activity,
            persisted: self.persist_log(),
        }
    }

    /// Deletes the activity with `id`; a missing id is a no-op.
    pub fn remove(&mut self, id: &str) -> WriteThrough<Option<Activity>> {
        let Some(removed) = self.log.remove(id) else {
            tracing::debug!(id, "no activity to remove");
            return WriteThrough {
                value: None,
                persisted: Ok(()),
            };
        };
        tracing::debug!(id, "activity removed");
        WriteThrough {
            value: Some(removed),
            persisted: self.persist_log(),
        }
    }

    /// The full log, unmodified, for serialization.
    pub fn export_all(&self) -> Vec<Activity> {
        self.log.activities().to_vec()
    }

    /// Replaces the whole log with `records`.
    ///
    /// Every record is validated first; one bad record rejects the import and
    /// leaves the current log untouched.
    pub fn import_all(
        &mut self,
        records: Vec<RawActivity>,
    ) -> Result<WriteThrough<usize>, ValidationError> {
        let activities = parse_all(records)?;
        let count = activities.len();
        self.log.replace(activities);
        tracing::debug!(count, "activity log replaced by import");
        Ok(WriteThrough {
            value: count,
            persisted: self.persist_log(),
        })
    }

    /// Empties the log and deletes its persisted copy.
    pub fn clear_all(&mut self) -> WriteThrough<usize> {
        let count = self.log.len();
        self.log.clear();
        let persisted = self.store.remove(ACTIVITIES_KEY);
        if let Err(err) = &persisted {
            tracing::warn!(error = %err, "failed to remove persisted activity log");
        }
        WriteThrough {
            value: count,
            persisted,
        }
    }

    /// Saves the baby's display name.
    pub fn set_name(&mut self, name: &str) -> Result<(), TrackerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "name" }.into());
        }
        self.store.set(BABY_NAME_KEY, name)?;
        self.profile.name = Some(name.to_string());
        Ok(())
    }

    /// Saves the feeding type preference.
    pub fn set_feeding_type(&mut self, feeding_type: FeedingType) -> Result<(), StorageError> {
        self.store.set(FEEDING_TYPE_KEY, feeding_type.as_str())?;
        self.profile.feeding_type = feeding_type;
        Ok(())
    }

    /// Summary of the day containing `now`.
    pub fn today<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DaySummary {
        summarize_today(self.activities(), now)
    }

    /// Summary of a given local day.
    pub fn day<Tz: TimeZone>(&self, day: NaiveDate, now: &DateTime<Tz>) -> DaySummary {
        summarize_day(self.activities(), day, now)
    }

    /// Seven-day chart data.
    pub fn week<Tz: TimeZone>(
        &self,
        offset: WeekOffset,
        now: &DateTime<Tz>,
    ) -> [WeekPoint; DAYS_PER_WEEK] {
        week_series(self.activities(), offset, now)
    }

    fn persist_log(&mut self) -> Result<(), StorageError> {
        let result = serde_json::to_string(self.log.activities())
            .map_err(|source| StorageError::Encode {
                key: ACTIVITIES_KEY.to_string(),
                source,
            })
            .and_then(|json| self.store.set(ACTIVITIES_KEY, &json));
        if let Err(err) = &result {
            tracing::warn!(error = %err, "failed to persist activity log");
        }
        result
    }
}

fn load_log<S: KeyValueStore>(store: &S) -> ActivityLog {
    let raw = match store.get(ACTIVITIES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return ActivityLog::new(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to read activity log, starting empty");
            return ActivityLog::new();
        }
    };

    let records: Vec<RawActivity> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(source) => {
            let err = StorageError::Corrupt {
                key: ACTIVITIES_KEY.to_string(),
                source,
            };
            tracing::warn!(error = %err, "discarding unreadable activity log");
            return ActivityLog::new();
        }
    };

    // Skip individual bad records rather than losing the whole history.
    let mut activities = Vec::with_capacity(records.len());
    for record in records {
        match record.parse() {
            Ok(activity) => activities.push(activity),
            Err(err) => tracing::warn!(error = %err, "skipping invalid stored activity"),
        }
    }
    ActivityLog::from_activities(activities)
}

fn load_profile<S: KeyValueStore>(store: &S) -> BabyProfile {
    let name = match store.get(BABY_NAME_KEY) {
        Ok(name) => name.filter(|n| !n.trim().is_empty()),
        Err(err) => {
            tracing::warn!(error = %err, "failed to read baby name");
            None
        }
    };

    let feeding_type = match store.get(FEEDING_TYPE_KEY) {
        Ok(Some(raw)) => raw.parse::<FeedingType>().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring stored feeding type");
            FeedingType::default()
        }),
        Ok(None) => FeedingType::default(),
        Err(err) => {
            tracing::warn!(error = %err, "failed to read feeding type");
            FeedingType::default()
        }
    };

    BabyProfile { name, feeding_type }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::RawTimestamp;
    use crate::storage::MemoryStore;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn reload(tracker: Tracker<MemoryStore>) -> Tracker<MemoryStore> {
        Tracker::load(tracker.into_store())
    }

    #[test]
    fn load_from_empty_store_uses_defaults() {
        let tracker = Tracker::load(MemoryStore::new());
        assert!(tracker.activities().is_empty());
        assert_eq!(tracker.profile(), &BabyProfile::default());
    }

    #[test]
    fn add_persists_and_reloads() {
        let mut tracker = Tracker::load(MemoryStore::new());
        let first = tracker
            .add(ActivityType::Poop, Some(at("2025-01-29T08:00:00Z")))
            .into_result()
            .unwrap();
        let second = tracker
            .add(ActivityType::SleepStart, Some(at("2025-01-29T09:00:00Z")))
            .into_result()
            .unwrap();

        let tracker = reload(tracker);
        assert_eq!(tracker.activities(), &[second, first]);
    }

    #[test]
    fn add_defaults_to_now() {
        let mut tracker = Tracker::load(MemoryStore::new());
        let before = Utc::now() - chrono::TimeDelta::milliseconds(1);
        let activity = tracker.add(ActivityType::Pee, None).value;
        assert!(activity.timestamp >= before);
        assert!(activity.timestamp <= Utc::now());
    }

    #[test]
    fn failed_write_keeps_in_memory_change() {
        let mut store = MemoryStore::new();
        store.set_reject_writes(true);
        let mut tracker = Tracker::load(store);

        let outcome = tracker.add(ActivityType::Bottle, Some(at("2025-01-29T08:00:00Z")));
        assert!(outcome.persisted.is_err());
        assert_eq!(tracker.activities(), &[outcome.value]);

        // Nothing reached storage.
        let tracker = reload(tracker);
        assert!(tracker.activities().is_empty());
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let mut tracker = Tracker::load(MemoryStore::new());
        let _ = tracker.add(ActivityType::Poop, Some(at("2025-01-29T08:00:00Z")));
        let before = tracker.export_all();

        let outcome = tracker.remove("missing");
        assert!(outcome.value.is_none());
        assert!(outcome.persisted.is_ok());
        assert_eq!(tracker.export_all(), before);
    }

    #[test]
    fn remove_persists() {
        let mut tracker = Tracker::load(MemoryStore::new());
        let added = tracker
            .add(ActivityType::Poop, Some(at("2025-01-29T08:00:00Z")))
            .value;

        let removed = tracker.remove(added.id.as_str()).into_result().unwrap();
        assert_eq!(removed, Some(added));
        assert!(reload(tracker).activities().is_empty());
    }

    #[test]
    fn import_export_roundtrip() {
        let logs: Vec<Vec<(ActivityType, &str)>> = vec![
            vec![],
            vec![(ActivityType::Breast, "2025-01-29T08:00:00.250Z")],
            vec![
                (ActivityType::SleepStart, "2025-01-28T21:00:00Z"),
                (ActivityType::SleepEnd, "2025-01-29T05:30:00Z"),
                (ActivityType::Pee, "2025-01-29T05:31:00Z"),
            ],
        ];

        for entries in logs {
            let mut source = Tracker::load(MemoryStore::new());
            for (kind, ts) in entries {
                let _ = source.add(kind, Some(at(ts)));
            }
            let exported = source.export_all();
            let json = serde_json::to_string(&exported).unwrap();
            let records: Vec<RawActivity> = serde_json::from_str(&json).unwrap();

            let mut target = Tracker::load(MemoryStore::new());
            let _ = target.add(ActivityType::Poop, Some(at("2020-01-01T00:00:00Z")));
            let count = target.import_all(records).unwrap().into_result().unwrap();

            assert_eq!(count, exported.len());
            assert_eq!(target.export_all(), exported);
            assert_eq!(reload(target).export_all(), exported);
        }
    }

    #[test]
    fn invalid_import_leaves_log_untouched() {
        let mut tracker = Tracker::load(MemoryStore::new());
        let _ = tracker.add(ActivityType::Poop, Some(at("2025-01-29T08:00:00Z")));
        let before = tracker.export_all();

        let records = vec![
            RawActivity {
                id: "ok".into(),
                kind: "pee".into(),
                timestamp: RawTimestamp::Millis(1_738_152_000_000),
            },
            RawActivity {
                id: "bad".into(),
                kind: "pee".into(),
                timestamp: RawTimestamp::Text("not a time".into()),
            },
        ];
        assert!(tracker.import_all(records).is_err());
        assert_eq!(tracker.export_all(), before);
    }

    #[test]
    fn clear_all_removes_persisted_log() {
        let mut tracker = Tracker::load(MemoryStore::new());
        let _ = tracker.add(ActivityType::Poop, Some(at("2025-01-29T08:00:00Z")));
        tracker.set_name("Ada").unwrap();

        let cleared = tracker.clear_all().into_result().unwrap();
        assert_eq!(cleared, 1);
        assert!(tracker.activities().is_empty());
        assert_eq!(tracker.store().get(ACTIVITIES_KEY).unwrap(), None);
        // Profile survives.
        assert_eq!(reload(tracker).profile().name.as_deref(), Some("Ada"));
    }

    #[test]
    fn set_name_validates_before_writing() {
        let mut tracker = Tracker::load(MemoryStore::new());
        let err = tracker.set_name("   ").unwrap_err();
        assert!(matches!(
            err,
            TrackerError::Validation(ValidationError::Empty { field: "name" })
        ));
        assert!(tracker.store().is_empty());

        tracker.set_name("  Ada ").unwrap();
        assert_eq!(tracker.profile().name.as_deref(), Some("Ada"));
    }

    #[test]
    fn profile_save_failure_is_surfaced_without_change() {
        let mut store = MemoryStore::new();
        store.set_reject_writes(true);
        let mut tracker = Tracker::load(store);

        assert!(matches!(
            tracker.set_name("Ada"),
            Err(TrackerError::Storage(_))
        ));
        assert!(tracker.set_feeding_type(FeedingType::Bottle).is_err());
        assert_eq!(tracker.profile(), &BabyProfile::default());
    }

    #[test]
    fn profile_roundtrips_through_store() {
        let mut tracker = Tracker::load(MemoryStore::new());
        tracker.set_name("Ada").unwrap();
        tracker.set_feeding_type(FeedingType::Breast).unwrap();

        let tracker = reload(tracker);
        assert_eq!(
            tracker.profile(),
            &BabyProfile {
                name: Some("Ada".into()),
                feeding_type: FeedingType::Breast,
            }
        );
    }

    #[test]
    fn corrupt_values_load_as_defaults() {
        let mut store = MemoryStore::new();
        store.set(ACTIVITIES_KEY, "{not json").unwrap();
        store.set(FEEDING_TYPE_KEY, "formula").unwrap();

        let tracker = Tracker::load(store);
        assert!(tracker.activities().is_empty());
        assert_eq!(tracker.profile().feeding_type, FeedingType::Mixed);
    }

    #[test]
    fn stored_log_accepts_epoch_millis_and_skips_bad_records() {
        let mut store = MemoryStore::new();
        store
            .set(
                ACTIVITIES_KEY,
                r#"[
                    {"id":"1738152000000-poop","type":"poop","timestamp":1738152000000},
                    {"id":"x","type":"nap","timestamp":1738152000000}
                ]"#,
            )
            .unwrap();

        let tracker = Tracker::load(store);
        assert_eq!(tracker.activities().len(), 1);
        assert_eq!(tracker.activities()[0].timestamp, at("2025-01-29T12:00:00Z"));
    }

    #[test]
    fn summaries_read_the_log() {
        let mut tracker = Tracker::load(MemoryStore::new());
        let _ = tracker.add(ActivityType::SleepStart, Some(at("2025-01-29T08:00:00Z")));
        let _ = tracker.add(ActivityType::SleepEnd, Some(at("2025-01-29T09:30:00Z")));
        let _ = tracker.add(ActivityType::Poop, Some(at("2025-01-29T10:00:00Z")));

        let now = at("2025-01-29T12:00:00Z");
        let today = tracker.today(&now);
        assert_eq!(today.sleep_minutes, 90);
        assert_eq!(today.poop, 1);
        assert_eq!(tracker.day(now.date_naive(), &now), today);
        assert_eq!(tracker.week(WeekOffset::CURRENT, &now)[6].poop, 1);
    }
}
