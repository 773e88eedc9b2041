//! Logged activities and their wire representation.

use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::activity_type::ActivityType;
use crate::types::{ActivityId, ValidationError};

/// A single logged event: a diaper change, a feeding, or a sleep transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique identifier within the log.
    pub id: ActivityId,
    /// What happened.
    #[serde(rename = "type")]
    pub kind: ActivityType,
    /// When it happened.
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    /// Creates an activity with an id derived from `(timestamp, kind)`.
    ///
    /// The timestamp is truncated to millisecond precision, which is the
    /// resolution the id encodes.
    pub fn new(kind: ActivityType, timestamp: DateTime<Utc>) -> Self {
        let timestamp = timestamp.trunc_subsecs(3);
        Self {
            id: derive_id(timestamp, kind),
            kind,
            timestamp,
        }
    }
}

/// Builds the canonical id for an activity: `{epoch_millis}-{type}`.
pub fn derive_id(timestamp: DateTime<Utc>, kind: ActivityType) -> ActivityId {
    // Never empty: the type tag alone is non-empty.
    ActivityId(format!("{}-{kind}", timestamp.timestamp_millis()))
}

/// A timestamp as found in stored or imported data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Milliseconds since the Unix epoch.
    Millis(i64),
    /// An RFC 3339 string.
    Text(String),
}

/// An activity record before validation.
///
/// Used when loading the persisted log and when importing, so that type tags
/// and timestamps are re-parsed rather than trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawActivity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: RawTimestamp,
}

impl RawActivity {
    /// Validates the record into an [`Activity`].
    pub fn parse(self) -> Result<Activity, ValidationError> {
        let kind: ActivityType = self.kind.parse()?;
        let timestamp = match &self.timestamp {
            RawTimestamp::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc)),
        };
        let Some(timestamp) = timestamp else {
            return Err(ValidationError::InvalidTimestamp {
                value: match self.timestamp {
                    RawTimestamp::Millis(ms) => ms.to_string(),
                    RawTimestamp::Text(text) => text,
                },
                id: self.id,
            });
        };
        Ok(Activity {
            id: ActivityId::new(self.id)?,
            kind,
            timestamp,
        })
    }
}

impl From<&Activity> for RawActivity {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id.to_string(),
            kind: activity.kind.to_string(),
            timestamp: RawTimestamp::Text(activity.timestamp.to_rfc3339()),
        }
    }
}

/// Parses a batch of raw records, failing on the first invalid one.
pub fn parse_all(records: Vec<RawActivity>) -> Result<Vec<Activity>, ValidationError> {
    records.into_iter().map(RawActivity::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn new_derives_id_from_millis_and_type() {
        let activity = Activity::new(ActivityType::Poop, at("2025-01-29T12:00:00.123456Z"));
        assert_eq!(activity.id.as_str(), "1738152000123-poop");
        assert_eq!(activity.timestamp, at("2025-01-29T12:00:00.123Z"));
    }

    #[test]
    fn activity_serializes_with_type_key() {
        let activity = Activity::new(ActivityType::SleepEnd, at("2025-01-29T12:00:00Z"));
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["type"], "sleep_end");
        assert_eq!(json["id"], "1738152000000-sleep_end");
        assert_eq!(json["timestamp"], "2025-01-29T12:00:00Z");
    }

    #[test]
    fn raw_activity_accepts_string_and_millis() {
        let records: Vec<RawActivity> = serde_json::from_str(
            r#"[
                {"id":"a","type":"pee","timestamp":"2025-01-29T12:00:00+02:00"},
                {"id":"b","type":"bottle","timestamp":1738152000000}
            ]"#,
        )
        .unwrap();
        let parsed = parse_all(records).unwrap();

        assert_eq!(parsed[0].kind, ActivityType::Pee);
        assert_eq!(parsed[0].timestamp, at("2025-01-29T10:00:00Z"));
        assert_eq!(parsed[1].kind, ActivityType::Bottle);
        assert_eq!(parsed[1].timestamp, at("2025-01-29T12:00:00Z"));
    }

    #[test]
    fn raw_activity_rejects_bad_fields() {
        let bad_time = RawActivity {
            id: "x".into(),
            kind: "poop".into(),
            timestamp: RawTimestamp::Text("yesterday".into()),
        };
        assert_eq!(
            bad_time.parse().unwrap_err(),
            ValidationError::InvalidTimestamp {
                id: "x".into(),
                value: "yesterday".into()
            }
        );

        let bad_type = RawActivity {
            id: "x".into(),
            kind: "nap".into(),
            timestamp: RawTimestamp::Millis(0),
        };
        assert!(matches!(
            bad_type.parse().unwrap_err(),
            ValidationError::ActivityType(_)
        ));

        let empty_id = RawActivity {
            id: String::new(),
            kind: "poop".into(),
            timestamp: RawTimestamp::Millis(0),
        };
        assert!(matches!(
            empty_id.parse().unwrap_err(),
            ValidationError::Empty { .. }
        ));
    }

    #[test]
    fn raw_roundtrip_preserves_activity() {
        let activity = Activity::new(ActivityType::Breast, at("2025-01-29T23:59:59.999Z"));
        let raw = RawActivity::from(&activity);
        assert_eq!(raw.parse().unwrap(), activity);
    }
}
