//! Activity type enum as the single source of truth for activity type strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of activity a caregiver can log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityType {
    Poop,
    Pee,
    Breast,
    Bottle,
    SleepStart,
    SleepEnd,
}

impl ActivityType {
    /// Every variant, in display order.
    pub const ALL: [Self; 6] = [
        Self::Poop,
        Self::Pee,
        Self::Breast,
        Self::Bottle,
        Self::SleepStart,
        Self::SleepEnd,
    ];

    /// Raw type tag used in storage and exports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Poop => "poop",
            Self::Pee => "pee",
            Self::Breast => "breast",
            Self::Bottle => "bottle",
            Self::SleepStart => "sleep_start",
            Self::SleepEnd => "sleep_end",
        }
    }

    /// Human-readable label for listings and reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Poop => "Poop",
            Self::Pee => "Pee",
            Self::Breast => "Breastfeeding",
            Self::Bottle => "Bottle",
            Self::SleepStart => "Fell asleep",
            Self::SleepEnd => "Woke up",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = UnknownActivityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "poop" => Ok(Self::Poop),
            "pee" => Ok(Self::Pee),
            "breast" => Ok(Self::Breast),
            "bottle" => Ok(Self::Bottle),
            "sleep_start" | "sleep-start" => Ok(Self::SleepStart),
            "sleep_end" | "sleep-end" => Ok(Self::SleepEnd),
            _ => Err(UnknownActivityType(s.to_string())),
        }
    }
}

impl Serialize for ActivityType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActivityType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown activity type strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownActivityType(String);

impl fmt::Display for UnknownActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown activity type: {}", self.0)
    }
}

impl std::error::Error for UnknownActivityType {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_variants() {
        for variant in &ActivityType::ALL {
            let s = variant.to_string();
            let parsed: ActivityType = s.parse().expect("should parse");
            assert_eq!(parsed, *variant, "roundtrip failed for {variant:?}");
        }
    }

    #[test]
    fn dashed_aliases_parse() {
        let start: ActivityType = "sleep-start".parse().expect("should parse");
        assert_eq!(start, ActivityType::SleepStart);

        let end: ActivityType = "sleep-end".parse().expect("should parse");
        assert_eq!(end, ActivityType::SleepEnd);
    }

    #[test]
    fn unknown_type_errors() {
        let result: Result<ActivityType, _> = "nap".parse();
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "unknown activity type: nap");
    }

    #[test]
    fn serializes_as_raw_tag() {
        let json = serde_json::to_string(&ActivityType::SleepStart).unwrap();
        assert_eq!(json, "\"sleep_start\"");
        assert!(serde_json::from_str::<ActivityType>("\"diaper\"").is_err());
    }
}
