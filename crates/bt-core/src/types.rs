//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::activity_type::UnknownActivityType;

/// Validation errors for core types.
///
/// These are raised before any state changes, so a rejected value never
/// leaves the log or profile half-updated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Invalid feeding type value.
    #[error("invalid feeding type: {value} (expected breast, bottle or mixed)")]
    InvalidFeedingType { value: String },

    /// A timestamp could not be parsed.
    #[error("invalid timestamp for activity {id}: {value}")]
    InvalidTimestamp { id: String, value: String },

    /// The activity type tag is not one of the known types.
    #[error(transparent)]
    ActivityType(#[from] UnknownActivityType),
}

/// Which feeding categories the user tracks.
///
/// Only affects which rows a front end shows; counts are always computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedingType {
    Breast,
    Bottle,
    #[default]
    Mixed,
}

impl FeedingType {
    /// String representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breast => "breast",
            Self::Bottle => "bottle",
            Self::Mixed => "mixed",
        }
    }

    /// Whether breast feedings should be displayed.
    pub const fn shows_breast(self) -> bool {
        matches!(self, Self::Breast | Self::Mixed)
    }

    /// Whether bottle feedings should be displayed.
    pub const fn shows_bottle(self) -> bool {
        matches!(self, Self::Bottle | Self::Mixed)
    }
}

impl fmt::Display for FeedingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FeedingType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breast" => Ok(Self::Breast),
            "bottle" => Ok(Self::Bottle),
            "mixed" => Ok(Self::Mixed),
            _ => Err(ValidationError::InvalidFeedingType {
                value: s.to_string(),
            }),
        }
    }
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(pub(crate) String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated activity identifier.
    ///
    /// Derived from the creation timestamp and activity type, e.g.
    /// `1738152000000-poop`. Imported logs may carry any non-empty string.
    ActivityId, "activity ID"
);
