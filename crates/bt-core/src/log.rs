//! In-memory activity log with synchronous state transitions.
//!
//! The log owns display order (newest insertion first). It knows nothing
//! about persistence; [`crate::Tracker`] pairs each transition with a
//! write-through to storage.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::activity::{Activity, derive_id};
use crate::activity_type::ActivityType;
use crate::types::ActivityId;

/// An ordered set of activities keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityLog {
    activities: Vec<Activity>,
}

impl ActivityLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a log from records in display order.
    pub fn from_activities(activities: Vec<Activity>) -> Self {
        Self { activities }
    }

    /// Activities in display order (newest insertion first).
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Looks up an activity by id.
    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id.as_str() == id)
    }

    /// Prepends a new activity and returns it.
    ///
    /// Two activities of the same type in the same millisecond would share a
    /// derived id; the later one gets a `-1`, `-2`, ... suffix instead of
    /// shadowing the earlier one.
    pub fn add(&mut self, kind: ActivityType, timestamp: DateTime<Utc>) -> Activity {
        let mut activity = Activity::new(kind, timestamp);
        let base = derive_id(activity.timestamp, kind);
        if self.get(base.as_str()).is_some() {
            let taken: HashSet<&str> = self.activities.iter().map(|a| a.id.as_str()).collect();
            let mut suffix = 1_u32;
            loop {
                let candidate = format!("{base}-{suffix}");
                if !taken.contains(candidate.as_str()) {
                    activity.id = ActivityId(candidate);
                    break;
                }
                suffix += 1;
            }
        }
        self.activities.insert(0, activity.clone());
        activity
    }

    /// Removes the activity with the given id.
    ///
    /// Returns the removed activity, or `None` if no such id exists.
    pub fn remove(&mut self, id: &str) -> Option<Activity> {
        let idx = self.activities.iter().position(|a| a.id.as_str() == id)?;
        Some(self.activities.remove(idx))
    }

    /// Replaces the whole log; no merge or deduplication.
    pub fn replace(&mut self, activities: Vec<Activity>) {
        self.activities = activities;
    }

    pub fn clear(&mut self) {
        self.activities.clear();
    }
}
