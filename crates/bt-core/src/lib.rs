//! Core domain logic for the baby activity tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Activities: the logged events and their validated wire form
//! - Summaries: per-day counts, sleep reconstruction, and week series
//! - Tracker: the explicit state object pairing the log with storage

mod activity;
pub mod activity_type;
mod log;
pub mod storage;
pub mod summary;
mod tracker;
pub mod types;

pub use activity::{Activity, RawActivity, RawTimestamp, derive_id};
pub use activity_type::{ActivityType, UnknownActivityType};
pub use log::ActivityLog;
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use summary::{
    DaySummary, WeekOffset, WeekPoint, chart_max, summarize_day, summarize_today, week_series,
};
pub use tracker::{BabyProfile, Tracker, TrackerError, WriteThrough};
pub use types::{ActivityId, FeedingType, ValidationError};
