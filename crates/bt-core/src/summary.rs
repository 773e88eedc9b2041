//! Day and week summarization.
//!
//! Turns an unordered activity log into per-day counts and sleep totals.
//!
//! # Algorithm Summary
//!
//! 1. Count diaper and feeding activities whose local date is the target day
//! 2. Sort the whole log by timestamp and pair `sleep_start`/`sleep_end`
//!    markers with a single pending-start slot
//! 3. Clip each closed session to the target day and add its minutes
//! 4. Credit a session that is still open according to where it started
//!    relative to the target day and today
//!
//! Every function here is pure. "Now" and the local time zone are taken from
//! the `now` argument so results are reproducible.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::Serialize;

use crate::activity::Activity;
use crate::activity_type::ActivityType;

/// Minutes credited to a past day that an open session slept through.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Number of points in a week series.
pub const DAYS_PER_WEEK: usize = 7;

/// Counts and sleep total for one local calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub poop: u32,
    pub pee: u32,
    pub breast: u32,
    pub bottle: u32,
    /// Minutes of sleep attributed to the day.
    pub sleep_minutes: i64,
    /// Start of a sleep session still open after scanning the log.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sleep_start: Option<DateTime<Utc>>,
}

impl DaySummary {
    /// Breast and bottle feedings combined.
    pub const fn feedings(&self) -> u32 {
        self.breast + self.bottle
    }

    /// Sleep as fractional hours.
    #[allow(clippy::cast_precision_loss)]
    pub fn sleep_hours(&self) -> f64 {
        self.sleep_minutes as f64 / 60.0
    }

    fn tally(&mut self, kind: ActivityType) {
        match kind {
            ActivityType::Poop => self.poop += 1,
            ActivityType::Pee => self.pee += 1,
            ActivityType::Breast => self.breast += 1,
            ActivityType::Bottle => self.bottle += 1,
            ActivityType::SleepStart | ActivityType::SleepEnd => {}
        }
    }
}

/// One day of the weekly chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekPoint {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`.
    pub label: String,
    pub poop: u32,
    pub pee: u32,
    pub feedings: u32,
    pub sleep_hours: f64,
}

/// How many weeks back from the current one a chart shows.
///
/// Zero is the week ending today; navigation never goes past it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct WeekOffset(u32);

impl WeekOffset {
    /// The week ending today.
    pub const CURRENT: Self = Self(0);

    pub const fn new(weeks_back: u32) -> Self {
        Self(weeks_back)
    }

    /// Converts a signed offset, clamping anything below zero to the current week.
    pub fn from_signed(weeks_back: i64) -> Self {
        Self(u32::try_from(weeks_back.max(0)).unwrap_or(u32::MAX))
    }

    pub const fn weeks_back(self) -> u32 {
        self.0
    }

    /// One week further into the past.
    #[must_use]
    pub const fn previous(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One week closer to today, stopping at the current week.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Oldest day of the week ending `weeks_back` weeks before `today`.
    ///
    /// `None` when that day precedes the earliest representable date.
    pub fn first_day(self, today: NaiveDate) -> Option<NaiveDate> {
        let days_back = i64::from(self.0) * 7 + 6;
        today.checked_sub_signed(TimeDelta::try_days(days_back)?)
    }
}

/// An inclusive instant range covering one local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DayBounds {
    start: DateTime<Utc>,
    /// Last millisecond of the day (23:59:59.999 local).
    end: DateTime<Utc>,
}

impl DayBounds {
    fn for_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Self {
        let start = local_midnight_to_utc(day, tz);
        let next = day
            .succ_opt()
            .map_or(start + TimeDelta::days(1), |next| local_midnight_to_utc(next, tz));
        Self {
            start,
            end: next - TimeDelta::milliseconds(1),
        }
    }

    /// Minutes of `[start, end]` falling inside the day.
    fn clipped_minutes(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
        let effective_start = start.max(self.start);
        let effective_end = end.min(self.end);
        if effective_start <= self.end && effective_end >= self.start {
            rounded_minutes(effective_start, effective_end)
        } else {
            0
        }
    }
}

/// Converts a local date at midnight to UTC.
/// Handles DST ambiguity by picking the earlier time.
fn local_midnight_to_utc<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            // Spring-forward gap at midnight: 1am local is past it.
            let one_am = midnight + TimeDelta::hours(1);
            tz.from_local_datetime(&one_am).earliest().map_or_else(
                || Utc.from_utc_datetime(&midnight),
                |dt| dt.with_timezone(&Utc),
            )
        }
    }
}

/// Whole minutes between two instants, rounded half up, never negative.
fn rounded_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let ms = (end - start).num_milliseconds();
    if ms <= 0 {
        return 0;
    }
    (ms + 30_000) / 60_000
}

/// Summarizes one local calendar day.
///
/// The whole log is scanned for sleep sessions because a session can start on
/// an earlier day and end on, or run through, `day`.
pub fn summarize_day<Tz: TimeZone>(
    activities: &[Activity],
    day: NaiveDate,
    now: &DateTime<Tz>,
) -> DaySummary {
    let tz = now.timezone();
    let local_date = |ts: &DateTime<Utc>| ts.with_timezone(&tz).date_naive();

    let mut summary = DaySummary::default();
    for activity in activities {
        if local_date(&activity.timestamp) == day {
            summary.tally(activity.kind);
        }
    }

    let bounds = DayBounds::for_day(day, &tz);
    let mut sorted: Vec<&Activity> = activities.iter().collect();
    sorted.sort_by_key(|a| a.timestamp);

    // Consecutive unmatched starts collapse to the latest one.
    let mut pending_start: Option<DateTime<Utc>> = None;
    for activity in sorted {
        match activity.kind {
            ActivityType::SleepStart => pending_start = Some(activity.timestamp),
            ActivityType::SleepEnd => {
                if let Some(start) = pending_start.take() {
                    summary.sleep_minutes += bounds.clipped_minutes(start, activity.timestamp);
                }
            }
            _ => {}
        }
    }

    if let Some(start) = pending_start {
        summary.sleep_minutes += open_session_minutes(start, day, &bounds, now, local_date(&start));
        summary.last_sleep_start = Some(start);
    }

    summary
}

/// Minutes an unfinished session contributes to `day`.
fn open_session_minutes<Tz: TimeZone>(
    start: DateTime<Utc>,
    day: NaiveDate,
    bounds: &DayBounds,
    now: &DateTime<Tz>,
    start_date: NaiveDate,
) -> i64 {
    let today = now.date_naive();
    let now = now.with_timezone(&Utc);

    if day > today || start_date > day {
        return 0;
    }
    match (start_date == day, day == today) {
        (true, true) => rounded_minutes(start, now),
        // A past day's own unfinished session is not extended after the fact.
        (true, false) => 0,
        (false, true) => rounded_minutes(bounds.start, now),
        (false, false) => MINUTES_PER_DAY,
    }
}

/// Summarizes the local day containing `now`.
pub fn summarize_today<Tz: TimeZone>(activities: &[Activity], now: &DateTime<Tz>) -> DaySummary {
    summarize_day(activities, now.date_naive(), now)
}

/// Seven daily points ending `offset` weeks before today, oldest first.
pub fn week_series<Tz: TimeZone>(
    activities: &[Activity],
    offset: WeekOffset,
    now: &DateTime<Tz>,
) -> [WeekPoint; DAYS_PER_WEEK] {
    let today = now.date_naive();
    let base_back = i64::from(offset.weeks_back()) * 7;

    std::array::from_fn(|idx| {
        #[allow(clippy::cast_possible_wrap)]
        let days_back = (DAYS_PER_WEEK - 1 - idx) as i64 + base_back;
        let date = today
            .checked_sub_signed(TimeDelta::days(days_back))
            .unwrap_or(NaiveDate::MIN);
        let summary = summarize_day(activities, date, now);
        WeekPoint {
            date,
            label: date.format("%a").to_string(),
            poop: summary.poop,
            pee: summary.pee,
            feedings: summary.feedings(),
            sleep_hours: summary.sleep_hours(),
        }
    })
}

/// Largest value of a chart series, floored at 1 so scaling never divides by zero.
pub fn chart_max<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().fold(1.0, f64::max)
}
