use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time_utils::TimezoneHandler;

/// Fixed duration given to every workout; the source only records an instant.
pub const WORKOUT_DURATION_MINUTES: i64 = 60;

/// Which input stream an event or raw record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A sleep interval, recorded in UTC.
    Sleep,
    /// A workout instant, recorded in local wall-clock time.
    Workout,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Sleep => f.write_str("sleep"),
            EventKind::Workout => f.write_str("workout"),
        }
    }
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// A validated sleep or workout event with both UTC and local timestamps.
///
/// Events can only be built through [`Event::sleep`] and [`Event::workout`],
/// which enforce `utc_end >= utc_start` and compute the attributed day once.
/// Fields are private so an event cannot change after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    kind: EventKind,
    raw_timestamps: Vec<String>,
    utc_start: DateTime<Utc>,
    utc_end: DateTime<Utc>,
    local_start: DateTime<Tz>,
    local_end: DateTime<Tz>,
    calories: f64,
    attributed_day: NaiveDate,
}

impl Event {
    /// Build a sleep event from two UTC instants.
    ///
    /// The event counts toward the local date of `utc_end` (the wake-up day).
    pub fn sleep(
        raw_start: impl Into<String>,
        raw_end: impl Into<String>,
        utc_start: DateTime<Utc>,
        utc_end: DateTime<Utc>,
        handler: &TimezoneHandler,
    ) -> Result<Self, DropReason> {
        let raw_start = raw_start.into();
        let raw_end = raw_end.into();
        if utc_end < utc_start {
            return Err(DropReason::EndBeforeStart {
                start: raw_start,
                end: raw_end,
            });
        }

        let local_start = handler.to_local(utc_start);
        let local_end = handler.to_local(utc_end);

        Ok(Self {
            kind: EventKind::Sleep,
            raw_timestamps: vec![raw_start, raw_end],
            utc_start,
            utc_end,
            local_start,
            local_end,
            calories: 0.0,
            attributed_day: local_end.date_naive(),
        })
    }

    /// Build a workout event from its localized start.
    ///
    /// The end is one hour of elapsed time later; the event counts toward the
    /// local date of its start.
    pub fn workout(raw: impl Into<String>, local_start: DateTime<Tz>, calories: f64) -> Self {
        let local_end = local_start + Duration::minutes(WORKOUT_DURATION_MINUTES);
        Self {
            kind: EventKind::Workout,
            raw_timestamps: vec![raw.into()],
            utc_start: local_start.with_timezone(&Utc),
            utc_end: local_end.with_timezone(&Utc),
            local_start,
            local_end,
            calories,
            attributed_day: local_start.date_naive(),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The timestamp strings exactly as they appeared in the input.
    pub fn raw_timestamps(&self) -> &[String] {
        &self.raw_timestamps
    }

    pub fn utc_start(&self) -> DateTime<Utc> {
        self.utc_start
    }

    pub fn utc_end(&self) -> DateTime<Utc> {
        self.utc_end
    }

    pub fn local_start(&self) -> DateTime<Tz> {
        self.local_start
    }

    pub fn local_end(&self) -> DateTime<Tz> {
        self.local_end
    }

    /// Calories burned; always `0.0` for sleep events.
    pub fn calories(&self) -> f64 {
        self.calories
    }

    pub fn attributed_day(&self) -> NaiveDate {
        self.attributed_day
    }

    /// Real elapsed time between start and end, in fractional hours.
    ///
    /// Computed from the UTC instants, so a night that crosses a DST
    /// transition reports the time actually slept.
    pub fn duration_hours(&self) -> f64 {
        (self.utc_end - self.utc_start).num_milliseconds() as f64 / 3_600_000.0
    }
}

// ── Drop diagnostics ──────────────────────────────────────────────────────────

/// Why a raw record did not become an [`Event`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("could not parse `{field}` timestamp \"{raw}\"")]
    UnparseableTimestamp { field: &'static str, raw: String },

    #[error("end \"{end}\" is before start \"{start}\"")]
    EndBeforeStart { start: String, end: String },
}

/// Identifies a raw record by its stream and position in the input array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId {
    pub kind: EventKind,
    pub index: usize,
}

impl RecordId {
    pub fn new(kind: EventKind, index: usize) -> Self {
        Self { kind, index }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} record {}", self.kind, self.index)
    }
}

/// A dropped record together with the reason it was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropDiagnostic {
    pub record: RecordId,
    pub reason: DropReason,
}

impl fmt::Display for DropDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.record, self.reason)
    }
}

// ── DailyRecord ───────────────────────────────────────────────────────────────

/// Per-day totals for one local calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub total_sleep_hours: f64,
    #[serde(rename = "total_calories_burned")]
    pub total_calories: f64,
    pub workout_count: u32,
}

impl DailyRecord {
    /// An empty record for `date`: no sleep, no workouts.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_sleep_hours: 0.0,
            total_calories: 0.0,
            workout_count: 0,
        }
    }
}

// ── SummaryMetrics ────────────────────────────────────────────────────────────

/// Cross-day sleep/calorie statistics derived from the daily table.
///
/// Averages are `None` when no day falls into the corresponding subset, which
/// keeps "no data" distinct from a real average of zero calories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub threshold_hours: f64,
    pub total_days: usize,
    pub days_below_threshold: usize,
    pub avg_calories_below_threshold: Option<f64>,
    pub days_at_or_above_threshold: usize,
    pub avg_calories_at_or_above_threshold: Option<f64>,
}
