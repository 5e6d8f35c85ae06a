//! Folds normalized events into one [`DailyRecord`] per attributed day.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use health_core::models::{DailyRecord, Event, EventKind};

// ── DayTotals ─────────────────────────────────────────────────────────────────

/// Running totals for a single day.
#[derive(Debug, Clone, Default)]
struct DayTotals {
    sleep_hours: f64,
    calories: f64,
    workout_count: u32,
}

impl DayTotals {
    /// Add one event's contribution.
    ///
    /// Sleep counts its real elapsed hours; overlapping sleep events on the
    /// same day are summed as-is.
    fn add_event(&mut self, event: &Event) {
        match event.kind() {
            EventKind::Sleep => self.sleep_hours += event.duration_hours(),
            EventKind::Workout => {
                self.calories += event.calories();
                self.workout_count += 1;
            }
        }
    }

    fn into_record(self, date: NaiveDate) -> DailyRecord {
        DailyRecord {
            date,
            total_sleep_hours: self.sleep_hours,
            total_calories: self.calories,
            workout_count: self.workout_count,
        }
    }
}

// ── DailyAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that groups events by their attributed day.
pub struct DailyAggregator;

impl DailyAggregator {
    /// Build the per-day table from events of both kinds, in any order.
    ///
    /// Every day that has at least one event appears exactly once; fields for
    /// the missing stream stay at zero. Returns records sorted by date.
    pub fn build_daily_records<'a, I>(events: I) -> Vec<DailyRecord>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        // BTreeMap keeps the days sorted.
        let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();

        for event in events {
            days.entry(event.attributed_day())
                .or_default()
                .add_event(event);
        }

        days.into_iter()
            .map(|(date, totals)| totals.into_record(date))
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
