//! Sleep versus calories statistics over the per-day table.

use health_core::models::{DailyRecord, SummaryMetrics};

/// Compute the sleep/calorie summary in a single pass over `records`.
///
/// A day is "below threshold" when `total_sleep_hours < threshold_hours`
/// (strict). Each average is `None` when its subset of days is empty.
pub fn compute_summary(records: &[DailyRecord], threshold_hours: f64) -> SummaryMetrics {
    let mut below_days = 0usize;
    let mut below_calories = 0.0;
    let mut above_days = 0usize;
    let mut above_calories = 0.0;

    for record in records {
        if record.total_sleep_hours < threshold_hours {
            below_days += 1;
            below_calories += record.total_calories;
        } else {
            above_days += 1;
            above_calories += record.total_calories;
        }
    }

    SummaryMetrics {
        threshold_hours,
        total_days: records.len(),
        days_below_threshold: below_days,
        avg_calories_below_threshold: mean(below_calories, below_days),
        days_at_or_above_threshold: above_days,
        avg_calories_at_or_above_threshold: mean(above_calories, above_days),
    }
}

fn mean(sum: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}
