use std::fmt::Write as _;

use health_core::formatting::{format_number, format_optional};
use health_core::models::{DailyRecord, SummaryMetrics};

// ── Daily table ────────────────────────────────────────────────────────────────

/// Render the per-day table, one row per date.
pub fn render_daily_table(records: &[DailyRecord]) -> String {
    if records.is_empty() {
        return "No daily records to display.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "\nPer-day summary (local dates):");
    let _ = writeln!(
        out,
        "{:<12} {:>9} {:>10} {:>10}",
        "Date", "Sleep(h)", "Calories", "Workouts"
    );

    for r in records {
        let _ = writeln!(
            out,
            "{:<12} {:>9} {:>10} {:>10}",
            r.date.format("%Y-%m-%d"),
            format_number(r.total_sleep_hours, 2),
            format_number(r.total_calories, 2),
            r.workout_count
        );
    }

    out
}

// ── Correlation block ──────────────────────────────────────────────────────────

/// Render the sleep/calorie correlation summary.
pub fn render_summary(summary: &SummaryMetrics) -> String {
    let threshold = summary.threshold_hours;
    let mut out = String::new();

    let _ = writeln!(out, "\nCorrelation: sleep vs calories");
    let _ = writeln!(out, "Total days analyzed: {}", summary.total_days);
    let _ = writeln!(out, "Sleep threshold: {} hours", threshold);
    let _ = writeln!(out, "Days below threshold: {}", summary.days_below_threshold);

    match summary.avg_calories_below_threshold {
        None => {
            let _ = writeln!(out, "No days with sleep below threshold; metric is undefined.");
        }
        Some(avg) => {
            let _ = writeln!(
                out,
                "Average calories on days with < {}h sleep: {}",
                threshold,
                format_number(avg, 2)
            );
        }
    }

    let _ = writeln!(
        out,
        "Days at or above threshold: {} (average calories: {})",
        summary.days_at_or_above_threshold,
        format_optional(summary.avg_calories_at_or_above_threshold, 2, "n/a")
    );

    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
