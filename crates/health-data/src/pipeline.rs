//! Top-level pipeline: raw records → events → daily records → summary.
//!
//! Only configuration problems surface as errors here. Per-record defects are
//! absorbed by the [`Normalizer`] and come back as [`DropDiagnostic`]s.

use health_core::error::Result;
use health_core::models::{DailyRecord, DropDiagnostic, EventKind, SummaryMetrics};
use health_core::settings::PipelineConfig;
use health_core::time_utils::TimezoneHandler;
use serde_json::Value;
use tracing::debug;

use crate::aggregator::DailyAggregator;
use crate::normalizer::Normalizer;

pub use crate::correlator::compute_summary;

// ── Public types ──────────────────────────────────────────────────────────────

/// Counts describing one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct AnalysisMetadata {
    /// IANA name of the timezone events were projected into.
    pub timezone: String,
    pub sleep_records_read: usize,
    pub sleep_events: usize,
    pub workout_records_read: usize,
    pub workout_events: usize,
    pub days: usize,
}

/// The complete output of [`analyze`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Per-day table, ascending by date.
    pub daily_records: Vec<DailyRecord>,
    /// Every dropped record, sleep first, each stream in input order.
    pub drops: Vec<DropDiagnostic>,
    pub summary: SummaryMetrics,
    pub metadata: AnalysisMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Normalize both streams and fold them into the per-day table.
///
/// Fails only when `timezone_id` is not a known IANA timezone.
pub fn normalize_and_aggregate(
    sleep_raw: &[Value],
    workout_raw: &[Value],
    timezone_id: &str,
) -> Result<(Vec<DailyRecord>, Vec<DropDiagnostic>)> {
    let handler = TimezoneHandler::new(timezone_id)?;
    let run = run_stages(sleep_raw, workout_raw, handler);
    Ok((run.daily_records, run.drops))
}

/// Run the full pipeline with an already validated configuration.
///
/// 1. Normalize sleep and workout records.
/// 2. Group events into daily records.
/// 3. Compute the summary over the daily records.
pub fn analyze(sleep_raw: &[Value], workout_raw: &[Value], config: &PipelineConfig) -> AnalysisResult {
    let run = run_stages(sleep_raw, workout_raw, config.timezone);
    let summary = compute_summary(&run.daily_records, config.threshold_hours);

    let metadata = AnalysisMetadata {
        timezone: config.timezone.tz().name().to_string(),
        sleep_records_read: sleep_raw.len(),
        sleep_events: run.sleep_events,
        workout_records_read: workout_raw.len(),
        workout_events: run.workout_events,
        days: run.daily_records.len(),
    };

    debug!(
        "Pipeline finished: {} days, {} dropped records",
        metadata.days,
        run.drops.len()
    );

    AnalysisResult {
        daily_records: run.daily_records,
        drops: run.drops,
        summary,
        metadata,
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

struct StageOutput {
    daily_records: Vec<DailyRecord>,
    drops: Vec<DropDiagnostic>,
    sleep_events: usize,
    workout_events: usize,
}

fn run_stages(sleep_raw: &[Value], workout_raw: &[Value], handler: TimezoneHandler) -> StageOutput {
    let normalizer = Normalizer::new(handler);

    let sleep = normalizer.normalize_records(EventKind::Sleep, sleep_raw);
    let workouts = normalizer.normalize_records(EventKind::Workout, workout_raw);

    let daily_records =
        DailyAggregator::build_daily_records(sleep.events.iter().chain(workouts.events.iter()));

    let mut drops = sleep.drops;
    drops.extend(workouts.drops);

    StageOutput {
        daily_records,
        drops,
        sleep_events: sleep.events.len(),
        workout_events: workouts.events.len(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
