//! JSON export of the per-day table.

use std::path::Path;

use health_core::error::{HealthError, Result};
use health_core::formatting::round_to;
use health_core::models::DailyRecord;
use serde::Serialize;

/// Decimal places kept for floating-point fields in exported files.
const EXPORT_DECIMALS: u32 = 2;

/// One row of the exported array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub date: String,
    pub total_sleep_hours: f64,
    pub total_calories_burned: f64,
    pub workout_count: u32,
}

impl From<&DailyRecord> for ExportRow {
    fn from(r: &DailyRecord) -> Self {
        Self {
            date: r.date.format("%Y-%m-%d").to_string(),
            total_sleep_hours: round_to(r.total_sleep_hours, EXPORT_DECIMALS),
            total_calories_burned: round_to(r.total_calories, EXPORT_DECIMALS),
            workout_count: r.workout_count,
        }
    }
}

/// Render `records` as a pretty-printed JSON array.
pub fn render_json(records: &[DailyRecord]) -> Result<String> {
    let rows: Vec<ExportRow> = records.iter().map(ExportRow::from).collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// Write `records` to `path`, creating parent directories as needed.
///
/// The file is written next to its destination and renamed into place, so a
/// failed run never leaves a half-written export behind.
pub fn write_daily_records(path: &Path, records: &[DailyRecord]) -> Result<()> {
    let json = render_json(records)?;
    let wrap = |source| HealthError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(wrap)?;
    if let Err(source) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(wrap(source));
    }

    Ok(())
}
