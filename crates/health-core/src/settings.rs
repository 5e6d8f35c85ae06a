use clap::Parser;
use std::path::PathBuf;

use crate::error::{HealthError, Result};
use crate::time_utils::{TimezoneHandler, DEFAULT_TIMEZONE};

/// Sleep threshold, in hours, used when none is supplied.
pub const DEFAULT_THRESHOLD_HOURS: f64 = 6.0;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Merge sleep (UTC) and workouts (local time) into daily records and compute
/// a simple sleep/calories correlation.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "health-aggregator",
    about = "Personal health data aggregator: merge sleep and workout logs into daily records",
    version
)]
pub struct Settings {
    /// Path to sleep.json (timestamps in UTC)
    #[arg(long)]
    pub sleep: PathBuf,

    /// Path to workouts.json (timestamps in local time)
    #[arg(long)]
    pub workouts: PathBuf,

    /// IANA timezone for the user
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,

    /// Sleep threshold in hours for correlation
    #[arg(long, default_value_t = DEFAULT_THRESHOLD_HOURS)]
    pub threshold: f64,

    /// Optional path to write merged daily records as JSON
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Effective log level after applying `--debug`.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "DEBUG"
        } else {
            &self.log_level
        }
    }

    /// Validate the pipeline-relevant values and bundle them.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        PipelineConfig::new(&self.timezone, self.threshold)
    }
}

// ── PipelineConfig ─────────────────────────────────────────────────────────────

/// Validated configuration injected into the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub timezone: TimezoneHandler,
    pub threshold_hours: f64,
}

impl PipelineConfig {
    /// Resolve `timezone_id` and check the threshold.
    ///
    /// Unknown timezones and non-finite or negative thresholds are
    /// configuration errors.
    pub fn new(timezone_id: &str, threshold_hours: f64) -> Result<Self> {
        let timezone = TimezoneHandler::new(timezone_id)?;
        if !threshold_hours.is_finite() || threshold_hours < 0.0 {
            return Err(HealthError::Config(format!(
                "sleep threshold must be a non-negative number of hours, got {}",
                threshold_hours
            )));
        }
        Ok(Self {
            timezone,
            threshold_hours,
        })
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timezone: TimezoneHandler::default(),
            threshold_hours: DEFAULT_THRESHOLD_HOURS,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
