mod bootstrap;
mod report;

use anyhow::Result;
use clap::Parser;
use health_core::settings::Settings;
use health_data::export::write_daily_records;
use health_data::pipeline::analyze;
use health_data::reader::load_records;

fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(settings.effective_log_level())?;

    tracing::info!("Health Aggregator v{} starting", env!("CARGO_PKG_VERSION"));

    // Configuration errors stop the run before any file is read.
    let config = settings.pipeline_config()?;
    tracing::info!(
        "Timezone: {}, sleep threshold: {}h",
        config.timezone.tz().name(),
        config.threshold_hours
    );

    let sleep_raw = load_records(&settings.sleep, "sleep")?;
    let workouts_raw = load_records(&settings.workouts, "workouts")?;

    let analysis = analyze(&sleep_raw, &workouts_raw, &config);

    if !analysis.drops.is_empty() {
        tracing::info!("Skipped {} malformed records", analysis.drops.len());
    }
    if analysis.metadata.sleep_events == 0 {
        tracing::warn!(
            "No valid sleep records after normalization; sleep-based metrics may be meaningless"
        );
    }
    if analysis.metadata.workout_events == 0 {
        tracing::warn!(
            "No valid workout records after normalization; calorie metrics may be meaningless"
        );
    }

    print!("{}", report::render_daily_table(&analysis.daily_records));
    print!("{}", report::render_summary(&analysis.summary));

    if let Some(output) = &settings.output {
        write_daily_records(output, &analysis.daily_records)?;
        println!("\nMerged daily records written to: {}", output.display());
    }

    Ok(())
}
