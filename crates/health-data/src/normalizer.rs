//! Turns raw sleep and workout records into validated [`Event`]s.
//!
//! Sleep timestamps are read under a UTC contract; workout timestamps are
//! wall-clock readings localized in the configured timezone. Records whose
//! timestamps cannot be resolved are dropped with a [`DropReason`]; a bad
//! calorie value is defaulted to zero instead.

use health_core::models::{DropDiagnostic, DropReason, Event, EventKind, RecordId};
use health_core::time_utils::TimezoneHandler;
use serde_json::Value;
use tracing::{debug, warn};

use crate::raw::{CaloriesField, RawRecord, SLEEP_END_KEYS, SLEEP_START_KEYS, WORKOUT_TIME_KEYS};

/// Events that survived normalization, plus one diagnostic per dropped record.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub events: Vec<Event>,
    pub drops: Vec<DropDiagnostic>,
}

/// Normalizes raw records against one configured timezone.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    handler: TimezoneHandler,
}

impl Normalizer {
    pub fn new(handler: TimezoneHandler) -> Self {
        Self { handler }
    }

    /// Normalize one classified record.
    pub fn normalize(&self, id: RecordId, record: RawRecord) -> Result<Event, DropReason> {
        match record {
            RawRecord::Sleep { start, end } => {
                let utc_start = self.handler.parse_utc(&start).ok_or_else(|| {
                    DropReason::UnparseableTimestamp {
                        field: SLEEP_START_KEYS[0],
                        raw: start.clone(),
                    }
                })?;
                let utc_end = self.handler.parse_utc(&end).ok_or_else(|| {
                    DropReason::UnparseableTimestamp {
                        field: SLEEP_END_KEYS[0],
                        raw: end.clone(),
                    }
                })?;
                Event::sleep(start, end, utc_start, utc_end, &self.handler)
            }

            RawRecord::Workout {
                timestamp,
                calories,
            } => {
                let local_start = self.handler.parse_local(&timestamp).ok_or_else(|| {
                    DropReason::UnparseableTimestamp {
                        field: WORKOUT_TIME_KEYS[0],
                        raw: timestamp.clone(),
                    }
                })?;
                match &calories {
                    CaloriesField::Present(_) => {}
                    CaloriesField::Missing => {
                        debug!("{}: no calories recorded, defaulting to 0", id);
                    }
                    CaloriesField::Invalid(raw) => {
                        warn!("{}: invalid calories {}, defaulting to 0", id, raw);
                    }
                }
                Ok(Event::workout(timestamp, local_start, calories.value_or_zero()))
            }

            RawRecord::Malformed(reason) => Err(reason),
        }
    }

    /// Classify and normalize a single JSON value.
    pub fn normalize_value(&self, id: RecordId, value: &Value) -> Result<Event, DropReason> {
        self.normalize(id, RawRecord::classify(id.kind, value))
    }

    /// Normalize every record of one stream, never stopping on a bad record.
    pub fn normalize_records(&self, kind: EventKind, values: &[Value]) -> NormalizedBatch {
        let mut batch = NormalizedBatch::default();

        for (index, value) in values.iter().enumerate() {
            let id = RecordId::new(kind, index);
            match self.normalize_value(id, value) {
                Ok(event) => batch.events.push(event),
                Err(reason) => {
                    warn!("{}: {}, skipping", id, reason);
                    batch.drops.push(DropDiagnostic { record: id, reason });
                }
            }
        }

        debug!(
            "Normalized {} of {} {} records ({} dropped)",
            batch.events.len(),
            values.len(),
            kind,
            batch.drops.len()
        );

        batch
    }
}
