//! Classification of untyped input records.
//!
//! Each JSON value is inspected exactly once and turned into a [`RawRecord`];
//! nothing downstream looks at the original JSON shape again.

use health_core::models::{DropReason, EventKind};
use serde_json::Value;

/// Accepted keys for a sleep record's start, primary name first.
pub const SLEEP_START_KEYS: &[&str] = &["start_time", "start"];
/// Accepted keys for a sleep record's end.
pub const SLEEP_END_KEYS: &[&str] = &["end_time", "end"];
/// Accepted keys for a workout's single timestamp.
pub const WORKOUT_TIME_KEYS: &[&str] = &["start_time", "timestamp", "time"];
/// Accepted keys for a workout's calorie count.
pub const CALORIE_KEYS: &[&str] = &["calories_burned", "calories"];

/// The calorie field of a workout record, before defaulting.
#[derive(Debug, Clone, PartialEq)]
pub enum CaloriesField {
    Present(f64),
    Missing,
    /// Present but not a usable number; holds the raw text.
    Invalid(String),
}

impl CaloriesField {
    /// The calorie count, with missing or invalid values treated as zero.
    pub fn value_or_zero(&self) -> f64 {
        match self {
            CaloriesField::Present(v) => *v,
            CaloriesField::Missing | CaloriesField::Invalid(_) => 0.0,
        }
    }
}

/// A raw record resolved into one of the shapes the normalizer understands.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    Sleep {
        start: String,
        end: String,
    },
    Workout {
        timestamp: String,
        calories: CaloriesField,
    },
    Malformed(DropReason),
}

impl RawRecord {
    /// Resolve `value` as a record of the given stream.
    pub fn classify(kind: EventKind, value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return RawRecord::Malformed(DropReason::NotAnObject);
        };

        match kind {
            EventKind::Sleep => {
                let Some(start) = timestamp_field(obj, SLEEP_START_KEYS) else {
                    return RawRecord::Malformed(DropReason::MissingField(SLEEP_START_KEYS[0]));
                };
                let Some(end) = timestamp_field(obj, SLEEP_END_KEYS) else {
                    return RawRecord::Malformed(DropReason::MissingField(SLEEP_END_KEYS[0]));
                };
                RawRecord::Sleep { start, end }
            }
            EventKind::Workout => {
                let Some(timestamp) = timestamp_field(obj, WORKOUT_TIME_KEYS) else {
                    return RawRecord::Malformed(DropReason::MissingField(WORKOUT_TIME_KEYS[0]));
                };
                RawRecord::Workout {
                    timestamp,
                    calories: calories_field(obj),
                }
            }
        }
    }
}

/// First non-empty value among `keys`, as text.
///
/// Numbers are kept as their decimal text (Unix epoch seconds). Values of any
/// other non-string type are returned as JSON text so they fail to parse later
/// and are reported as unparseable rather than missing.
fn timestamp_field(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|&key| match obj.get(key)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    })
}

fn calories_field(obj: &serde_json::Map<String, Value>) -> CaloriesField {
    let Some(value) = CALORIE_KEYS
        .iter()
        .find_map(|&key| obj.get(key).filter(|v| !v.is_null()))
    else {
        return CaloriesField::Missing;
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() && v >= 0.0 => CaloriesField::Present(v),
        _ => CaloriesField::Invalid(value.to_string()),
    }
}
