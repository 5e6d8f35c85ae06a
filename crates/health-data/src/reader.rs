//! Loading of raw sleep and workout JSON files.
//!
//! Each file must hold a top-level JSON array; its elements are handed to the
//! pipeline untouched and classified later by the normalizer.

use std::path::Path;

use health_core::error::{HealthError, Result};
use serde_json::Value;
use tracing::debug;

/// Read `path` and return the records of its top-level JSON array.
///
/// `label` names the stream (`"sleep"`, `"workouts"`) in error messages.
pub fn load_records(path: &Path, label: &str) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path).map_err(|source| HealthError::FileRead {
        label: label.to_string(),
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_records(&content, path, label)?;
    debug!("Loaded {} {} records from {}", records.len(), label, path.display());
    Ok(records)
}

/// Parse `content` as a JSON array of records.
pub fn parse_records(content: &str, path: &Path, label: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(content).map_err(|source| HealthError::InvalidJson {
        label: label.to_string(),
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Array(records) => Ok(records),
        _ => Err(HealthError::NotAnArray {
            label: label.to_string(),
            path: path.to_path_buf(),
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
