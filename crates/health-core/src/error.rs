use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors produced by the health aggregator.
///
/// Per-record defects never show up here; they are absorbed by the
/// normalizer and reported as [`crate::models::DropDiagnostic`]s.
#[derive(Error, Debug)]
pub enum HealthError {
    /// An input file could not be opened or read from disk.
    #[error("Failed to read {label} file {path}: {source}")]
    FileRead {
        label: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be written.
    #[error("Failed to write output file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file is not valid JSON.
    #[error("{label} file at {path} is not valid JSON: {source}")]
    InvalidJson {
        label: String,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// An input file parsed as JSON but its top level is not an array.
    #[error("Expected {label} file at {path} to contain a JSON array of records")]
    NotAnArray { label: String, path: PathBuf },

    /// The configured timezone is not a known IANA identifier.
    #[error("Invalid timezone '{0}'. Please use a valid IANA timezone like 'America/Los_Angeles'")]
    InvalidTimezone(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the health crates.
pub type Result<T> = std::result::Result<T, HealthError>;
