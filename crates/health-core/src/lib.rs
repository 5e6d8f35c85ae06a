//! Shared building blocks for the health aggregator.
//!
//! Holds the normalized data model, the error taxonomy, timestamp parsing and
//! timezone projection, command-line settings and number formatting.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
