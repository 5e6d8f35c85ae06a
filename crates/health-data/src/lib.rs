//! Ingestion and analysis layer for the health aggregator.
//!
//! Loads raw sleep and workout records, normalizes them into timezone-aware
//! events, folds them into a per-day table and computes the sleep/calorie
//! correlation over that table.

pub mod aggregator;
pub mod correlator;
pub mod export;
pub mod normalizer;
pub mod pipeline;
pub mod raw;
pub mod reader;

pub use health_core as core;
