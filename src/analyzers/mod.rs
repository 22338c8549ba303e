//! Charger status aggregation.
//!
//! This module reads status observations line by line, folds them into
//! per-location or per-charger tallies, and turns those tallies into
//! percentage-of-time summaries.

pub mod aggregate;
pub mod analyzer;
pub mod types;
