//! Data types used by the aggregation pipeline.

use clap::ValueEnum;
use serde::Serialize;

use crate::record::{Location, Record};
use crate::stats::{Rates, StatusCounts};

/// What a grouping key is made of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One key per `(location, charger id)` pair.
    #[default]
    Charger,
    /// One key per location.
    Location,
}

/// How the suspended percentage is obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SuspendedMode {
    /// `100 * SUSPENDED_EV / online time`.
    #[default]
    Direct,
    /// `100 - functioning - offline`. Can go negative when offline
    /// observations exist, since both terms share the online-time denominator.
    Derived,
}

/// Grouping key. `charger_id` is `None` in [`Granularity::Location`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupKey {
    pub location: Location,
    pub charger_id: Option<String>,
}

impl GroupKey {
    pub fn for_record(record: &Record, granularity: Granularity) -> Self {
        let charger_id = match granularity {
            Granularity::Charger => Some(record.charger_id.clone()),
            Granularity::Location => None,
        };
        GroupKey {
            location: record.location,
            charger_id,
        }
    }
}

/// Running totals for one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupTally {
    pub status_counts: StatusCounts,
    pub charging_cycles: u64,
    pub online_time: u64,
}

/// Counters for one pass over an input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub lines_read: u64,
    pub records_ingested: u64,
    pub incomplete: u64,
    pub unrecognized: u64,
}

impl IngestStats {
    pub fn skipped(&self) -> u64 {
        self.incomplete + self.unrecognized
    }
}

/// Statistics for one key, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charger_id: Option<String>,
    pub status_counts: StatusCounts,
    pub charging_cycles: u64,
    pub online_time: u64,
    pub rates: Rates,
}

/// All groups of one location, sorted by charger id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSummary {
    pub location: Location,
    pub groups: Vec<GroupSummary>,
}

/// Complete report over an aggregation state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub granularity: Granularity,
    pub suspended_mode: SuspendedMode,
    pub locations: Vec<LocationSummary>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Iterates `(location, group)` pairs in report order.
    pub fn groups(&self) -> impl Iterator<Item = (Location, &GroupSummary)> {
        self.locations
            .iter()
            .flat_map(|l| l.groups.iter().map(move |g| (l.location, g)))
    }
}
