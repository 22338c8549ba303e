use std::collections::BTreeMap;

use tracing::debug;

use crate::analyzers::types::{
    GroupKey, GroupSummary, GroupTally, Granularity, LocationSummary, Summary, SuspendedMode,
};
use crate::record::{Record, Status};
use crate::stats::Rates;

/// Aggregation state for one run.
///
/// Records must be ingested in file order: a charging cycle is an
/// `AVAILABLE -> CHARGING` step between two adjacent records with the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregator {
    granularity: Granularity,
    tallies: BTreeMap<GroupKey, GroupTally>,
    previous: Option<(GroupKey, Status)>,
}

impl Aggregator {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            tallies: BTreeMap::new(),
            previous: None,
        }
    }

    /// Number of distinct keys seen.
    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    pub fn tally(&self, key: &GroupKey) -> Option<&GroupTally> {
        self.tallies.get(key)
    }

    /// Folds one record into the running totals.
    pub fn ingest(&mut self, record: &Record) {
        let key = GroupKey::for_record(record, self.granularity);
        let status = record.status;

        let tally = self.tallies.entry(key.clone()).or_default();
        tally.status_counts.increment(status);

        if status.is_online() {
            tally.online_time += 1;
        }

        // Only the immediately preceding record counts, and only for the same key.
        if let Some((prev_key, prev_status)) = &self.previous {
            if *prev_key == key && *prev_status == Status::Available && status == Status::Charging
            {
                tally.charging_cycles += 1;
                debug!(location = %key.location, charger = ?key.charger_id, "Charging cycle");
            }
        }

        self.previous = Some((key, status));
    }

    /// Builds the report. Locations come in declaration order, groups within a
    /// location in charger id order.
    pub fn summarize(&self, suspended_mode: SuspendedMode) -> Summary {
        let mut locations: Vec<LocationSummary> = Vec::new();

        for (key, tally) in &self.tallies {
            let group = GroupSummary {
                charger_id: key.charger_id.clone(),
                status_counts: tally.status_counts,
                charging_cycles: tally.charging_cycles,
                online_time: tally.online_time,
                rates: Rates::compute(&tally.status_counts, tally.online_time, suspended_mode),
            };

            // Keys are sorted by location first, so a new location always
            // starts a new section.
            match locations.last_mut() {
                Some(section) if section.location == key.location => section.groups.push(group),
                _ => locations.push(LocationSummary {
                    location: key.location,
                    groups: vec![group],
                }),
            }
        }

        Summary {
            granularity: self.granularity,
            suspended_mode,
            locations,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(Granularity::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Location;

    fn record(location: Location, charger: &str, status: Status) -> Record {
        Record {
            location,
            charger_id: charger.to_string(),
            status,
        }
    }

    fn charger_key(location: Location, charger: &str) -> GroupKey {
        GroupKey {
            location,
            charger_id: Some(charger.to_string()),
        }
    }

    fn ingest_all(aggregator: &mut Aggregator, records: &[Record]) {
        for r in records {
            aggregator.ingest(r);
        }
    }

    #[test]
    fn test_worked_example() {
        let mut agg = Aggregator::new(Granularity::Charger);
        ingest_all(
            &mut agg,
            &[
                record(Location::Arnhem, "C1", Status::Available),
                record(Location::Arnhem, "C1", Status::Charging),
                record(Location::Arnhem, "C1", Status::Offline),
            ],
        );

        let tally = agg.tally(&charger_key(Location::Arnhem, "C1")).unwrap();
        assert_eq!(tally.status_counts.available, 1);
        assert_eq!(tally.status_counts.charging, 1);
        assert_eq!(tally.status_counts.offline, 1);
        assert_eq!(tally.charging_cycles, 1);
        assert_eq!(tally.online_time, 2);

        let summary = agg.summarize(SuspendedMode::Direct);
        let rates = summary.locations[0].groups[0].rates;
        assert_eq!(rates.offline, 50.0);
        assert_eq!(rates.occupancy, 50.0);
        assert_eq!(rates.functioning, 100.0);
    }

    #[test]
    fn test_empty_aggregator() {
        let agg = Aggregator::default();
        assert!(agg.is_empty());
        assert_eq!(agg.len(), 0);
        assert!(agg.summarize(SuspendedMode::Direct).is_empty());
    }

    #[test]
    fn test_cycle_requires_adjacent_same_key() {
        let mut agg = Aggregator::new(Granularity::Charger);
        ingest_all(
            &mut agg,
            &[
                record(Location::Arnhem, "C1", Status::Available),
                record(Location::Arnhem, "C2", Status::Available),
                record(Location::Arnhem, "C1", Status::Charging),
                record(Location::Arnhem, "C2", Status::Charging),
            ],
        );

        assert_eq!(agg.tally(&charger_key(Location::Arnhem, "C1")).unwrap().charging_cycles, 0);
        assert_eq!(agg.tally(&charger_key(Location::Arnhem, "C2")).unwrap().charging_cycles, 0);
    }

    #[test]
    fn test_cycle_only_for_available_to_charging() {
        let mut agg = Aggregator::new(Granularity::Charger);
        ingest_all(
            &mut agg,
            &[
                record(Location::Arnhem, "C1", Status::Charging),
                record(Location::Arnhem, "C1", Status::Charging),
                record(Location::Arnhem, "C1", Status::SuspendedEv),
                record(Location::Arnhem, "C1", Status::Charging),
                record(Location::Arnhem, "C1", Status::Available),
                record(Location::Arnhem, "C1", Status::Charging),
                record(Location::Arnhem, "C1", Status::Available),
                record(Location::Arnhem, "C1", Status::Charging),
            ],
        );

        assert_eq!(agg.tally(&charger_key(Location::Arnhem, "C1")).unwrap().charging_cycles, 2);
    }

    #[test]
    fn test_same_charger_id_at_different_locations_are_separate_keys() {
        let mut agg = Aggregator::new(Granularity::Charger);
        ingest_all(
            &mut agg,
            &[
                record(Location::Arnhem, "C1", Status::Available),
                record(Location::Eindhoven, "C1", Status::Charging),
            ],
        );

        assert_eq!(agg.len(), 2);
        let eindhoven = agg.tally(&charger_key(Location::Eindhoven, "C1")).unwrap();
        assert_eq!(eindhoven.charging_cycles, 0);
    }

    #[test]
    fn test_location_granularity_merges_chargers() {
        let mut agg = Aggregator::new(Granularity::Location);
        ingest_all(
            &mut agg,
            &[
                record(Location::Arnhem, "C1", Status::Available),
                record(Location::Arnhem, "C2", Status::Charging),
                record(Location::Eindhoven, "C3", Status::Offline),
            ],
        );

        assert_eq!(agg.len(), 2);
        let arnhem = agg
            .tally(&GroupKey {
                location: Location::Arnhem,
                charger_id: None,
            })
            .unwrap();
        // Adjacent records share the location key, so this is a cycle here.
        assert_eq!(arnhem.charging_cycles, 1);
        assert_eq!(arnhem.online_time, 2);
    }

    #[test]
    fn test_counts_sum_to_records_per_key() {
        let mut agg = Aggregator::new(Granularity::Charger);
        let statuses = [
            Status::Available,
            Status::Offline,
            Status::SuspendedEv,
            Status::Charging,
            Status::Offline,
        ];
        for (i, status) in statuses.iter().enumerate() {
            let charger = if i % 2 == 0 { "A" } else { "B" };
            agg.ingest(&record(Location::Eindhoven, charger, *status));
        }

        let a = agg.tally(&charger_key(Location::Eindhoven, "A")).unwrap();
        let b = agg.tally(&charger_key(Location::Eindhoven, "B")).unwrap();
        assert_eq!(a.status_counts.total(), 3);
        assert_eq!(b.status_counts.total(), 2);
        assert!(a.charging_cycles <= a.status_counts.total());
        assert!(a.online_time <= a.status_counts.total());
    }

    #[test]
    fn test_summary_ordering() {
        let mut agg = Aggregator::new(Granularity::Charger);
        ingest_all(
            &mut agg,
            &[
                record(Location::Eindhoven, "Z", Status::Available),
                record(Location::Arnhem, "B", Status::Available),
                record(Location::Arnhem, "A", Status::Available),
            ],
        );

        let summary = agg.summarize(SuspendedMode::Direct);
        let order: Vec<(Location, Option<&str>)> = summary
            .groups()
            .map(|(l, g)| (l, g.charger_id.as_deref()))
            .collect();
        assert_eq!(
            order,
            vec![
                (Location::Arnhem, Some("A")),
                (Location::Arnhem, Some("B")),
                (Location::Eindhoven, Some("Z")),
            ]
        );
        assert_eq!(summary.locations.len(), 2);
    }

    #[test]
    fn test_all_offline_key_has_zero_rates() {
        let mut agg = Aggregator::new(Granularity::Charger);
        agg.ingest(&record(Location::Arnhem, "C1", Status::Offline));

        let summary = agg.summarize(SuspendedMode::Derived);
        let group = &summary.locations[0].groups[0];
        assert_eq!(group.online_time, 0);
        assert_eq!(group.rates, Rates::default());
    }
}
