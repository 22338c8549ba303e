use serde::Serialize;

use crate::analyzers::types::SuspendedMode;
use crate::record::Status;

/// Number of observations per [`Status`] for one grouping key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub available: u64,
    pub charging: u64,
    pub suspended_ev: u64,
    pub offline: u64,
}

impl StatusCounts {
    pub fn get(&self, status: Status) -> u64 {
        match status {
            Status::Available => self.available,
            Status::Charging => self.charging,
            Status::SuspendedEv => self.suspended_ev,
            Status::Offline => self.offline,
        }
    }

    pub fn increment(&mut self, status: Status) {
        match status {
            Status::Available => self.available += 1,
            Status::Charging => self.charging += 1,
            Status::SuspendedEv => self.suspended_ev += 1,
            Status::Offline => self.offline += 1,
        }
    }

    /// All observations for the key, whatever their status.
    pub fn total(&self) -> u64 {
        self.available + self.charging + self.suspended_ev + self.offline
    }

    /// `(status, count)` pairs in report order, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (Status, u64)> + '_ {
        Status::ALL
            .into_iter()
            .map(move |status| (status, self.get(status)))
    }
}

/// Percentage-of-time metrics for one grouping key.
///
/// Every rate uses the online-time tally as its denominator, including the
/// offline rate. When nothing was online all rates are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rates {
    pub functioning: f64,
    pub offline: f64,
    pub suspended: f64,
    pub occupancy: f64,
}

impl Rates {
    pub fn compute(counts: &StatusCounts, online_time: u64, mode: SuspendedMode) -> Self {
        if online_time == 0 {
            return Self::default();
        }

        let functioning = pct(counts.available + counts.charging, online_time);
        let offline = pct(counts.offline, online_time);
        let suspended = match mode {
            SuspendedMode::Direct => pct(counts.suspended_ev, online_time),
            SuspendedMode::Derived => 100.0 - functioning - offline,
        };

        Rates {
            functioning,
            offline,
            suspended,
            occupancy: pct(counts.charging, online_time),
        }
    }
}

pub fn pct(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}
