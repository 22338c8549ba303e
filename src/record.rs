//! Closed enumerations and the validated observation record.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A charging site. The set is fixed; unknown names are rejected by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Location {
    Arnhem,
    Eindhoven,
}

impl Location {
    pub const ALL: [Location; 2] = [Location::Arnhem, Location::Eindhoven];

    pub fn as_str(self) -> &'static str {
        match self {
            Location::Arnhem => "ARNHEM",
            Location::Eindhoven => "EINDHOVEN",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = ();

    /// Matches trimmed, case-insensitive names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ARNHEM" => Ok(Location::Arnhem),
            "EINDHOVEN" => Ok(Location::Eindhoven),
            _ => Err(()),
        }
    }
}

/// Charger state reported by one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Available,
    Charging,
    SuspendedEv,
    Offline,
}

impl Status {
    /// Declaration order, which is also the report order.
    pub const ALL: [Status; 4] = [
        Status::Available,
        Status::Charging,
        Status::SuspendedEv,
        Status::Offline,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Available => "AVAILABLE",
            Status::Charging => "CHARGING",
            Status::SuspendedEv => "SUSPENDED_EV",
            Status::Offline => "OFFLINE",
        }
    }

    /// Every status except [`Status::Offline`] counts as online time.
    pub fn is_online(self) -> bool {
        self != Status::Offline
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ();

    /// Matches trimmed, case-insensitive names. `SUSPENDEDEV` is what older
    /// exports write for `SUSPENDED_EV`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AVAILABLE" => Ok(Status::Available),
            "CHARGING" => Ok(Status::Charging),
            "SUSPENDED_EV" | "SUSPENDEDEV" => Ok(Status::SuspendedEv),
            "OFFLINE" => Ok(Status::Offline),
            _ => Err(()),
        }
    }
}

/// One validated observation. Lives only while its line is being ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub location: Location,
    pub charger_id: String,
    pub status: Status,
}
