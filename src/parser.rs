//! Line parser for charger status observations.
//!
//! A line is a plain comma split with at least five fields. Only three of them
//! matter: `1` is the location, `2` the charger id and `4` the status.

use thiserror::Error;

use crate::record::{Location, Record, Status};

/// Minimum number of comma separated fields in a usable line.
pub const MIN_FIELDS: usize = 5;

const LOCATION_FIELD: usize = 1;
const CHARGER_FIELD: usize = 2;
const STATUS_FIELD: usize = 4;

/// Why a line was not turned into a [`Record`]. Every variant is recoverable:
/// the caller logs the line and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("incomplete line: expected at least {min} fields, found {fields}", min = MIN_FIELDS)]
    Incomplete { fields: usize },

    #[error("unrecognized location: {0:?}")]
    UnrecognizedLocation(String),

    #[error("unrecognized status: {0:?}")]
    UnrecognizedStatus(String),
}

impl ParseError {
    /// `true` for short lines, `false` for lines with a value outside the
    /// location or status sets.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ParseError::Incomplete { .. })
    }
}

/// Parses one raw line.
///
/// Trailing empty fields are dropped before counting, so `a,b,c,d,` has four
/// fields. A line without any comma is a single field, even when empty.
///
/// # Errors
///
/// See [`parse_fields`].
pub fn parse_line(line: &str) -> Result<Record, ParseError> {
    let mut fields: Vec<&str> = line.split(',').collect();
    if fields.len() > 1 {
        while fields.last() == Some(&"") {
            fields.pop();
        }
    }
    parse_fields(fields)
}

/// Validates fields that were already split out of a line.
///
/// # Errors
///
/// Returns [`ParseError::Incomplete`] for fewer than [`MIN_FIELDS`] fields and
/// one of the `Unrecognized*` variants when the location or status is unknown.
pub fn parse_fields<'a, I>(fields: I) -> Result<Record, ParseError>
where
    I: IntoIterator<Item = &'a str>,
{
    let fields: Vec<&str> = fields.into_iter().collect();
    if fields.len() < MIN_FIELDS {
        return Err(ParseError::Incomplete {
            fields: fields.len(),
        });
    }

    let raw_location = fields[LOCATION_FIELD];
    let location: Location = raw_location
        .parse()
        .map_err(|()| ParseError::UnrecognizedLocation(raw_location.trim().to_string()))?;

    let raw_status = fields[STATUS_FIELD];
    let status: Status = raw_status
        .parse()
        .map_err(|()| ParseError::UnrecognizedStatus(raw_status.trim().to_string()))?;

    Ok(Record {
        location,
        charger_id: fields[CHARGER_FIELD].trim().to_string(),
        status,
    })
}
