//! Output formatting and persistence for charger summaries.
//!
//! Supports the plain text report, JSON serialization, and CSV append.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

use crate::analyzers::types::{GroupSummary, Summary};
use crate::record::Location;

const HEADER: &str = "=== Summary of charger status ===";

/// Renders the human readable report.
pub fn render_text(summary: &Summary) -> String {
    let mut out = format!("{HEADER}\n");

    for location in &summary.locations {
        out.push_str(&format!("{}:\n", location.location));
        for group in &location.groups {
            let indent = match &group.charger_id {
                Some(charger) => {
                    out.push_str(&format!("  {charger}:\n"));
                    "    "
                }
                None => "  ",
            };
            out.push_str(&render_group(indent, group));
        }
    }

    out
}

fn render_group(indent: &str, group: &GroupSummary) -> String {
    let mut out = String::new();
    for (status, count) in group.status_counts.iter() {
        out.push_str(&format!("{indent}{status}: {count}\n"));
    }
    let rates = &group.rates;
    out.push_str(&format!("{indent}Charging cycles: {}\n", group.charging_cycles));
    out.push_str(&format!("{indent}% Time functioning: {:.2}%\n", rates.functioning));
    out.push_str(&format!("{indent}% Time offline: {:.2}%\n", rates.offline));
    out.push_str(&format!("{indent}% Time suspended: {:.2}%\n", rates.suspended));
    out.push_str(&format!(
        "{indent}% Time user spent in charging state: {:.2}%\n",
        rates.occupancy
    ));
    out
}

/// Prints the text report to stdout.
pub fn print_text(summary: &Summary) {
    print!("{}", render_text(summary));
}

/// Serializes the summary as pretty-printed JSON.
pub fn render_json(summary: &Summary) -> Result<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Prints the summary as pretty-printed JSON to stdout.
pub fn print_json(summary: &Summary) -> Result<()> {
    println!("{}", render_json(summary)?);
    Ok(())
}

/// One flattened CSV row per group.
#[derive(Serialize)]
struct SummaryRow<'a> {
    location: Location,
    charger_id: Option<&'a str>,
    available: u64,
    charging: u64,
    suspended_ev: u64,
    offline: u64,
    charging_cycles: u64,
    online_time: u64,
    functioning_pct: f64,
    offline_pct: f64,
    suspended_pct: f64,
    occupancy_pct: f64,
}

impl<'a> SummaryRow<'a> {
    fn new(location: Location, group: &'a GroupSummary) -> Self {
        let counts = &group.status_counts;
        Self {
            location,
            charger_id: group.charger_id.as_deref(),
            available: counts.available,
            charging: counts.charging,
            suspended_ev: counts.suspended_ev,
            offline: counts.offline,
            charging_cycles: group.charging_cycles,
            online_time: group.online_time,
            functioning_pct: group.rates.functioning,
            offline_pct: group.rates.offline,
            suspended_pct: group.rates.suspended,
            occupancy_pct: group.rates.occupancy,
        }
    }
}

/// Appends every group of `summary` as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summary(path: &Path, summary: &Summary) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending summary rows");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // header only for a fresh file
        .from_writer(file);

    for (location, group) in summary.groups() {
        writer.serialize(SummaryRow::new(location, group))?;
    }
    writer.flush()?;

    Ok(())
}
