use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::{error, info};

use crate::analyzers::aggregate::Aggregator;
use crate::analyzers::types::{Granularity, IngestStats};
use crate::parser::{ParseError, parse_line};

/// Options for one pass over an input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    pub granularity: Granularity,
    /// Treat the first line as a header row and skip it.
    pub has_headers: bool,
}

/// Result of one pass: the aggregation state plus what happened on the way.
#[derive(Debug)]
pub struct Processed {
    pub aggregator: Aggregator,
    pub stats: IngestStats,
    /// Set when reading stopped early because of an I/O failure. Whatever was
    /// aggregated before the failure is still in `aggregator`.
    pub io_error: Option<String>,
}

/// Reads and aggregates the file at `path`.
///
/// Never fails: an input that cannot be opened is logged and yields an empty
/// aggregation.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn process_file(path: &Path, options: ProcessOptions) -> Processed {
    match File::open(path) {
        Ok(file) => process_reader(file, options),
        Err(e) => {
            error!(error = %e, "Error reading file");
            Processed {
                aggregator: Aggregator::new(options.granularity),
                stats: IngestStats::default(),
                io_error: Some(e.to_string()),
            }
        }
    }
}

/// Aggregates every line of `reader` in order.
///
/// Lines are split on `\n` (a trailing `\r` is dropped) and decoded lossily,
/// so bad bytes in ignored columns never cost a record. Short lines, blank ones
/// included, and lines with unknown locations or statuses are logged and
/// skipped. An I/O error stops the pass; the partial aggregation is returned.
pub fn process_reader<R: Read>(reader: R, options: ProcessOptions) -> Processed {
    let mut aggregator = Aggregator::new(options.granularity);
    let mut stats = IngestStats::default();
    let mut io_error = None;

    for (index, raw) in BufReader::new(reader).split(b'\n').enumerate() {
        let mut raw = match raw {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "Error reading file");
                io_error = Some(e.to_string());
                break;
            }
        };
        if options.has_headers && index == 0 {
            continue;
        }
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }

        stats.lines_read += 1;
        let line_number = index as u64 + 1;
        let line = String::from_utf8_lossy(&raw);

        match parse_line(&line) {
            Ok(record) => {
                aggregator.ingest(&record);
                stats.records_ingested += 1;
            }
            Err(e) => {
                log_skipped(line_number, &line, &e);
                if e.is_incomplete() {
                    stats.incomplete += 1;
                } else {
                    stats.unrecognized += 1;
                }
            }
        }
    }

    info!(
        lines_read = stats.lines_read,
        records_ingested = stats.records_ingested,
        incomplete = stats.incomplete,
        unrecognized = stats.unrecognized,
        keys = aggregator.len(),
        "Input processed"
    );

    Processed {
        aggregator,
        stats,
        io_error,
    }
}

fn log_skipped(line_number: u64, line: &str, e: &ParseError) {
    if e.is_incomplete() {
        info!(line_number, line, "Skipping incomplete line");
    } else {
        info!(line_number, line, reason = %e, "Invalid data line - skipping line");
    }
}
