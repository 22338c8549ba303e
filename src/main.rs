//! CLI entry point for the charger status report.
//!
//! Reads a CSV log of charger status observations, aggregates it per charger
//! or per location, and prints the summary.

use anyhow::Result;
use charger_stats::analyzers::analyzer::{ProcessOptions, process_file};
use charger_stats::analyzers::types::{Granularity, SuspendedMode};
use charger_stats::output::{append_summary, print_json, print_text};
use clap::{Parser, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "charger_stats")]
#[command(about = "Summarize EV charger status observations", long_about = None)]
struct Cli {
    /// CSV file with one status observation per line
    #[arg(
        value_name = "FILE",
        env = "CHARGER_DATA_FILE",
        default_value = "src/main/resources/datafile.csv"
    )]
    input: PathBuf,

    /// Aggregate per charger or per location
    #[arg(long, value_enum, env = "CHARGER_GROUP_BY", default_value_t = Granularity::Charger)]
    group_by: Granularity,

    /// How the suspended percentage is computed
    #[arg(long, value_enum, env = "CHARGER_SUSPENDED_MODE", default_value_t = SuspendedMode::Direct)]
    suspended: SuspendedMode,

    /// Report format written to stdout
    #[arg(long, value_enum, env = "CHARGER_REPORT_FORMAT", default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Optional: CSV file to append one row per group to
    #[arg(long, value_name = "PATH", env = "CHARGER_CSV_OUTPUT")]
    csv_output: Option<PathBuf>,

    /// Skip the first line of the input as a header row
    #[arg(long, env = "CHARGER_HAS_HEADERS", default_value_t = false)]
    has_headers: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing();

    let cli = Cli::parse();
    info!(
        input = %cli.input.display(),
        group_by = ?cli.group_by,
        suspended = ?cli.suspended,
        "Processing charger data"
    );

    let processed = process_file(
        &cli.input,
        ProcessOptions {
            granularity: cli.group_by,
            has_headers: cli.has_headers,
        },
    );
    if processed.io_error.is_some() {
        warn!("Input was not read completely, reporting partial results");
    }

    let summary = processed.aggregator.summarize(cli.suspended);

    match cli.format {
        ReportFormat::Text => print_text(&summary),
        ReportFormat::Json => print_json(&summary)?,
    }

    if let Some(path) = &cli.csv_output {
        append_summary(path, &summary)?;
        info!(path = %path.display(), "Summary appended");
    }

    Ok(())
}

/// Logging setup: colored stderr, plus a JSON rolling log file when
/// `LOG_FILE_PATH` is set.
fn init_tracing() -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info"));

    let (json_layer, guard) = match std::env::var("LOG_FILE_PATH") {
        Ok(log_file_path) => {
            let log_dir = Path::new(&log_file_path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("logs"));
            let log_file_name = Path::new(&log_file_path)
                .file_name()
                .unwrap_or(OsStr::new("charger_stats.log"));

            let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(non_blocking_file)
                .with_filter(env_filter("RUST_LOG_JSON", "debug"));
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}

/// Filter from the directives in `var`, or `default` when it is unset or invalid.
fn env_filter(var: &str, default: &str) -> EnvFilter {
    filter_or_default(std::env::var(var).ok().as_deref(), default)
}

fn filter_or_default(directives: Option<&str>, default: &str) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default))
}
