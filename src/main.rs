//! CLI entry point for the fleet telemetry engine.
//!
//! Provides subcommands for generating one-off fleet snapshots, running the
//! periodic refresh loop, and printing chart-ready alert analytics.

use anyhow::Result;
use clap::{Parser, Subcommand};
use fleet_telemetry_engine::analytics::{aggregate_by_type, aggregate_over_time, compare_periods};
use fleet_telemetry_engine::correlate::resolve_alerts_for_route;
use fleet_telemetry_engine::feed::{DEFAULT_REFRESH_INTERVAL, SnapshotFeed};
use fleet_telemetry_engine::generator::Generator;
use fleet_telemetry_engine::model::{AlertPriority, Snapshot};
use fleet_telemetry_engine::output::{append_snapshot_alerts, print_json, print_pretty};
use fleet_telemetry_engine::palette::{color_for, hex};
use fleet_telemetry_engine::viewport::initial_bounds;
use serde_json::json;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "fleet_telemetry_engine")]
#[command(about = "Simulates a bus fleet and analyzes its alerts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a single fleet snapshot
    Snapshot {
        /// CSV file to append the snapshot's alerts to
        #[arg(short, long)]
        output: Option<String>,

        /// Print the full snapshot as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run the periodic refresh loop, replacing the snapshot each interval
    Watch {
        /// Refresh interval in seconds
        #[arg(short, long, default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs())]
        interval: u64,

        /// Number of snapshots to observe (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 0)]
        samples: usize,

        /// CSV file to append each snapshot's alerts to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Generate a snapshot and print chart-ready alert analytics as JSON
    Analyze,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/fleet_telemetry_engine.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("fleet_telemetry_engine.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Snapshot { output, json } => {
            let snapshot = Generator::new().generate();
            log_snapshot_summary(&snapshot);
            print_pretty(&snapshot);

            if let Some(path) = output {
                append_snapshot_alerts(&path, &snapshot)?;
                info!(path = %path, alerts = snapshot.alerts.len(), "Alerts appended to CSV");
            }
            if json {
                print_json(&snapshot)?;
            }
        }
        Commands::Watch {
            interval,
            samples,
            output,
        } => {
            watch(Duration::from_secs(interval), samples, output).await?;
        }
        Commands::Analyze => {
            let snapshot = Generator::new().generate();
            log_snapshot_summary(&snapshot);

            let report = json!({
                "generated_at": snapshot.generated_at,
                "by_type": aggregate_by_type(&snapshot.alerts),
                "over_time": aggregate_over_time(&snapshot.alerts, snapshot.generated_at),
                "period_comparison": compare_periods(&snapshot.alerts),
            });
            print_json(&report)?;
        }
    }

    Ok(())
}

/// Observes the snapshot feed, logging and optionally exporting each
/// snapshot, until the requested sample count is reached.
async fn watch(interval: Duration, samples: usize, output: Option<String>) -> Result<()> {
    if samples == 0 {
        info!(interval_secs = interval.as_secs(), "Watching infinitely. Press Ctrl+C to stop.");
    } else {
        info!(interval_secs = interval.as_secs(), samples, "Starting watch");
    }

    let feed = SnapshotFeed::start(interval);
    let mut rx = feed.subscribe();
    let mut sample_count = 0;

    loop {
        {
            let snapshot = rx.borrow_and_update();
            sample_count += 1;
            info!(sample = sample_count, "Snapshot received");
            log_snapshot_summary(&snapshot);

            if let Some(ref path) = output {
                append_snapshot_alerts(path, &snapshot)?;
            }
        }

        if samples > 0 && sample_count >= samples {
            break;
        }
        if rx.changed().await.is_err() {
            break;
        }
    }

    feed.stop();
    info!(sample_count, "Finished watching");
    Ok(())
}

fn log_snapshot_summary(snapshot: &Snapshot) {
    let high_priority = snapshot
        .alerts
        .iter()
        .filter(|a| a.priority == AlertPriority::High)
        .count();

    info!(
        routes = snapshot.routes.len(),
        alerts = snapshot.alerts.len(),
        unread = snapshot.unread_alerts(),
        high_priority,
        "Fleet snapshot"
    );

    if let Some(bounds) = initial_bounds(&snapshot.routes) {
        info!(
            south = bounds.south,
            west = bounds.west,
            north = bounds.north,
            east = bounds.east,
            "Fleet bounds"
        );
    }

    for route in &snapshot.routes {
        let matched = resolve_alerts_for_route(route, &snapshot.alerts);
        info!(
            route = %route.id,
            unit = %route.unit_id,
            color = %hex(color_for(&route.route_id)),
            delay = route.delay,
            alerts = matched.len(),
            "Route"
        );
    }
}
