mod aggregate;
mod cli;
mod config;
mod error;
mod hours;
mod model;
mod report;
mod snapshot;
mod timeline;
mod timezone;
mod windows;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use config::Config;
use report::ReportEngine;
use snapshot::Snapshot;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse_args();

    if args.help {
        cli::print_help();
        return Ok(());
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("storepulse=info".parse().unwrap()),
        )
        .init();

    info!("StorePulse report engine v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");
    info!("  Poll snapshot: {}", config.polls_path);
    info!("  Business hours: {}", config.business_hours_path);
    info!("  Timezones: {}", config.timezones_path);
    info!("  Default zone: {}", config.default_timezone);

    // Handle --validate mode
    if args.validate {
        info!("Validating configuration...");
        match config.validate() {
            Ok(()) => {
                info!("Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        }
    }

    let anchor_override: Option<DateTime<Utc>> = match &args.anchor {
        Some(raw) => Some(
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .with_context(|| format!("--anchor '{}' is not a valid RFC 3339 instant", raw))?,
        ),
        None => None,
    };

    // Take the input snapshot and build the run
    let snap = Snapshot::load(&config)?;
    info!(
        "Snapshot loaded: {} polls, {} business-hours rows, {} timezone rows",
        snap.polls.len(),
        snap.hours.len(),
        snap.timezones.len()
    );

    let engine = Arc::new(ReportEngine::build(snap, config.default_zone()?, anchor_override)?);
    info!("Anchor instant: {}", engine.anchor());

    // Cancel the run on ctrl-c; partial results are simply discarded
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling report run");
                cancel.cancel();
            }
        });
    }

    let rows = engine.compute_report_parallel(cancel).await?;

    let out_path = args.out.unwrap_or(config.report_path);
    if args.json {
        report::write_json(&rows, Path::new(&out_path))?;
    } else {
        report::write_csv(&rows, Path::new(&out_path))?;
    }
    info!("Report written: {} rows -> {}", rows.len(), out_path);

    Ok(())
}
