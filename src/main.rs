// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use clap::Parser;
use netbox_pdns_sync::{
    config::Config,
    constants::{DEFAULT_CONFIG_PATH, EXIT_CODE_FAULTS, EXIT_CODE_INTERRUPTED},
    http::build_client,
    metrics::gather_metrics,
    netbox::NetboxClient,
    powerdns::PowerDnsClient,
    report::Reporter,
    sync::SyncEngine,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reconcile PowerDNS zones against NetBox
#[derive(Debug, Parser)]
#[command(name = "netbox-pdns-sync")]
#[command(version)]
#[command(about = "Reconcile PowerDNS zones against NetBox", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, env = "NETBOX_PDNS_SYNC_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Classify and report only; make no changes in PowerDNS
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Restrict the run to this zone (repeatable)
    #[arg(short, long = "zone", value_name = "ZONE")]
    zones: Vec<String>,

    /// Write Prometheus metrics in text format to this file after the run
    #[arg(long, value_name = "PATH")]
    metrics_file: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Zones are processed one at a time
    let runtime = tokio::runtime::Builder::new_current_thread()
        .thread_name("netbox-pdns-sync")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cli))
}

/// Initialize logging.
///
/// Respects `RUST_LOG` (default `info`) and `RUST_LOG_FORMAT=json`. Logs go
/// to stderr; stdout carries the run report.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(cli: Cli) -> Result<ExitCode> {
    init_tracing();
    info!("Starting NetBox to PowerDNS sync");

    let mut config = Config::load(&cli.config)?;
    if cli.dry_run {
        config.dry_run = true;
    }
    debug!(
        config = %cli.config.display(),
        strategy = ?config.strategy,
        dry_run = config.dry_run,
        "Configuration loaded"
    );

    let client = build_client(&config.http, config.ca_bundle.as_deref())?;
    let inventory = Arc::new(NetboxClient::new(
        client.clone(),
        config.netbox.clone(),
        config.http.clone(),
    ));
    let store = Arc::new(PowerDnsClient::new(
        client,
        config.powerdns.clone(),
        config.http.clone(),
    ));
    let engine = SyncEngine::new(&config, inventory, store);
    let mut reporter = Reporter::new(std::io::stdout());

    let summary = tokio::select! {
        summary = engine.run(&cli.zones, &mut reporter) => summary,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, mutations already applied stay applied");
            return Ok(ExitCode::from(EXIT_CODE_INTERRUPTED));
        }
    };

    if let Some(path) = &cli.metrics_file {
        write_metrics(path).await?;
    }

    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(
            zone_faults = summary.zone_faults.len(),
            mutation_failures = summary.mutation_failures.len(),
            "Sync finished with faults"
        );
        Ok(ExitCode::from(EXIT_CODE_FAULTS))
    }
}

/// Write the metrics text exposition to `path`.
async fn write_metrics(path: &Path) -> Result<()> {
    let text = gather_metrics().context("Failed to encode metrics")?;
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write metrics file {}", path.display()))?;
    debug!(path = %path.display(), "Metrics written");
    Ok(())
}
