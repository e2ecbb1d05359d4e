//! prodview - Well Production Reporting Service
//!
//! Loads the all-wells production table once and serves the dashboard API,
//! or prints a one-off text report.
//!
//! # Usage
//!
//! ```bash
//! # Serve the dashboard API on the configured address
//! prodview --data data/all_wells.csv
//!
//! # Text report for one well on one date
//! prodview report --well W-03 --date 2024-02-14
//!
//! # Same view as JSON
//! prodview report --json
//!
//! # Effective configuration after file lookup and defaults
//! prodview config > prodview.toml
//! ```
//!
//! # Environment Variables
//!
//! - `PRODVIEW_CONFIG`: Path to the TOML config file
//! - `PRODVIEW_SERVER_ADDR`: Override the HTTP bind address
//! - `PRODVIEW_CORS_ORIGINS`: Comma-separated allowed origins
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use prodview::api::{create_app, DashboardState};
use prodview::config::DashboardConfig;
use prodview::{build_view, load_dataset, pipeline, report, Dataset};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "prodview")]
#[command(about = "Well production reporting: cumulative volumes, revenue and opportunity scoring")]
#[command(version)]
struct CliArgs {
    /// Path to the TOML config file (overrides PRODVIEW_CONFIG and ./prodview.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the production CSV (overrides data.path from config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Serve the dashboard JSON API (default)
    Serve {
        /// Override the server address (default: "0.0.0.0:8080")
        #[arg(short, long)]
        addr: Option<String>,
    },

    /// Print the dashboard view for one selection and exit
    Report {
        /// Well id; omit for all wells
        #[arg(long)]
        well: Option<String>,
        /// Snapshot date (YYYY-MM-DD); omit for the latest date of the selection
        #[arg(long)]
        date: Option<String>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved configuration as TOML and exit
    Config,
}

// ============================================================================
// Commands
// ============================================================================

async fn run_server(dataset: Dataset, config: DashboardConfig, addr_override: Option<String>) -> Result<()> {
    let server_addr = addr_override.unwrap_or_else(|| config.server_addr());

    let app = create_app(DashboardState::new(dataset, config));
    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", server_addr))?;
    info!("✓ HTTP server listening on {}", server_addr);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await;

    match result {
        Ok(()) => {
            info!("[HttpServer] Graceful shutdown complete");
            Ok(())
        }
        Err(e) => {
            error!("[HttpServer] Server error: {}", e);
            Err(anyhow::anyhow!("HTTP server error: {}", e))
        }
    }
}

fn run_report(
    dataset: &Dataset,
    config: &DashboardConfig,
    well: Option<&str>,
    date: Option<&str>,
    json: bool,
) -> Result<()> {
    let selection = pipeline::filter::resolve_selection(dataset, well.unwrap_or_default())?;
    let date = date
        .map(|raw| {
            prodview::ingest::parse_date(raw)
                .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw))
        })
        .transpose()?;

    let view = build_view(dataset, &config.scoring, &selection, date)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", report::render_text(&view));
    }
    Ok(())
}

fn load_production_data(config: &DashboardConfig) -> Result<Dataset> {
    let data_path = &config.data.path;
    info!(
        path = %data_path.display(),
        brent = config.pricing.brent_usd_per_bbl,
        gas = config.pricing.gas_usd_per_mcf,
        "Loading production data"
    );
    let dataset = load_dataset(data_path, config).context("Failed to load production data")?;
    info!(
        observations = dataset.len(),
        wells = dataset.wells().len(),
        dates = dataset.dates().len(),
        "✓ Production dataset ready"
    );
    Ok(dataset)
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let mut config =
        DashboardConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = args.data {
        config.data.path = path;
    }

    match args.command.unwrap_or(SubCommand::Serve { addr: None }) {
        SubCommand::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        SubCommand::Report { well, date, json } => {
            let dataset = load_production_data(&config)?;
            run_report(&dataset, &config, well.as_deref(), date.as_deref(), json)
        }
        SubCommand::Serve { addr } => {
            let dataset = load_production_data(&config)?;
            run_server(dataset, config, addr).await
        }
    }
}
