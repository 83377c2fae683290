// Indoor Asset Simulator - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/indoor-asset-simulator --boundary building.geojson
// ```
//
// Or streaming to an ingestion endpoint:
//
// ```console
// $ ./target/release/indoor-asset-simulator --boundary building.geojson --endpoint http://localhost:6180/receiver --verbose
// ```

use anyhow::{Context, Result};
use clap::Parser;
use indoor_asset_simulator::events::{EventSink, HttpEventSink, LogSink};
use indoor_asset_simulator::facility::BoundaryShape;
use indoor_asset_simulator::simulation::{
    LoggingConfig, SimulationOrchestrator, SimulationResult, SimulationStatistics,
};
use indoor_asset_simulator::types::config::CliArgs;
use indoor_asset_simulator::types::{AssetCategory, SimulationConfig};
use std::process;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    if args.print_config {
        match SimulationConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    let _log_guard = match LoggingConfig::from_flags(
        args.verbose,
        args.debug,
        args.json_logs,
        args.log_dir.as_deref(),
    )
    .init()
    {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Starting Indoor Asset Simulator");

    let dry_run = args.dry_run;
    let config = match load_config(args) {
        Ok(config) => config,
        Err(e) => {
            error!(category = e.category(), "Failed to load configuration: {}", e);
            eprintln!("{} error: {}", e.category(), e);
            process::exit(1);
        }
    };

    info!("Configuration loaded and validated successfully");

    if let Err(e) = run(config, dry_run).await {
        error!("Simulation failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }

    info!("Indoor Asset Simulator stopped");
}

/// Layer CLI arguments over the config file and defaults, then validate
fn load_config(args: CliArgs) -> SimulationResult<SimulationConfig> {
    let config = SimulationConfig::from_cli_args(args)?;
    config.validate()?;
    Ok(config)
}

/// Load the boundary, build the walkers and run them until Ctrl-C
async fn run(config: SimulationConfig, dry_run: bool) -> Result<()> {
    let boundary_path = config
        .boundary_path
        .clone()
        .context("No boundary given; pass --boundary <file.geojson> or set boundary_path")?;
    let boundary = BoundaryShape::from_geojson_file(&boundary_path)
        .with_context(|| format!("Failed to load boundary from {}", boundary_path))?;

    let sink = build_sink(&config)?;
    let sink_name = sink.name();

    let mut orchestrator = SimulationOrchestrator::new(config.clone(), boundary, sink)
        .context("Failed to initialize simulation")?;
    let walkers = orchestrator.prepare().context("Failed to prepare walkers")?;

    print_configuration_summary(&config, sink_name);
    if let Some(stats) = orchestrator.population_stats() {
        eprintln!("{}", stats);
        for category in AssetCategory::ALL {
            if stats.count(category) == 0 {
                warn!(category = %category, "No assets generated for category");
            }
        }
    }
    eprintln!();

    if dry_run {
        eprintln!("Configuration and boundary are valid, {} walkers prepared.", walkers);
        eprintln!("Dry run mode - simulation will not be executed.");
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                trigger.cancel();
            }
            Err(e) => error!(error = %e, "Failed to listen for ctrl_c signal"),
        }
    });

    eprintln!("Running {} walkers, press Ctrl-C to stop.", walkers);
    let statistics = orchestrator.run(cancel).await.context("Simulation run failed")?;
    print_final_statistics(&statistics);

    Ok(())
}

/// HTTP sink when an endpoint is configured, log sink otherwise
fn build_sink(config: &SimulationConfig) -> Result<Arc<dyn EventSink>> {
    match &config.endpoint {
        Some(endpoint) => {
            let sink = HttpEventSink::new(endpoint.clone(), config.request_timeout())
                .context("Failed to build HTTP client")?;
            info!(endpoint = %endpoint, "Posting location events over HTTP");
            Ok(Arc::new(sink))
        }
        None => {
            info!("No endpoint configured, writing location events to the log");
            Ok(Arc::new(LogSink))
        }
    }
}

/// Print configuration summary
fn print_configuration_summary(config: &SimulationConfig, sink_name: &str) {
    eprintln!("Indoor Asset Simulator");
    eprintln!("======================");
    eprintln!("Configuration:");
    eprintln!("  Target Asset Count: {}", config.asset_count);
    eprintln!("  Floor: {}", config.floor);
    eprintln!("  WKID: {}", config.wkid);
    eprintln!("  Sink: {}", sink_name);
    if let Some(endpoint) = &config.endpoint {
        eprintln!("  Endpoint: {}", endpoint);
    }
    eprintln!("  Tick Interval: {} ms", config.sleep_ms);
    eprintln!("  Step Size: {}", config.step_size);
    eprintln!("  Heading Jitter: ±{}°", config.heading_jitter_degrees);
    eprintln!(
        "  Reflection: {}° - {}° (max {} attempts)",
        config.reflection_min_degrees, config.reflection_max_degrees, config.max_reflection_attempts
    );
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    eprintln!();
}

/// Print final run statistics
fn print_final_statistics(statistics: &SimulationStatistics) {
    eprintln!();
    eprintln!("{}", statistics);
}
