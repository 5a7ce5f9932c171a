//! Match clock server.
//!
//! Runs the engine on its own tick loop, feeds it lines from a siren button
//! device or stdin, writes results to CSV and shuts down on Ctrl+C.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use uwh_clock_core::{
    ClockConfig, CsvResultsObserver, MatchEngine, ResultsLog, RuntimeConfig, SystemWallClock,
    TracingObserver,
};
use uwh_clock_runtime::{spawn_listener, Runtime};

/// Command-line arguments for the clock server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (JSON). Defaults are used when it does not exist.
    #[arg(short, long, default_value = "./settings.json")]
    settings: PathBuf,

    /// Directory for results.csv and penalties.csv
    #[arg(long, default_value = "./results")]
    results_dir: PathBuf,

    /// Tick rate for runtime loop (Hz)
    #[arg(long, default_value_t = 20)]
    tickrate: u32,

    /// Maximum commands applied per tick
    #[arg(long, default_value_t = 64)]
    max_commands_per_tick: u32,

    /// Siren button device to read lines from instead of stdin
    #[arg(long)]
    device: Option<PathBuf>,

    /// Print a JSON snapshot every N seconds (0 disables)
    #[arg(long, default_value_t = 0)]
    status_interval_secs: u64,
}

fn load_settings(path: &PathBuf) -> anyhow::Result<ClockConfig> {
    let mut config = if path.exists() {
        ClockConfig::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?
    } else {
        tracing::info!("No settings file at {}, using defaults", path.display());
        ClockConfig::default()
    };
    config
        .apply_env_overrides()
        .context("Invalid setting in environment")?;
    config.validate().context("Invalid settings")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Initialize tracing subscriber for logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_settings(&args.settings)?;
    let results = ResultsLog::open(&args.results_dir).with_context(|| {
        format!(
            "Failed to open results directory {}",
            args.results_dir.display()
        )
    })?;

    let engine = MatchEngine::new(config, SystemWallClock)?
        .with_observer(TracingObserver)
        .with_observer(CsvResultsObserver::new(results));

    let runtime_config = RuntimeConfig {
        tickrate: args.tickrate,
        max_commands_per_tick: args.max_commands_per_tick,
    };
    let mut runtime = Runtime::new(engine, runtime_config)?;
    let handle = runtime.handle();
    let shutdown = runtime.shutdown_flag();

    // Spawn runtime thread
    let runtime_thread = thread::Builder::new()
        .name("runtime".to_string())
        .spawn(move || {
            if let Err(e) = runtime.run() {
                tracing::error!("Runtime loop fatal error: {}", e);
                std::process::exit(1);
            }
        })
        .context("Failed to spawn runtime thread")?;

    // Input lines. The listener thread is left blocked on read at shutdown.
    match &args.device {
        Some(path) => {
            let device = File::open(path)
                .with_context(|| format!("Failed to open device {}", path.display()))?;
            spawn_listener("device", handle.clone(), BufReader::new(device))?;
        }
        None => {
            spawn_listener("stdin", handle.clone(), BufReader::new(io::stdin()))?;
        }
    }

    println!("Starting match clock...");
    println!("  Settings: {}", args.settings.display());
    println!("  Results: {}", args.results_dir.display());
    println!("  Tickrate: {} Hz", args.tickrate);
    match &args.device {
        Some(path) => println!("  Input: {}", path.display()),
        None => println!("  Input: stdin"),
    }

    let status_handle = (args.status_interval_secs > 0).then(|| {
        let handle = handle.clone();
        let period = Duration::from_secs(args.status_interval_secs);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let Some(snapshot) = handle.latest_snapshot() else {
                    continue;
                };
                match serde_json::to_string(&snapshot) {
                    Ok(json) => println!("{}", json),
                    Err(e) => tracing::warn!("Failed to serialize snapshot: {}", e),
                }
            }
        })
    });

    // Wait for Ctrl+C
    signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c")?;
    println!("\nShutting down match clock...");

    if let Some(status_handle) = status_handle {
        status_handle.abort();
    }
    shutdown.store(true, Ordering::Relaxed);
    if runtime_thread.join().is_err() {
        tracing::error!("Runtime thread panicked");
    }
    if handle.dropped_commands() > 0 {
        tracing::warn!(dropped = handle.dropped_commands(), "Commands were dropped");
    }

    Ok(())
}
