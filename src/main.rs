//! Node pool command line.
//!
//! ```text
//! node-pool --node 127.0.0.1:8848 --node 127.0.0.1:9988 check
//! node-pool --config pool.toml watch
//! ```
//!
//! `check` runs one health sweep and prints the result; `watch` keeps the
//! pool running and logs its status every interval until interrupted.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use node_pool::config::loader::{load_config, ConfigError};
use node_pool::config::validation::validate_config;
use node_pool::lifecycle::signals::wait_for_termination;
use node_pool::observability::{logging::init_logging, metrics};
use node_pool::{NodeManager, PoolConfig, PoolStatus, TracingLog};

#[derive(Parser)]
#[command(name = "node-pool")]
#[command(about = "Track which cluster nodes are reachable", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Candidate node as host:port; repeatable. Replaces the configured list.
    #[arg(short, long = "node")]
    nodes: Vec<String>,

    /// Health check interval in seconds.
    #[arg(short, long)]
    interval: Option<u64>,

    /// Print status as JSON.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe every node once and print the result
    Check,
    /// Keep probing and report status until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => PoolConfig::default(),
    };
    if !cli.nodes.is_empty() {
        config.nodes = cli.nodes.clone();
    }
    if let Some(interval) = cli.interval {
        config.health_check.interval_secs = interval;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability);
    tracing::info!("node-pool v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let manager = NodeManager::from_config(&config, Arc::new(TracingLog)).await?;

    match cli.command {
        Commands::Check => {
            print_status(&manager.status(), cli.json)?;
        }
        Commands::Watch => {
            let period = Duration::from_secs(config.health_check.interval_secs);
            let mut ticker = tokio::time::interval(period);
            let terminate = wait_for_termination();
            tokio::pin!(terminate);

            loop {
                tokio::select! {
                    _ = ticker.tick() => print_status(&manager.status(), cli.json)?,
                    _ = &mut terminate => break,
                }
            }
        }
    }

    manager.shutdown().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

fn print_status(status: &PoolStatus, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string(status)?);
        return Ok(());
    }

    println!(
        "available={} broken={} total={}",
        status.available_count(),
        status.broken_count(),
        status.all.len()
    );
    for node in &status.available {
        println!("  up    {}", node);
    }
    for node in &status.broken {
        println!("  down  {}", node);
    }
    Ok(())
}
