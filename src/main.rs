// Copyright (c) 2026 prognos-dev
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/prognos-dev/prognos-rs

//! prognos - Predictive Maintenance Engine
//!
//! Headless CLI: ingest sensor readings (or simulate a fleet), fit
//! degradation models, rank the fleet by risk, print the urgent table, and
//! optionally export a snapshot for an external dashboard to poll.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use prognos::export::SnapshotExporter;
use prognos::sim::FleetSimulator;
use prognos::{Config, Engine, VERSION};

/// prognos - Predictive Maintenance Engine
#[derive(Parser, Debug)]
#[command(name = "prognos")]
#[command(author = "prognos-dev")]
#[command(version = VERSION)]
#[command(about = "Remaining-useful-life estimation and fleet risk ranking")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV reading file (asset_id,channel,timestamp,value)
    #[arg(short, long)]
    ingest: Option<PathBuf>,

    /// JSON-lines reading file
    #[arg(long)]
    ingest_jsonl: Option<PathBuf>,

    /// Demo mode with a simulated fleet
    #[arg(long)]
    demo: bool,

    /// Rows to show in the urgent table
    #[arg(long, default_value = "10")]
    top: usize,

    /// Write a fleet snapshot to this path after ranking
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Re-rank every N seconds until interrupted
    #[arg(long)]
    watch: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("prognos v{} - predictive maintenance engine", VERSION);

    // Load or create configuration
    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;
    if args.demo {
        config.demo_mode = true;
    }

    let engine = Engine::new(config.clone());

    if config.demo_mode {
        info!(
            "Demo mode: simulating fleet (seed {}, {} days of history)",
            config.sim.seed, config.sim.history_days
        );
        let start = Utc::now() - Duration::days(config.sim.history_days as i64);
        let mut sim = FleetSimulator::with_default_fleet(config.sim.seed, start);
        let records = sim.generate(config.sim.history_days);
        engine.ingest_all(records)?;
    }

    if let Some(path) = &args.ingest {
        let records = prognos::ingest::read_csv(path)?;
        engine.ingest_all(records)?;
    }
    if let Some(path) = &args.ingest_jsonl {
        let records = prognos::ingest::read_jsonl(path)?;
        engine.ingest_all(records)?;
    }

    if let Some(secs) = args.watch {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(run_watch(&engine, &config, &args, secs))?;
    } else {
        report(&engine, &config, &args)?;
    }

    Ok(())
}

/// Rank the fleet, print the report, export a snapshot when asked.
fn report(engine: &Engine, config: &Config, args: &Args) -> Result<()> {
    let ranking = engine.fleet_ranking();

    println!();
    println!(
        "  Assets monitored: {}   RED: {}   AMBER: {}   Avg RUL: {:.1} days",
        ranking.summary.assets_monitored,
        ranking.summary.red_count,
        ranking.summary.amber_count,
        ranking.summary.mean_rul_days,
    );
    println!();
    println!(
        "  {:<16} {:>10} {:>20} {:>10}  {}",
        "ASSET", "RUL (d)", "INTERVAL (d)", "RISK", "BUCKET"
    );

    for entry in ranking.top(args.top) {
        println!(
            "  {:<16} {:>10.1} {:>9.1} - {:>8.1} {:>10.3}  {}",
            entry.asset_id,
            entry.rul_days,
            entry.interval_days.0,
            entry.interval_days.1,
            entry.risk_score,
            entry.bucket.label(),
        );
    }
    println!();

    if let Some(most_urgent) = ranking.entries.first() {
        println!("  Recommended: {}", most_urgent.bucket.recommended_action());
        println!();
    }

    let exporter = SnapshotExporter::new(config.export.format);
    if let Some(path) = &args.snapshot {
        exporter.export_to_path(&ranking, path)?;
    } else if config.export.enabled {
        let latest = config.export.dir.join(&config.export.latest_filename);
        exporter.export_to_path(&ranking, &latest)?;
        exporter.export_to_path(&ranking, &exporter.timestamped_path(&config.export.dir))?;
    }

    Ok(())
}

/// Re-rank on an interval until Ctrl+C, the auto-refresh loop.
async fn run_watch(engine: &Engine, config: &Config, args: &Args, secs: u64) -> Result<()> {
    info!("Watching fleet, re-ranking every {}s (Ctrl+C to stop)", secs);
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(secs.max(1)));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                report(engine, config, args)?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}
