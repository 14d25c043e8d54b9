//! OSPFX CLI: Command-line interface for multi-path routing analysis.
//!
//! Subcommands: init, paths, what-if, impact.

mod commands;
mod config;
mod topology;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ospfx_core::AnalysisConfig;

/// OSPFX: Equal-cost path and impact analysis for link-state networks.
#[derive(Parser, Debug)]
#[command(name = "ospfx", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "ospfx.toml")]
    config: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Override the maximum number of equal-cost paths per query.
    #[arg(long, global = true)]
    max_paths: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Show every equal-cost shortest path between two routers.
    Paths(commands::paths::PathsArgs),
    /// Compare one query before and after a topology edit.
    WhatIf(commands::what_if::WhatIfArgs),
    /// Classify the effect of a topology edit on every router pair.
    Impact(commands::impact::ImpactArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Init(args) = &cli.command {
        return commands::init::run(args);
    }

    let mut config = config::load(&cli.config)?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(max_paths) = cli.max_paths {
        config.enumeration.max_paths = max_paths;
    }
    config.validate()?;

    init_tracing(&config);

    match &cli.command {
        Commands::Init(_) => Ok(()),
        Commands::Paths(args) => commands::paths::run(args, &config),
        Commands::WhatIf(args) => commands::what_if::run(args, &config),
        Commands::Impact(args) => commands::impact::run(args, &config).await,
    }
}

/// Logs go to stderr so that stdout carries only JSON results.
fn init_tracing(config: &AnalysisConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.with_target(true).init();
    }
}
