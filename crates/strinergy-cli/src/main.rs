// crates/strinergy-cli/src/main.rs
//
// CLI entrypoint for Strinergy.
//
// Loads configuration, initializes tracing, and dispatches to the scenario
// replay and configuration subcommands.

mod commands;
mod config;
mod output;
mod scenario;

use clap::{Parser, Subcommand};
use commands::simulate::SimulateCmd;
use config::CliConfig;

/// Strinergy CLI: stake-weighted production distribution.
#[derive(Parser, Debug)]
#[command(
    name = "strinergy",
    version = "0.1.0",
    about = "Replay stake transfers and production reports against the Strinergy ledger"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "~/.strinergy/config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a scenario file and print balances.
    Simulate(SimulateCmd),

    /// Display the effective configuration.
    Config,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration from TOML file, falling back to defaults if the file
    // is not found.
    let loaded = CliConfig::load(&cli.config);
    let (cli_config, source) = match &loaded {
        Ok(cfg) => (cfg.clone(), cli.config.clone()),
        Err(_) => (CliConfig::default(), "defaults".to_string()),
    };

    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli_config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match &loaded {
        Ok(_) => tracing::debug!("Loaded configuration from {}", cli.config),
        Err(e) => tracing::warn!(
            "Could not load config from {}: {}. Using defaults.",
            cli.config,
            e
        ),
    }

    match &cli.command {
        Commands::Simulate(cmd) => commands::simulate::run(cmd, &cli_config)?,
        Commands::Config => commands::config::run(&cli_config, &source)?,
    }

    Ok(())
}
