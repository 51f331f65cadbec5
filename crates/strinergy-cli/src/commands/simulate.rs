// crates/strinergy-cli/src/commands/simulate.rs
//
// `strinergy simulate <scenario>`: replay a scenario file and print each
// project's balances and carried remainder.

use clap::Args;

use crate::config::CliConfig;
use crate::output::{format_json, format_table, OutputFormat};
use crate::scenario::{replay, Scenario};

/// Arguments for the simulate command.
#[derive(Debug, Args)]
pub struct SimulateCmd {
    /// Path to the TOML scenario file.
    pub scenario: String,

    /// Output format: table or json (overrides the config file).
    #[arg(long)]
    pub format: Option<String>,
}

/// Run the simulate command.
pub fn run(cmd: &SimulateCmd, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    let format = match &cmd.format {
        Some(f) => f.parse::<OutputFormat>()?,
        None => config.output_format()?,
    };

    let scenario = Scenario::load(&cmd.scenario)?;
    tracing::info!(
        "Replaying {} step(s) from {}",
        scenario.steps.len(),
        cmd.scenario
    );
    let replay = replay(&scenario, config)?;
    let reports = replay.reports()?;

    match format {
        OutputFormat::Json => println!("{}", format_json(&reports)?),
        OutputFormat::Table => {
            println!(
                "Stake ledger {}  |  Supply: {}  |  Holders: {}  |  Production reports: {}",
                replay.ledger.id(),
                replay.ledger.total_supply(),
                replay.ledger.holder_count(),
                replay.receipts.len()
            );
            for report in &reports {
                let summary = &report.summary;
                println!();
                println!("Project {}", summary.project);
                println!(
                    "  Reported: {}  Withdrawn: {}  Carried remainder: {}  Accumulator: {}  Meters: {}",
                    summary.total_reported,
                    summary.total_withdrawn,
                    summary.carried_remainder,
                    summary.accumulator,
                    summary.meters
                );
                println!("{}", format_table(&report.accounts));
            }
        }
    }

    Ok(())
}
