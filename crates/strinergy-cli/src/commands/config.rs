// crates/strinergy-cli/src/commands/config.rs
//
// `strinergy config`: print the effective configuration.

use crate::config::CliConfig;
use crate::output::format_json;

/// Run the config command.
pub fn run(config: &CliConfig, source: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("Configuration ({})", source);
    println!("-------------");
    println!("{}", format_json(config)?);
    Ok(())
}
