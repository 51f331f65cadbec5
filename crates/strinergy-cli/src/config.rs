// crates/strinergy-cli/src/config.rs
//
// Runtime configuration for the Strinergy CLI.
// Loaded from a TOML file or populated with sensible defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::Arc;

use strinergy_core::error::StrinergyError;
use strinergy_core::identity::AccountId;
use strinergy_core::traits::RegistrationPolicy;
use strinergy_economics::{DistributionConfig, FixedScale, OpenRegistration, OperatorRegistration};

use crate::output::OutputFormat;

/// Runtime configuration for the CLI.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Fixed-point scale applied to reported production.
    #[serde(default = "default_scale")]
    pub scale: u64,

    /// Stake supply used when a scenario does not set one.
    #[serde(default = "default_supply")]
    pub default_supply: u64,

    /// Accounts allowed to register projects and meters.
    /// When empty (default), registration is open to every caller.
    #[serde(default)]
    pub operators: Vec<String>,

    /// Output format: "table" or "json".
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_scale() -> u64 {
    strinergy_economics::DEFAULT_SCALE
}

fn default_supply() -> u64 {
    10_000
}

fn default_format() -> String {
    "table".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            scale: default_scale(),
            default_supply: default_supply(),
            operators: Vec::new(),
            format: default_format(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(expand_tilde(path))?;
        let config: CliConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Distribution engine settings derived from this configuration.
    pub fn distribution_config(&self) -> Result<DistributionConfig, StrinergyError> {
        Ok(DistributionConfig {
            scale: FixedScale::new(self.scale)?,
        })
    }

    /// Registration policy: operator-gated when operators are listed, open otherwise.
    pub fn policy(&self) -> Arc<dyn RegistrationPolicy> {
        if self.operators.is_empty() {
            Arc::new(OpenRegistration)
        } else {
            Arc::new(OperatorRegistration::new(
                self.operators.iter().map(|o| AccountId::from(o.as_str())),
            ))
        }
    }

    /// Parsed output format.
    pub fn output_format(&self) -> Result<OutputFormat, StrinergyError> {
        self.format.parse()
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}
