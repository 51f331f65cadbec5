// crates/strinergy-cli/src/scenario.rs
//
// Scenario files: a stake supply, its initial holder, and an ordered list of
// steps (transfers, registrations, production reports, withdrawals) that are
// replayed against a fresh distribution engine.
//
// ```toml
// supply = 10000
// owner = "owner"
//
// [[step]]
// action = "transfer"
// from = "owner"
// to = "participant1"
// amount = 4500
//
// [[step]]
// action = "produce"
// meter = "meter"
// quantity = 20546
// ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tabled::Tabled;
use thiserror::Error;

use strinergy_core::error::StrinergyError;
use strinergy_core::identity::{AccountId, MeterId, ProjectId};
use strinergy_economics::{Credit, DistributionLedger, DistributionReceipt, LedgerHandle, ProjectSummary, Weight};

use crate::config::CliConfig;

/// Failures while loading or replaying a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Could not read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid setup: {0}")]
    Setup(StrinergyError),

    #[error("Step {index} ({step}) failed: {source}")]
    Step {
        index: usize,
        step: String,
        #[source]
        source: StrinergyError,
    },
}

fn default_owner() -> String {
    "owner".to_string()
}

/// A scenario file.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Stake supply; falls back to the configured default.
    #[serde(default)]
    pub supply: Option<Weight>,
    /// Initial holder of the whole supply and default registration caller.
    #[serde(default = "default_owner")]
    pub owner: String,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// One replayed operation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Transfer {
        from: String,
        to: String,
        amount: Weight,
    },
    RegisterProject {
        project: String,
        #[serde(default)]
        caller: Option<String>,
    },
    RegisterMeter {
        meter: String,
        project: String,
        #[serde(default)]
        caller: Option<String>,
    },
    Produce {
        meter: String,
        quantity: u64,
    },
    Withdraw {
        project: String,
        account: String,
        amount: u64,
    },
}

impl Step {
    fn describe(&self) -> String {
        match self {
            Step::Transfer { from, to, amount } => format!("transfer {} {} -> {}", amount, from, to),
            Step::RegisterProject { project, .. } => format!("register project {}", project),
            Step::RegisterMeter { meter, project, .. } => format!("register meter {} for {}", meter, project),
            Step::Produce { meter, quantity } => format!("produce {} via {}", quantity, meter),
            Step::Withdraw { project, account, amount } => {
                format!("withdraw {} for {} from {}", amount, account, project)
            }
        }
    }
}

impl Scenario {
    pub fn from_toml(contents: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &str) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }
}

/// State left behind by a replayed scenario.
pub struct Replay {
    pub engine: DistributionLedger,
    pub ledger: LedgerHandle,
    /// Every account the scenario mentioned.
    pub accounts: BTreeSet<AccountId>,
    pub receipts: Vec<DistributionReceipt>,
}

/// Replay `scenario` against a fresh engine configured by `config`.
///
/// Stops at the first failing step.
pub fn replay(scenario: &Scenario, config: &CliConfig) -> Result<Replay, ScenarioError> {
    let owner = AccountId::from(scenario.owner.as_str());
    let supply = scenario.supply.unwrap_or(config.default_supply);
    let ledger = LedgerHandle::create(supply, owner.clone()).map_err(ScenarioError::Setup)?;
    let engine = DistributionLedger::new(
        config.distribution_config().map_err(ScenarioError::Setup)?,
        config.policy(),
    );

    let mut accounts = BTreeSet::from([owner.clone()]);
    let mut receipts = Vec::new();
    let caller_or_owner = |caller: &Option<String>| {
        caller
            .as_deref()
            .map(AccountId::from)
            .unwrap_or_else(|| owner.clone())
    };

    for (index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!("Step {}: {}", index, step.describe());
        let result = match step {
            Step::Transfer { from, to, amount } => {
                let (from, to) = (AccountId::from(from.as_str()), AccountId::from(to.as_str()));
                accounts.insert(from.clone());
                accounts.insert(to.clone());
                ledger.transfer(&from, &to, *amount)
            }
            Step::RegisterProject { project, caller } => {
                engine.register_project(&caller_or_owner(caller), &ProjectId::from(project.as_str()), &ledger)
            }
            Step::RegisterMeter { meter, project, caller } => engine.register_meter(
                &caller_or_owner(caller),
                &MeterId::from(meter.as_str()),
                &ProjectId::from(project.as_str()),
            ),
            Step::Produce { meter, quantity } => engine
                .notify_production(&MeterId::from(meter.as_str()), *quantity)
                .map(|receipt| receipts.push(receipt)),
            Step::Withdraw { project, account, amount } => {
                let account = AccountId::from(account.as_str());
                accounts.insert(account.clone());
                engine
                    .withdraw(&ProjectId::from(project.as_str()), &account, Credit::from(*amount))
                    .map(|_| ())
            }
        };
        result.map_err(|source| ScenarioError::Step {
            index,
            step: step.describe(),
            source,
        })?;
    }

    Ok(Replay {
        engine,
        ledger,
        accounts,
        receipts,
    })
}

/// A row in the per-project balance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct AccountRow {
    #[tabled(rename = "Account")]
    pub account: String,
    #[tabled(rename = "Weight")]
    pub weight: Weight,
    #[tabled(rename = "Balance")]
    pub balance: Credit,
}

/// Balances of one project after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub summary: ProjectSummary,
    pub accounts: Vec<AccountRow>,
}

impl Replay {
    /// Settle every known account in every project and collect the results.
    pub fn reports(&self) -> Result<Vec<ProjectReport>, StrinergyError> {
        self.engine
            .projects()
            .into_iter()
            .map(|listing| {
                let accounts = self
                    .accounts
                    .iter()
                    .map(|account| {
                        Ok(AccountRow {
                            account: account.to_string(),
                            weight: self.ledger.weight_of(account),
                            balance: self.engine.balance_of(&listing.project, account)?,
                        })
                    })
                    .collect::<Result<Vec<_>, StrinergyError>>()?;
                Ok(ProjectReport {
                    summary: self.engine.project_summary(&listing.project)?,
                    accounts,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_A: &str = r#"
        supply = 10000
        owner = "owner"

        [[step]]
        action = "transfer"
        from = "owner"
        to = "participant1"
        amount = 4500

        [[step]]
        action = "transfer"
        from = "owner"
        to = "participant2"
        amount = 4500

        [[step]]
        action = "transfer"
        from = "participant2"
        to = "participant3"
        amount = 4500

        [[step]]
        action = "register_project"
        project = "project"

        [[step]]
        action = "register_meter"
        meter = "meter"
        project = "project"

        [[step]]
        action = "produce"
        meter = "meter"
        quantity = 20546
    "#;

    fn balance(report: &ProjectReport, account: &str) -> Credit {
        report
            .accounts
            .iter()
            .find(|row| row.account == account)
            .map(|row| row.balance)
            .unwrap()
    }

    #[test]
    fn test_parse_steps() {
        let scenario = Scenario::from_toml(SCENARIO_A).unwrap();
        assert_eq!(scenario.supply, Some(10_000));
        assert_eq!(scenario.steps.len(), 6);
        assert_eq!(
            scenario.steps[5],
            Step::Produce {
                meter: "meter".to_string(),
                quantity: 20_546
            }
        );
    }

    #[test]
    fn test_replay_scenario_a() {
        let scenario = Scenario::from_toml(SCENARIO_A).unwrap();
        let replay = replay(&scenario, &CliConfig::default()).unwrap();
        let reports = replay.reports().unwrap();
        assert_eq!(reports.len(), 1);

        let report = &reports[0];
        assert_eq!(balance(report, "participant1"), 9_000);
        assert_eq!(balance(report, "participant2"), 0);
        assert_eq!(balance(report, "participant3"), 9_000);
        assert_eq!(balance(report, "owner"), 2_000);
        assert_eq!(report.summary.carried_remainder, 546);
        assert_eq!(replay.receipts.len(), 1);
    }

    #[test]
    fn test_default_supply_from_config() {
        let scenario = Scenario::from_toml("owner = \"o\"").unwrap();
        let config = CliConfig {
            default_supply: 42,
            ..CliConfig::default()
        };
        let replay = replay(&scenario, &config).unwrap();
        assert_eq!(replay.ledger.total_supply(), 42);
        assert!(replay.reports().unwrap().is_empty());
    }

    #[test]
    fn test_failing_step_reports_index() {
        let scenario = Scenario::from_toml(
            r#"
            [[step]]
            action = "produce"
            meter = "ghost"
            quantity = 5
            "#,
        )
        .unwrap();
        let err = replay(&scenario, &CliConfig::default()).err().unwrap();
        match err {
            ScenarioError::Step { index, source, .. } => {
                assert_eq!(index, 0);
                assert_eq!(source, StrinergyError::UnauthorizedMeter(MeterId::from("ghost")));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result = Scenario::from_toml(
            r#"
            [[step]]
            action = "mint"
            "#,
        );
        assert!(matches!(result, Err(ScenarioError::Parse(_))));
    }
}
