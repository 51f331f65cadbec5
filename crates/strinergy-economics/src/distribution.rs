// crates/strinergy-economics/src/distribution.rs
//
// DistributionLedger: converts reported production into per-account claimable
// balances weighted by stake.
//
// Flow:
//   1. A project is registered against a stake ledger (LedgerHandle).
//   2. Meters are bound to the project.
//   3. A bound meter reports produced quantity Q. With S the stake ledger's
//      total supply and R the carried remainder:
//        rate      = (Q + R) / S
//        R'        = (Q + R) % S
//        acc'      = acc + rate
//      This is O(1) in the number of stake holders.
//   4. Balances are derived lazily from the accumulator and each account's
//      weight, settled on transfer, on read and on withdrawal.
//
// Lock order is registry -> ledger. The registry lock is only taken for
// writing while registering.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::arithmetic::{Credit, FixedScale, Quantity, Weight};
use crate::ledger::LedgerHandle;
use crate::pool::{DistributionReceipt, ProjectSummary};
use crate::registry::{OpenRegistration, ProjectListing, Registry};
use strinergy_core::error::StrinergyError;
use strinergy_core::identity::{AccountId, MeterId, ProjectId};
use strinergy_core::traits::RegistrationPolicy;

/// Configuration of the distribution engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionConfig {
    /// Fixed-point scale applied to reported production.
    #[serde(default)]
    pub scale: FixedScale,
}

/// Stake-weighted production distribution across projects.
pub struct DistributionLedger {
    config: DistributionConfig,
    registry: RwLock<Registry>,
}

impl DistributionLedger {
    pub fn new(config: DistributionConfig, policy: Arc<dyn RegistrationPolicy>) -> Self {
        Self {
            config,
            registry: RwLock::new(Registry::new(policy)),
        }
    }

    /// A ledger with whole-unit arithmetic and open registration.
    pub fn open() -> Self {
        Self::new(DistributionConfig::default(), Arc::new(OpenRegistration))
    }

    pub fn config(&self) -> DistributionConfig {
        self.config
    }

    /// Register `project`, weighted by `ledger`.
    ///
    /// # Errors
    /// - `StrinergyError::AlreadyRegistered` if the project exists.
    /// - `StrinergyError::Unauthorized` if the registration policy refuses `caller`.
    pub fn register_project(
        &self,
        caller: &AccountId,
        project: &ProjectId,
        ledger: &LedgerHandle,
    ) -> Result<(), StrinergyError> {
        let mut registry = self.registry.write();
        registry.validate_project(caller, project)?;
        ledger.attach_pool(project, self.config.scale)?;
        registry.insert_project(caller, project, ledger.clone());

        tracing::info!(
            "Registered project {} on stake ledger {} (supply {}) by {}",
            project,
            ledger.id(),
            ledger.total_supply(),
            caller
        );
        Ok(())
    }

    /// Bind `meter` to `project`.
    ///
    /// # Errors
    /// - `StrinergyError::UnknownProject` if the project is not registered.
    /// - `StrinergyError::MeterAlreadyBound` if the meter is already bound.
    /// - `StrinergyError::Unauthorized` if the registration policy refuses `caller`.
    pub fn register_meter(&self, caller: &AccountId, meter: &MeterId, project: &ProjectId) -> Result<(), StrinergyError> {
        self.registry.write().register_meter(caller, meter, project)?;
        tracing::info!("Bound meter {} to project {}", meter, project);
        Ok(())
    }

    /// Distribute `quantity` units reported by `caller_meter` to its project's stake holders.
    ///
    /// # Errors
    /// - `StrinergyError::UnauthorizedMeter` if the meter is not bound.
    /// - `StrinergyError::InvalidQuantity` if `quantity` is zero.
    /// - `StrinergyError::ZeroSupply` if the project's stake supply is zero.
    /// - `StrinergyError::Overflow` if a counter would overflow.
    ///
    /// On error no state changes.
    pub fn notify_production(&self, caller_meter: &MeterId, quantity: Quantity) -> Result<DistributionReceipt, StrinergyError> {
        let registry = self.registry.read();
        let project = match registry.project_of(caller_meter) {
            Some(project) => project.clone(),
            None => {
                tracing::warn!("Rejected production report from unbound meter {}", caller_meter);
                return Err(StrinergyError::UnauthorizedMeter(caller_meter.clone()));
            }
        };
        let ledger = registry.ledger_for(&project)?;

        let receipt = ledger.with_pool(&project, |pool, stake| pool.distribute(quantity, stake.total_supply()))?;
        tracing::info!(
            "Project {}: meter {} reported {} -> rate {}, remainder {}, accumulator {}",
            project,
            caller_meter,
            quantity,
            receipt.rate,
            receipt.remainder,
            receipt.accumulator
        );
        Ok(receipt)
    }

    /// Claimable balance of `account` in `project`, in whole units.
    ///
    /// Settles the account first; repeated calls with no intervening mutation
    /// return the same value.
    ///
    /// # Errors
    /// Returns `StrinergyError::UnknownProject` if the project is not registered.
    pub fn balance_of(&self, project: &ProjectId, account: &AccountId) -> Result<Credit, StrinergyError> {
        let registry = self.registry.read();
        let ledger = registry.ledger_for(project)?;
        ledger.with_pool(project, |pool, stake| pool.balance(account, stake.weight_of(account)))
    }

    /// Production carried at `project` that is not yet divisible among its stake, in whole units.
    pub fn project_balance(&self, project: &ProjectId) -> Result<Credit, StrinergyError> {
        let registry = self.registry.read();
        let ledger = registry.ledger_for(project)?;
        ledger.with_pool(project, |pool, _| Ok(pool.project_balance()))
    }

    /// Pay out `amount` units of `account`'s claimable balance in `project`.
    ///
    /// Returns the remaining balance.
    ///
    /// # Errors
    /// - `StrinergyError::UnknownProject` if the project is not registered.
    /// - `StrinergyError::InvalidAmount` if `amount` is zero.
    /// - `StrinergyError::InsufficientBalance` if the balance is smaller than `amount`.
    pub fn withdraw(&self, project: &ProjectId, account: &AccountId, amount: Credit) -> Result<Credit, StrinergyError> {
        let registry = self.registry.read();
        let ledger = registry.ledger_for(project)?;
        let remaining = ledger.with_pool(project, |pool, stake| {
            pool.withdraw(account, stake.weight_of(account), amount)
        })?;
        tracing::info!(
            "Project {}: {} withdrew {} ({} remaining)",
            project,
            account,
            amount,
            remaining
        );
        Ok(remaining)
    }

    /// Stake weight of `account` in the ledger weighting `project`.
    pub fn weight_of(&self, project: &ProjectId, account: &AccountId) -> Result<Weight, StrinergyError> {
        let registry = self.registry.read();
        Ok(registry.ledger_for(project)?.weight_of(account))
    }

    /// Meters bound to `project`, sorted.
    pub fn meters_of(&self, project: &ProjectId) -> Result<Vec<MeterId>, StrinergyError> {
        let registry = self.registry.read();
        Ok(registry.project(project)?.meters.iter().cloned().collect())
    }

    pub fn project_summary(&self, project: &ProjectId) -> Result<ProjectSummary, StrinergyError> {
        let registry = self.registry.read();
        let record = registry.project(project)?;
        let meters = record.meters.len();
        record
            .ledger
            .with_pool(project, |pool, stake| Ok(pool.summary(stake.total_supply(), meters)))
    }

    /// All registered projects, sorted by id.
    pub fn projects(&self) -> Vec<ProjectListing> {
        self.registry.read().listings()
    }
}

impl Default for DistributionLedger {
    fn default() -> Self {
        Self::open()
    }
}
