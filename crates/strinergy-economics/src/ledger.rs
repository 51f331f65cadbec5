// crates/strinergy-economics/src/ledger.rs
//
// LedgerHandle: a shared stake ledger together with the distribution pools of
// every project weighted by it.
//
// All state that a transfer, a production report or a settlement can touch
// for a given stake ledger lives behind one exclusive lock. Readers therefore
// never observe an accumulator without its remainder, or half of a transfer.
// Projects on different stake ledgers never contend.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::arithmetic::{FixedScale, Weight};
use crate::pool::{DistributionPool, Settlement};
use crate::stake::StakeLedger;
use strinergy_core::error::StrinergyError;
use strinergy_core::identity::{AccountId, LedgerId, ProjectId};

#[derive(Debug)]
pub(crate) struct LedgerState {
    pub(crate) stake: StakeLedger,
    pub(crate) pools: BTreeMap<ProjectId, DistributionPool>,
}

/// Shared handle to a stake ledger.
///
/// Cloning the handle shares the ledger.
#[derive(Debug, Clone)]
pub struct LedgerHandle {
    id: LedgerId,
    total_supply: Weight,
    inner: Arc<Mutex<LedgerState>>,
}

impl LedgerHandle {
    /// Create a stake ledger with a fixed `total_supply`, all held by `initial_holder`.
    ///
    /// # Errors
    /// Returns `StrinergyError::InvalidAmount` if `total_supply` is zero.
    pub fn create(total_supply: Weight, initial_holder: AccountId) -> Result<Self, StrinergyError> {
        let stake = StakeLedger::new(total_supply, initial_holder.clone())?;
        let id = LedgerId::generate();
        tracing::info!(
            "Created stake ledger {} with supply {} held by {}",
            id,
            total_supply,
            initial_holder
        );
        Ok(Self {
            id,
            total_supply,
            inner: Arc::new(Mutex::new(LedgerState {
                stake,
                pools: BTreeMap::new(),
            })),
        })
    }

    pub fn id(&self) -> LedgerId {
        self.id
    }

    /// The fixed total supply of stake weight.
    pub fn total_supply(&self) -> Weight {
        self.total_supply
    }

    /// Current weight of `account`; zero for accounts never seen.
    pub fn weight_of(&self, account: &AccountId) -> Weight {
        self.inner.lock().stake.weight_of(account)
    }

    /// Number of accounts currently holding weight.
    pub fn holder_count(&self) -> usize {
        self.inner.lock().stake.holder_count()
    }

    /// Move `amount` weight from `caller` to `to`.
    ///
    /// Both accounts are settled in every attached project at their
    /// pre-transfer weights first, so the sender keeps the credit earned so far
    /// and the receiver only accrues from this point on. The settlements and
    /// the weight move are applied together or not at all.
    ///
    /// # Errors
    /// - `StrinergyError::InvalidAmount` if `amount` is zero.
    /// - `StrinergyError::InsufficientBalance` if `caller` holds less than `amount`.
    pub fn transfer(&self, caller: &AccountId, to: &AccountId, amount: Weight) -> Result<(), StrinergyError> {
        let mut state = self.inner.lock();
        state.stake.validate_transfer(caller, amount)?;

        let from_weight = state.stake.weight_of(caller);
        let to_weight = state.stake.weight_of(to);
        let mut settlements: Vec<(ProjectId, AccountId, Settlement)> = Vec::with_capacity(state.pools.len() * 2);
        for (project, pool) in &state.pools {
            settlements.push((project.clone(), caller.clone(), pool.pending_settlement(caller, from_weight)?));
            if to != caller {
                settlements.push((project.clone(), to.clone(), pool.pending_settlement(to, to_weight)?));
            }
        }

        for (project, account, settlement) in settlements {
            if let Some(pool) = state.pools.get_mut(&project) {
                pool.commit_settlement(&account, settlement);
            }
        }
        state.stake.transfer(caller, to, amount)?;

        tracing::debug!(
            "Ledger {}: {} -> {} weight {} ({} project(s) settled)",
            self.id,
            caller,
            to,
            amount,
            state.pools.len()
        );
        Ok(())
    }

    /// Attach a fresh distribution pool for `project`.
    pub(crate) fn attach_pool(&self, project: &ProjectId, scale: FixedScale) -> Result<(), StrinergyError> {
        let mut state = self.inner.lock();
        if state.pools.contains_key(project) {
            return Err(StrinergyError::AlreadyRegistered(project.clone()));
        }
        state
            .pools
            .insert(project.clone(), DistributionPool::new(project.clone(), scale));
        Ok(())
    }

    /// Run `f` against the pool of `project` and the stake ledger under the lock.
    pub(crate) fn with_pool<R>(
        &self,
        project: &ProjectId,
        f: impl FnOnce(&mut DistributionPool, &StakeLedger) -> Result<R, StrinergyError>,
    ) -> Result<R, StrinergyError> {
        let mut state = self.inner.lock();
        let LedgerState { stake, pools } = &mut *state;
        let pool = pools
            .get_mut(project)
            .ok_or_else(|| StrinergyError::UnknownProject(project.clone()))?;
        f(pool, stake)
    }
}
