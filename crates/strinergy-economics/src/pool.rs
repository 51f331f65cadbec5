// crates/strinergy-economics/src/pool.rs
//
// Per-project distribution state: an accumulator of credit per unit of weight,
// the carried remainder, and each account's settlement position.
//
// A report touches only the accumulator and the remainder, so its cost does
// not depend on how many accounts hold weight. An account's share is
// materialised lazily: whenever its weight is about to change, or its balance
// is read or withdrawn, the growth of the accumulator since its last snapshot
// is multiplied by its current weight and added to its settled balance.
//
// With a fixed-point scale above one, settled balances are kept on whole-unit
// boundaries. The sub-unit fraction of each settlement moves into a project
// counter (`settled_dust`) that is part of the project balance and is folded
// into the next report, so fractions are redistributed rather than stranded.
//
// Conservation (in scaled units):
//   sum(settled) + sum(unsettled accrual) + carried + dust + withdrawn == reported

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::arithmetic::{self, Credit, FixedScale, Quantity, Weight};
use strinergy_core::error::StrinergyError;
use strinergy_core::identity::{AccountId, ProjectId};

/// An account's settlement snapshot within one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Accumulator value at the account's last settlement.
    pub last_accumulator: Credit,
    /// Settled, claimable credit (scaled, always a whole number of units).
    pub settled: Credit,
}

/// A settlement computed but not yet applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settlement {
    pub position: Position,
    /// Sub-unit credit split off the account and returned to the project.
    pub dust: Credit,
}

/// Result of an applied distribution event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionReceipt {
    pub project: ProjectId,
    pub quantity: Quantity,
    /// Credit added per unit of weight (scaled).
    pub rate: Credit,
    /// Carried remainder after the event (scaled).
    pub remainder: Credit,
    /// Accumulator after the event.
    pub accumulator: Credit,
}

/// Read-only view of a project's distribution state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project: ProjectId,
    pub scale: FixedScale,
    pub total_supply: Weight,
    pub accumulator: Credit,
    /// Undistributed production (remainder plus settled fractions), in whole units.
    pub carried_remainder: Credit,
    /// Remainder of the last split, in scaled units; always `< total_supply`.
    pub split_remainder: Credit,
    /// Total production reported, in whole units.
    pub total_reported: Credit,
    /// Total withdrawn by accounts, in whole units.
    pub total_withdrawn: Credit,
    pub meters: usize,
}

/// Distribution state for one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionPool {
    project: ProjectId,
    scale: FixedScale,
    accumulator: Credit,
    carried_remainder: Credit,
    settled_dust: Credit,
    total_reported: Credit,
    total_withdrawn: Credit,
    positions: HashMap<AccountId, Position>,
}

impl DistributionPool {
    /// Create an empty pool: accumulator and remainder start at zero.
    pub fn new(project: ProjectId, scale: FixedScale) -> Self {
        Self {
            project,
            scale,
            accumulator: 0,
            carried_remainder: 0,
            settled_dust: 0,
            total_reported: 0,
            total_withdrawn: 0,
            positions: HashMap::new(),
        }
    }

    /// Credit per unit of weight distributed so far.
    pub fn accumulator(&self) -> Credit {
        self.accumulator
    }

    /// Carried remainder of the last split in scaled units; always `< total_supply`.
    pub fn carried_remainder(&self) -> Credit {
        self.carried_remainder
    }

    /// Production not yet credited to any account, in whole units.
    ///
    /// Includes settled sub-unit fractions; with the unit scale this is exactly
    /// the carried remainder.
    pub fn project_balance(&self) -> Credit {
        self.scale
            .to_whole(self.carried_remainder + self.settled_dust)
    }

    /// Fold `quantity` (plus everything carried) into the accumulator against
    /// `total_supply` units of weight.
    ///
    /// # Errors
    /// - `StrinergyError::InvalidQuantity` if `quantity` is zero.
    /// - `StrinergyError::ZeroSupply` if `total_supply` is zero.
    /// - `StrinergyError::Overflow` if any counter would overflow.
    ///
    /// On error the pool is unchanged.
    pub fn distribute(&mut self, quantity: Quantity, total_supply: Weight) -> Result<DistributionReceipt, StrinergyError> {
        if quantity == 0 {
            return Err(StrinergyError::InvalidQuantity);
        }
        let scaled = self.scale.to_scaled(quantity);
        let carried = self
            .carried_remainder
            .checked_add(self.settled_dust)
            .ok_or_else(|| StrinergyError::Overflow(format!("carried credit of {}", self.project)))?;
        let split = arithmetic::split(scaled, carried, total_supply)?;
        let accumulator = self
            .accumulator
            .checked_add(split.rate)
            .ok_or_else(|| StrinergyError::Overflow(format!("accumulator of {}", self.project)))?;
        let total_reported = self
            .total_reported
            .checked_add(scaled)
            .ok_or_else(|| StrinergyError::Overflow(format!("reported total of {}", self.project)))?;

        self.accumulator = accumulator;
        self.carried_remainder = split.remainder;
        self.settled_dust = 0;
        self.total_reported = total_reported;

        Ok(DistributionReceipt {
            project: self.project.clone(),
            quantity,
            rate: split.rate,
            remainder: split.remainder,
            accumulator,
        })
    }

    /// The settlement `account` would get at `weight`, without applying it.
    pub fn pending_settlement(&self, account: &AccountId, weight: Weight) -> Result<Settlement, StrinergyError> {
        let current = self.positions.get(account).copied().unwrap_or_default();
        let earned = arithmetic::accrued(self.accumulator, current.last_accumulator, weight)?;
        let dust = earned % Credit::from(self.scale.get());
        let settled = current
            .settled
            .checked_add(earned - dust)
            .ok_or_else(|| StrinergyError::Overflow(format!("balance of {}", account)))?;
        Ok(Settlement {
            position: Position {
                last_accumulator: self.accumulator,
                settled,
            },
            dust,
        })
    }

    /// Apply a settlement computed by `pending_settlement`.
    pub(crate) fn commit_settlement(&mut self, account: &AccountId, settlement: Settlement) {
        // Dust never exceeds the credit it was split from, which is bounded by
        // the checked reported total.
        self.settled_dust += settlement.dust;
        if settlement.position == Position::default() {
            // Only possible before the first distribution; keep the map sparse.
            self.positions.remove(account);
        } else {
            self.positions.insert(account.clone(), settlement.position);
        }
    }

    /// Credit `account` for accumulator growth at `weight` and snapshot the accumulator.
    ///
    /// Returns the settled balance in scaled units.
    pub fn settle(&mut self, account: &AccountId, weight: Weight) -> Result<Credit, StrinergyError> {
        let settlement = self.pending_settlement(account, weight)?;
        self.commit_settlement(account, settlement);
        Ok(settlement.position.settled)
    }

    /// Settle `account` and return its claimable balance in whole units.
    pub fn balance(&mut self, account: &AccountId, weight: Weight) -> Result<Credit, StrinergyError> {
        let settled = self.settle(account, weight)?;
        Ok(self.scale.to_whole(settled))
    }

    /// Settle `account` and pay out `amount` whole units from its balance.
    ///
    /// Returns the remaining claimable balance in whole units.
    ///
    /// # Errors
    /// - `StrinergyError::InvalidAmount` if `amount` is zero.
    /// - `StrinergyError::InsufficientBalance` if the settled balance is smaller.
    pub fn withdraw(&mut self, account: &AccountId, weight: Weight, amount: Credit) -> Result<Credit, StrinergyError> {
        if amount == 0 {
            return Err(StrinergyError::InvalidAmount);
        }
        let mut settlement = self.pending_settlement(account, weight)?;
        let debit = self.scale.whole_to_scaled(amount)?;
        if debit > settlement.position.settled {
            return Err(StrinergyError::InsufficientBalance {
                requested: amount,
                available: self.scale.to_whole(settlement.position.settled),
            });
        }
        let total_withdrawn = self
            .total_withdrawn
            .checked_add(debit)
            .ok_or_else(|| StrinergyError::Overflow(format!("withdrawn total of {}", self.project)))?;

        settlement.position.settled -= debit;
        self.commit_settlement(account, settlement);
        self.total_withdrawn = total_withdrawn;
        Ok(self.scale.to_whole(settlement.position.settled))
    }

    pub fn summary(&self, total_supply: Weight, meters: usize) -> ProjectSummary {
        ProjectSummary {
            project: self.project.clone(),
            scale: self.scale,
            total_supply,
            accumulator: self.accumulator,
            carried_remainder: self.project_balance(),
            split_remainder: self.carried_remainder,
            total_reported: self.scale.to_whole(self.total_reported),
            total_withdrawn: self.scale.to_whole(self.total_withdrawn),
            meters,
        }
    }
}
