// crates/strinergy-economics/src/stake.rs
//
// Fixed-supply, transferable stake weight.
//
// The whole supply is minted to the creator when the ledger is created and is
// never changed afterwards; transfers only move weight between accounts.
// Accounts are created implicitly: an account that has never received weight
// holds zero. Accounts that fall back to zero are dropped from the map so the
// map only ever holds live holders.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::arithmetic::Weight;
use strinergy_core::error::StrinergyError;
use strinergy_core::identity::AccountId;

/// Stake weight balances for a single ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeLedger {
    total_supply: Weight,
    weights: HashMap<AccountId, Weight>,
}

impl StakeLedger {
    /// Create a ledger with `total_supply` weight, all held by `initial_holder`.
    ///
    /// # Errors
    /// Returns `StrinergyError::InvalidAmount` if `total_supply` is zero.
    pub fn new(total_supply: Weight, initial_holder: AccountId) -> Result<Self, StrinergyError> {
        if total_supply == 0 {
            return Err(StrinergyError::InvalidAmount);
        }
        let mut weights = HashMap::new();
        weights.insert(initial_holder, total_supply);
        Ok(Self {
            total_supply,
            weights,
        })
    }

    /// The fixed total supply.
    pub fn total_supply(&self) -> Weight {
        self.total_supply
    }

    /// Current weight of `account`; zero for accounts never seen.
    pub fn weight_of(&self, account: &AccountId) -> Weight {
        self.weights.get(account).copied().unwrap_or(0)
    }

    /// Check that `from` may move `amount` to another account.
    ///
    /// # Errors
    /// - `StrinergyError::InvalidAmount` if `amount` is zero.
    /// - `StrinergyError::InsufficientBalance` if `from` holds less than `amount`.
    pub fn validate_transfer(&self, from: &AccountId, amount: Weight) -> Result<(), StrinergyError> {
        if amount == 0 {
            return Err(StrinergyError::InvalidAmount);
        }
        let available = self.weight_of(from);
        if amount > available {
            return Err(StrinergyError::InsufficientBalance {
                requested: u128::from(amount),
                available: u128::from(available),
            });
        }
        Ok(())
    }

    /// Move `amount` weight from `from` to `to`.
    ///
    /// Total supply is unchanged. A transfer to oneself is accepted and leaves
    /// the ledger as it was.
    pub fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Weight) -> Result<(), StrinergyError> {
        self.validate_transfer(from, amount)?;
        if from == to {
            return Ok(());
        }

        let remaining = self.weight_of(from) - amount;
        if remaining == 0 {
            self.weights.remove(from);
        } else {
            self.weights.insert(from.clone(), remaining);
        }
        // Cannot overflow: the sum of all weights equals total_supply.
        *self.weights.entry(to.clone()).or_insert(0) += amount;
        Ok(())
    }

    /// Number of accounts holding non-zero weight.
    pub fn holder_count(&self) -> usize {
        self.weights.len()
    }
}
