// crates/strinergy-economics/src/arithmetic.rs
//
// Integer settlement arithmetic for pro-rata distribution.
//
// Production is never converted to floating point. Each report is folded into
// a per-unit-of-weight rate by truncating division; whatever does not divide
// evenly is carried forward and offered again to the next report.
//
// An optional fixed-point scale k represents every internal amount in units of
// 1/k. A larger scale shrinks the carried remainder (and so the credit that
// waits for a future report) at the cost of wider stored integers.

use serde::{Deserialize, Serialize};

use strinergy_core::error::StrinergyError;

/// Stake weight held by an account (one unit per stake token).
pub type Weight = u64;

/// A reported amount of production, in whole units.
pub type Quantity = u64;

/// Scaled credit: accumulator values, remainders and settled balances.
pub type Credit = u128;

/// Default fixed-point scale: whole production units.
pub const DEFAULT_SCALE: u64 = 1;

/// Fixed-point scale applied to production before it is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct FixedScale(u64);

impl FixedScale {
    /// Whole units, no fractional precision.
    pub const UNIT: FixedScale = FixedScale(DEFAULT_SCALE);

    /// Create a scale factor.
    ///
    /// # Errors
    /// Returns `StrinergyError::InvalidConfig` if `scale` is zero.
    pub fn new(scale: u64) -> Result<Self, StrinergyError> {
        if scale == 0 {
            return Err(StrinergyError::InvalidConfig(
                "fixed-point scale must be greater than zero".to_string(),
            ));
        }
        Ok(Self(scale))
    }

    /// The raw scale factor.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// Convert whole units into scaled credit.
    pub fn to_scaled(&self, quantity: Quantity) -> Credit {
        // u64 * u64 always fits in u128.
        Credit::from(quantity) * Credit::from(self.0)
    }

    /// Convert scaled credit back into whole units, truncating.
    pub fn to_whole(&self, credit: Credit) -> Credit {
        credit / Credit::from(self.0)
    }

    /// Scaled credit needed to pay out `amount` whole units.
    pub fn whole_to_scaled(&self, amount: Credit) -> Result<Credit, StrinergyError> {
        amount
            .checked_mul(Credit::from(self.0))
            .ok_or_else(|| StrinergyError::Overflow(format!("{} units at scale {}", amount, self.0)))
    }
}

impl Default for FixedScale {
    fn default() -> Self {
        Self::UNIT
    }
}

impl TryFrom<u64> for FixedScale {
    type Error = StrinergyError;

    fn try_from(scale: u64) -> Result<Self, Self::Error> {
        Self::new(scale)
    }
}

impl From<FixedScale> for u64 {
    fn from(scale: FixedScale) -> u64 {
        scale.0
    }
}

/// Outcome of folding one report into the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// Credit added per unit of weight.
    pub rate: Credit,
    /// Credit that did not divide evenly; always `< supply`.
    pub remainder: Credit,
}

/// Divide `scaled_quantity + carried` among `supply` units of weight.
///
/// `rate * supply + remainder == scaled_quantity + carried` holds exactly.
///
/// # Errors
/// - `StrinergyError::ZeroSupply` if `supply` is zero.
/// - `StrinergyError::Overflow` if the carried total does not fit.
pub fn split(scaled_quantity: Credit, carried: Credit, supply: Weight) -> Result<Split, StrinergyError> {
    if supply == 0 {
        return Err(StrinergyError::ZeroSupply);
    }
    let total = scaled_quantity.checked_add(carried).ok_or_else(|| {
        StrinergyError::Overflow(format!("{} + {} carried", scaled_quantity, carried))
    })?;
    let supply = Credit::from(supply);
    Ok(Split {
        rate: total / supply,
        remainder: total % supply,
    })
}

/// Credit earned by `weight` while the accumulator moved from `last_seen` to `accumulator`.
///
/// # Errors
/// Returns `StrinergyError::Overflow` if the product does not fit, or if
/// `last_seen` is ahead of `accumulator` (the accumulator never decreases).
pub fn accrued(accumulator: Credit, last_seen: Credit, weight: Weight) -> Result<Credit, StrinergyError> {
    let delta = accumulator.checked_sub(last_seen).ok_or_else(|| {
        StrinergyError::Overflow(format!(
            "snapshot {} is ahead of accumulator {}",
            last_seen, accumulator
        ))
    })?;
    delta
        .checked_mul(Credit::from(weight))
        .ok_or_else(|| StrinergyError::Overflow(format!("{} * weight {}", delta, weight)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_truncates_and_carries() {
        let s = split(20_546, 0, 10_000).unwrap();
        assert_eq!(s.rate, 2);
        assert_eq!(s.remainder, 546);
    }

    #[test]
    fn test_split_absorbs_carried_remainder() {
        let s = split(9_500, 546, 10_000).unwrap();
        assert_eq!(s.rate, 1);
        assert_eq!(s.remainder, 46);
    }

    #[test]
    fn test_split_below_one_unit_of_weight() {
        let s = split(7, 0, 10).unwrap();
        assert_eq!(s.rate, 0);
        assert_eq!(s.remainder, 7);
    }

    #[test]
    fn test_split_conserves_total() {
        for (q, carried, supply) in [(1u128, 0u128, 3u64), (999, 2, 7), (10, 9, 10), (123_456, 0, 1)] {
            let s = split(q, carried, supply).unwrap();
            assert_eq!(s.rate * Credit::from(supply) + s.remainder, q + carried);
            assert!(s.remainder < Credit::from(supply));
        }
    }

    #[test]
    fn test_split_zero_supply() {
        assert_eq!(split(10, 0, 0), Err(StrinergyError::ZeroSupply));
    }

    #[test]
    fn test_split_overflow() {
        assert!(matches!(
            split(Credit::MAX, 1, 10),
            Err(StrinergyError::Overflow(_))
        ));
    }

    #[test]
    fn test_accrued() {
        assert_eq!(accrued(5, 2, 4_500).unwrap(), 13_500);
        assert_eq!(accrued(5, 5, 4_500).unwrap(), 0);
        assert_eq!(accrued(5, 0, 0).unwrap(), 0);
    }

    #[test]
    fn test_accrued_rejects_snapshot_ahead() {
        assert!(matches!(accrued(1, 2, 10), Err(StrinergyError::Overflow(_))));
    }

    #[test]
    fn test_scale_rejects_zero() {
        assert!(FixedScale::new(0).is_err());
        assert_eq!(FixedScale::default(), FixedScale::UNIT);
    }

    #[test]
    fn test_scale_conversions() {
        let scale = FixedScale::new(1_000).unwrap();
        assert_eq!(scale.to_scaled(7), 7_000);
        assert_eq!(scale.to_whole(7_999), 7);
        assert_eq!(scale.whole_to_scaled(3).unwrap(), 3_000);
    }

    #[test]
    fn test_scale_deserialize_validates() {
        let ok: FixedScale = serde_json::from_str("100").unwrap();
        assert_eq!(ok.get(), 100);
        assert!(serde_json::from_str::<FixedScale>("0").is_err());
    }
}
