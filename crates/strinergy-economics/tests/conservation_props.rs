// crates/strinergy-economics/tests/conservation_props.rs
//
// Property tests: for arbitrary interleavings of transfers, production
// reports, balance reads and withdrawals, no unit of production is lost or
// created at any fixed-point scale, weights always sum to the supply, and the
// remainder of each split stays below one unit per unit of weight.

use proptest::prelude::*;

use strinergy_core::error::StrinergyError;
use strinergy_core::identity::{AccountId, MeterId, ProjectId};
use strinergy_economics::{Credit, DistributionConfig, DistributionLedger, FixedScale, LedgerHandle, OpenRegistration, Weight};
use std::sync::Arc;

const ACCOUNTS: usize = 5;

#[derive(Debug, Clone)]
enum Op {
    Transfer { from: usize, to: usize, amount: Weight },
    Produce(u64),
    Read(usize),
    Withdraw { account: usize, amount: Credit },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ACCOUNTS, 0..ACCOUNTS, 1u64..5_000).prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
        (1u64..100_000).prop_map(Op::Produce),
        (0..ACCOUNTS).prop_map(Op::Read),
        (0..ACCOUNTS, 1u128..50_000).prop_map(|(account, amount)| Op::Withdraw { account, amount }),
    ]
}

fn account(i: usize) -> AccountId {
    AccountId::new(format!("account-{}", i))
}

fn run(scale: FixedScale, supply: Weight, ops: &[Op]) -> Result<(), TestCaseError> {
    let ledger = LedgerHandle::create(supply, account(0)).unwrap();
    let engine = DistributionLedger::new(DistributionConfig { scale }, Arc::new(OpenRegistration));
    let project = ProjectId::from("project");
    let meter = MeterId::from("meter");
    engine.register_project(&account(0), &project, &ledger).unwrap();
    engine.register_meter(&account(0), &meter, &project).unwrap();

    let mut reported: Credit = 0;
    let mut withdrawn: Credit = 0;
    for op in ops {
        match op {
            Op::Transfer { from, to, amount } => {
                let available = ledger.weight_of(&account(*from));
                let result = ledger.transfer(&account(*from), &account(*to), *amount);
                if *amount > available {
                    let insufficient = matches!(result, Err(StrinergyError::InsufficientBalance { .. }));
                    prop_assert!(insufficient, "transfer of {} over {} returned {:?}", amount, available, result);
                } else {
                    prop_assert!(result.is_ok());
                }
            }
            Op::Produce(q) => {
                engine.notify_production(&meter, *q).unwrap();
                reported += Credit::from(*q);
            }
            Op::Read(i) => {
                let first = engine.balance_of(&project, &account(*i)).unwrap();
                let second = engine.balance_of(&project, &account(*i)).unwrap();
                prop_assert_eq!(first, second);
            }
            Op::Withdraw { account: i, amount } => {
                let balance = engine.balance_of(&project, &account(*i)).unwrap();
                let result = engine.withdraw(&project, &account(*i), *amount);
                if *amount > balance {
                    prop_assert!(result.is_err());
                } else {
                    prop_assert_eq!(result.unwrap(), balance - *amount);
                    withdrawn += *amount;
                }
            }
        }

        let weights: Weight = (0..ACCOUNTS).map(|i| ledger.weight_of(&account(i))).sum();
        prop_assert_eq!(weights, supply);
        let summary = engine.project_summary(&project).unwrap();
        prop_assert!(summary.split_remainder < Credit::from(supply));
        if scale == FixedScale::UNIT {
            prop_assert!(summary.carried_remainder < Credit::from(supply));
        }
    }

    let claimable: Credit = (0..ACCOUNTS)
        .map(|i| engine.balance_of(&project, &account(i)).unwrap())
        .sum();
    let carried = engine.project_balance(&project).unwrap();
    prop_assert_eq!(claimable + carried + withdrawn, reported);
    Ok(())
}

proptest! {
    #[test]
    fn prop_conservation_whole_units(
        supply in 1u64..10_000,
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        run(FixedScale::UNIT, supply, &ops)?;
    }

    #[test]
    fn prop_conservation_scaled(
        supply in 1u64..10_000,
        scale in 2u64..1_000_000,
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        run(FixedScale::new(scale).unwrap(), supply, &ops)?;
    }
}
