// crates/strinergy-economics/src/lib.rs
//
// strinergy-economics: stake-weighted production distribution.
//
// A fixed-supply stake ledger weights each project's distribution. Meters
// report production; an accumulator of credit per unit of weight advances in
// O(1) per report, and balances are settled lazily per account. All
// arithmetic is integer; the non-divisible remainder is carried, never lost.

pub mod arithmetic;
pub mod distribution;
pub mod ledger;
pub mod pool;
pub mod registry;
pub mod stake;

// Re-export key types for ergonomic access from downstream crates.
pub use arithmetic::{Credit, FixedScale, Quantity, Split, Weight, DEFAULT_SCALE};
pub use distribution::{DistributionConfig, DistributionLedger};
pub use ledger::LedgerHandle;
pub use pool::{DistributionPool, DistributionReceipt, Position, ProjectSummary, Settlement};
pub use registry::{OpenRegistration, OperatorRegistration, ProjectListing, ProjectRecord, Registry};
pub use stake::StakeLedger;
