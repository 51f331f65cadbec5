// crates/strinergy-core/src/lib.rs
//
// strinergy-core: identifiers, error taxonomy and trait interfaces for the
// Strinergy production ledger.
//
// This is the leaf crate that the rest of the workspace depends on.

pub mod error;
pub mod identity;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
pub use error::StrinergyError;
pub use identity::{AccountId, LedgerId, MeterId, ProjectId};
pub use traits::RegistrationPolicy;
