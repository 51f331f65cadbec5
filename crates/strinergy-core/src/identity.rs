// crates/strinergy-core/src/identity.rs
//
// Identifiers for the parties of the production ledger.
//
// Accounts, projects and meters are opaque labels supplied by the invoking
// layer (addresses, DIDs, database keys). Nothing has to be declared before it
// is used: an account that was never seen simply holds zero weight and zero
// balance.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! label_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from any string-like label.
            pub fn new(label: impl Into<String>) -> Self {
                Self(label.into())
            }

            /// The underlying label.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(label: &str) -> Self {
                Self(label.to_string())
            }
        }

        impl From<String> for $name {
            fn from(label: String) -> Self {
                Self(label)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

label_id!(
    /// A stakeholder: holds stake weight and per-project claimable balances.
    AccountId
);

label_id!(
    /// A production project whose output is distributed to stake holders.
    ProjectId
);

label_id!(
    /// A reporting agent bound to exactly one project.
    MeterId
);

/// Identity of a stake ledger, assigned when the ledger is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LedgerId(pub Uuid);

impl LedgerId {
    /// Allocate a fresh, time-ordered ledger id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
