// crates/strinergy-core/src/error.rs

use thiserror::Error;

use crate::identity::{MeterId, ProjectId};

/// Error taxonomy shared by every Strinergy crate.
///
/// Every variant is a local validation failure: operations check all of
/// their preconditions before touching ledger state, so a returned error
/// always means nothing was mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrinergyError {
    /// A transfer, withdrawal or supply amount of zero.
    #[error("Invalid amount: amounts must be greater than zero")]
    InvalidAmount,

    /// The debited account holds less than the requested amount.
    #[error("Insufficient balance: requested {requested} but only {available} available")]
    InsufficientBalance { requested: u128, available: u128 },

    /// The project has not been registered.
    #[error("Unknown project: {0}")]
    UnknownProject(ProjectId),

    /// The project is already registered.
    #[error("Project already registered: {0}")]
    AlreadyRegistered(ProjectId),

    /// The meter is already bound to a project.
    #[error("Meter {meter} is already bound to project {project}")]
    MeterAlreadyBound { meter: MeterId, project: ProjectId },

    /// Production was reported by a meter that is not bound to any project.
    #[error("Unauthorized meter: {0}")]
    UnauthorizedMeter(MeterId),

    /// A production report of zero units.
    #[error("Invalid quantity: production must be greater than zero")]
    InvalidQuantity,

    /// Distribution against a stake ledger whose total weight is zero.
    #[error("Zero supply: distribution is undefined without stake weight")]
    ZeroSupply,

    /// The registration policy refused the caller.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Checked integer arithmetic would overflow.
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    /// Invalid configuration value.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StrinergyError {
    fn from(e: serde_json::Error) -> Self {
        StrinergyError::Serialization(e.to_string())
    }
}
