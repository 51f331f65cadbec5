// crates/strinergy-core/src/traits.rs

use crate::identity::{AccountId, MeterId, ProjectId};

/// Decides which callers may create registry bindings.
///
/// Implemented by strinergy-economics (`OpenRegistration`,
/// `OperatorRegistration`); deployments may supply their own.
pub trait RegistrationPolicy: Send + Sync {
    /// May `caller` register `project`?
    fn may_register_project(&self, caller: &AccountId, project: &ProjectId) -> bool;

    /// May `caller` bind `meter` to `project`, which was registered by `project_owner`?
    fn may_register_meter(
        &self,
        caller: &AccountId,
        meter: &MeterId,
        project: &ProjectId,
        project_owner: &AccountId,
    ) -> bool;
}
