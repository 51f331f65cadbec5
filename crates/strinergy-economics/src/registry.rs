// crates/strinergy-economics/src/registry.rs
//
// Authorization and lookup: which projects exist, which stake ledger weights
// each project, and which meter reports for which project.
//
// Bindings are immutable once made. A meter's reports must be attributable to
// exactly one project, and a project's stake ledger must never change after
// registration, otherwise the accumulator would mix incompatible weights.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use crate::ledger::LedgerHandle;
use strinergy_core::error::StrinergyError;
use strinergy_core::identity::{AccountId, LedgerId, MeterId, ProjectId};
use strinergy_core::traits::RegistrationPolicy;

/// Policy that lets any caller register projects and meters.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenRegistration;

impl RegistrationPolicy for OpenRegistration {
    fn may_register_project(&self, _caller: &AccountId, _project: &ProjectId) -> bool {
        true
    }

    fn may_register_meter(
        &self,
        _caller: &AccountId,
        _meter: &MeterId,
        _project: &ProjectId,
        _project_owner: &AccountId,
    ) -> bool {
        true
    }
}

/// Policy restricting registration to a fixed operator set.
///
/// Operators may register projects. Meters may be bound by an operator or by
/// the account that registered the project.
#[derive(Debug, Clone, Default)]
pub struct OperatorRegistration {
    operators: HashSet<AccountId>,
}

impl OperatorRegistration {
    pub fn new(operators: impl IntoIterator<Item = AccountId>) -> Self {
        Self {
            operators: operators.into_iter().collect(),
        }
    }

    pub fn is_operator(&self, account: &AccountId) -> bool {
        self.operators.contains(account)
    }
}

impl RegistrationPolicy for OperatorRegistration {
    fn may_register_project(&self, caller: &AccountId, _project: &ProjectId) -> bool {
        self.is_operator(caller)
    }

    fn may_register_meter(
        &self,
        caller: &AccountId,
        _meter: &MeterId,
        _project: &ProjectId,
        project_owner: &AccountId,
    ) -> bool {
        self.is_operator(caller) || caller == project_owner
    }
}

/// A registered project.
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub ledger: LedgerHandle,
    pub registered_by: AccountId,
    pub meters: BTreeSet<MeterId>,
}

/// Serializable listing entry for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectListing {
    pub project: ProjectId,
    pub ledger: LedgerId,
    pub registered_by: AccountId,
    pub meters: Vec<MeterId>,
}

/// Project and meter bindings.
pub struct Registry {
    projects: HashMap<ProjectId, ProjectRecord>,
    meters: HashMap<MeterId, ProjectId>,
    policy: Arc<dyn RegistrationPolicy>,
}

impl Registry {
    pub fn new(policy: Arc<dyn RegistrationPolicy>) -> Self {
        Self {
            projects: HashMap::new(),
            meters: HashMap::new(),
            policy,
        }
    }

    /// Check that `caller` may register `project`.
    ///
    /// # Errors
    /// - `StrinergyError::AlreadyRegistered` if the project exists.
    /// - `StrinergyError::Unauthorized` if the policy refuses the caller.
    pub fn validate_project(&self, caller: &AccountId, project: &ProjectId) -> Result<(), StrinergyError> {
        if self.projects.contains_key(project) {
            return Err(StrinergyError::AlreadyRegistered(project.clone()));
        }
        if !self.policy.may_register_project(caller, project) {
            return Err(StrinergyError::Unauthorized(format!(
                "{} may not register project {}",
                caller, project
            )));
        }
        Ok(())
    }

    /// Record a project validated by `validate_project`.
    pub(crate) fn insert_project(&mut self, caller: &AccountId, project: &ProjectId, ledger: LedgerHandle) {
        self.projects.insert(
            project.clone(),
            ProjectRecord {
                ledger,
                registered_by: caller.clone(),
                meters: BTreeSet::new(),
            },
        );
    }

    /// Bind `meter` to `project`.
    ///
    /// # Errors
    /// - `StrinergyError::UnknownProject` if the project is not registered.
    /// - `StrinergyError::MeterAlreadyBound` if the meter is bound to any project.
    /// - `StrinergyError::Unauthorized` if the policy refuses the caller.
    pub fn register_meter(
        &mut self,
        caller: &AccountId,
        meter: &MeterId,
        project: &ProjectId,
    ) -> Result<(), StrinergyError> {
        let record = self
            .projects
            .get(project)
            .ok_or_else(|| StrinergyError::UnknownProject(project.clone()))?;
        if let Some(bound) = self.meters.get(meter) {
            return Err(StrinergyError::MeterAlreadyBound {
                meter: meter.clone(),
                project: bound.clone(),
            });
        }
        if !self
            .policy
            .may_register_meter(caller, meter, project, &record.registered_by)
        {
            return Err(StrinergyError::Unauthorized(format!(
                "{} may not bind meter {} to project {}",
                caller, meter, project
            )));
        }

        self.meters.insert(meter.clone(), project.clone());
        if let Some(record) = self.projects.get_mut(project) {
            record.meters.insert(meter.clone());
        }
        Ok(())
    }

    /// The project `meter` reports for, if bound.
    pub fn project_of(&self, meter: &MeterId) -> Option<&ProjectId> {
        self.meters.get(meter)
    }

    /// The registration record of `project`.
    pub fn project(&self, project: &ProjectId) -> Result<&ProjectRecord, StrinergyError> {
        self.projects
            .get(project)
            .ok_or_else(|| StrinergyError::UnknownProject(project.clone()))
    }

    /// The stake ledger weighting `project`.
    pub fn ledger_for(&self, project: &ProjectId) -> Result<&LedgerHandle, StrinergyError> {
        self.project(project).map(|record| &record.ledger)
    }

    /// All projects, sorted by id.
    pub fn listings(&self) -> Vec<ProjectListing> {
        let mut listings: Vec<ProjectListing> = self
            .projects
            .iter()
            .map(|(project, record)| ProjectListing {
                project: project.clone(),
                ledger: record.ledger.id(),
                registered_by: record.registered_by.clone(),
                meters: record.meters.iter().cloned().collect(),
            })
            .collect();
        listings.sort_by(|a, b| a.project.cmp(&b.project));
        listings
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(Arc::new(OpenRegistration))
    }
}
