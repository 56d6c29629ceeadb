use thiserror::Error;

use crate::city::facility::FacilityCategory;

/// Errors raised by the simulation core.
///
/// Every kind is recoverable at the action boundary: the action records the
/// message as its outcome and the engine keeps running.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("Settlement already exists: {0}")]
    DuplicateSettlement(String),

    #[error("Facility already exists: {0}")]
    DuplicateFacilityType(String),

    #[error("Settlement does not exist: {0}")]
    UnknownSettlement(String),

    #[error("Plan doesn't exist: {0}")]
    UnknownPlan(i64),

    #[error("Invalid selection policy: {0}")]
    InvalidPolicyCode(String),

    #[error("Cannot change selection policy: {0} is the current policy")]
    SamePolicyAsCurrent(String),

    #[error("Facility catalog is empty")]
    EmptyCatalog,

    #[error("No facility of category {0} in catalog")]
    NoMatchingCategory(FacilityCategory),

    #[error("No backup available")]
    NoBackupAvailable,
}

pub type Result<T> = std::result::Result<T, SimError>;
