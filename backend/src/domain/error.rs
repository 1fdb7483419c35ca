//! Error types raised by the domain layer.
//!
//! `SplitError` covers share validation and is always a client mistake.
//! `DomainError` wraps it together with the workflow failures the REST layer
//! needs to tell apart when picking a status code.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    #[error("Unequal split amounts must sum to total amount")]
    UnequalSumMismatch { expected: f64, actual: f64 },
    #[error("Percentages must sum up to 100")]
    PercentageSumMismatch { actual: f64 },
    #[error("Invalid split type")]
    InvalidSplitType(String),
    #[error("At least one member is required to split an expense")]
    NoEligibleMembers,
    #[error("Member {0} appears more than once in the split")]
    DuplicateMember(String),
    #[error("Member {0} is not part of this expense")]
    MemberNotInScope(String),
    #[error("Split details are required for {0} splits")]
    MissingSplitDetails(String),
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    /// True for failures caused by the request itself rather than the system
    pub fn is_client_error(&self) -> bool {
        !matches!(self, DomainError::Storage(_))
    }
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;
