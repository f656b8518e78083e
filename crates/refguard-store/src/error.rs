//! Store error types.

use refguard_core::{AccessError, EntityRef, IntegrityViolation};
use thiserror::Error;

/// Object store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Integrity enforcement refused or aborted the operation.
    #[error("integrity error: {0}")]
    Integrity(#[from] refguard_core::Error),

    /// Field access failed while applying a plan.
    #[error("access error: {0}")]
    Access(#[from] AccessError),

    /// Applying a plan failed and some earlier writes could not be undone.
    #[error("access error: {source} ({count} field(s) left unrestored)", count = .restore_failures.len())]
    RollbackIncomplete {
        /// The write that aborted the plan.
        source: AccessError,
        /// Restores that failed, most recent write first.
        restore_failures: Vec<AccessError>,
    },

    /// Entity type has not been registered.
    #[error("type '{0}' is not registered")]
    UnregisteredType(String),

    /// Entity type was registered twice.
    #[error("type '{0}' is already registered")]
    AlreadyRegistered(&'static str),

    /// An entity with the same handle is already stored.
    #[error("entity {0} already exists")]
    AlreadyExists(EntityRef),

    /// Entity not found.
    #[error("entity {0} not found")]
    NotFound(EntityRef),
}

impl StoreError {
    /// The restriction that refused the removal, if that is what happened.
    pub fn as_violation(&self) -> Option<&IntegrityViolation> {
        match self {
            StoreError::Integrity(e) => e.as_violation(),
            _ => None,
        }
    }

    /// Check if this error is a refused removal.
    pub fn is_restricted(&self) -> bool {
        self.as_violation().is_some()
    }
}

/// Result type for store operations.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
