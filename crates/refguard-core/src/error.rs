//! Core error types.

use thiserror::Error;

use crate::catalog::Cardinality;

/// Configuration errors raised while validating a type's integrity rules.
///
/// These are fatal at load time: a type that fails validation never gets a
/// cached configuration and therefore cannot be used for removals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// NULLIFY or PULL declared on a relation without an inverse side.
    #[error("reference '{field}' on '{source_type}' should have a 'mapped_by' option defined")]
    MissingMappedBy {
        /// Field carrying the rule.
        field: String,
        /// Type declaring the rule.
        source_type: String,
    },

    /// The inverse field does not exist on the target type.
    #[error("unable to find reference integrity field '{mapped_by}' as mapped property on '{target_type}'")]
    UnknownMappedField {
        /// Inverse field name.
        mapped_by: String,
        /// Type expected to hold it.
        target_type: String,
    },

    /// PULL requires the inverse field to be collection-valued.
    #[error("reference integrity field '{mapped_by}' on '{target_type}' should be a collection reference")]
    MappedFieldNotCollection {
        /// Inverse field name.
        mapped_by: String,
        /// Type holding it.
        target_type: String,
    },

    /// A rule was declared on a field that is not a reference.
    #[error("field '{field}' on '{source_type}' is not a reference field")]
    NotAReference {
        /// Field carrying the rule.
        field: String,
        /// Type declaring the rule.
        source_type: String,
    },

    /// The same field carries more than one rule.
    #[error("field '{field}' on '{source_type}' declares more than one integrity rule")]
    DuplicateRule {
        /// Field carrying the rules.
        field: String,
        /// Type declaring the rules.
        source_type: String,
    },

    /// Declarations could not be parsed.
    #[error("malformed integrity declaration: {0}")]
    Malformed(String),
}

/// A removal refused by a RESTRICT rule.
///
/// This is an expected business condition, not a crash: the caller should
/// abort the deletion and report it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityViolation {
    /// The restricted field still holds live references.
    #[error(
        "the reference integrity for the '{target_type}' {noun} in field '{field}' is restricted",
        noun = .cardinality.noun()
    )]
    Restricted {
        /// Restricted field on the removed entity.
        field: String,
        /// Type of the entities still referenced.
        target_type: String,
        /// Cardinality of the restricted field.
        cardinality: Cardinality,
    },
}

impl IntegrityViolation {
    /// Field that caused the refusal.
    pub fn field(&self) -> &str {
        match self {
            IntegrityViolation::Restricted { field, .. } => field,
        }
    }

    /// Type of the entities that are still referenced.
    pub fn target_type(&self) -> &str {
        match self {
            IntegrityViolation::Restricted { target_type, .. } => target_type,
        }
    }
}

/// Failures reported by metadata, field access or fetch collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The type is not known to the collaborator.
    #[error("unknown entity type: {0}")]
    UnknownType(String),

    /// The type has no accessor for the field.
    #[error("unknown field '{field}' on '{type_name}'")]
    UnknownField {
        /// Entity type.
        type_name: String,
        /// Requested field.
        field: String,
    },

    /// No live entity with that handle.
    #[error("entity not found: {0}")]
    UnknownEntity(String),

    /// A value of the wrong shape was read or written.
    #[error("type mismatch on '{type_name}.{field}': expected {expected}")]
    TypeMismatch {
        /// Entity type.
        type_name: String,
        /// Field involved.
        field: String,
        /// Expected value shape.
        expected: &'static str,
    },

    /// The field can be read but not written.
    #[error("field '{field}' on '{type_name}' is read-only")]
    ReadOnlyField {
        /// Entity type.
        type_name: String,
        /// Field involved.
        field: String,
    },

    /// Any other collaborator failure.
    #[error("{0}")]
    Other(String),
}

/// Top-level engine errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Integrity configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Removal refused by a RESTRICT rule.
    #[error("integrity violation: {0}")]
    Violation(#[from] IntegrityViolation),

    /// Collaborator failure.
    #[error("access error: {0}")]
    Access(#[from] AccessError),

    /// The plan would exceed the configured operation budget.
    #[error("execution plan exceeds budget: {attempted} operations (limit {limit})")]
    PlanBudgetExceeded {
        /// Configured limit.
        limit: usize,
        /// Operations the plan would have held.
        attempted: usize,
    },

    /// No integrity configuration is registered for the type.
    #[error("no integrity configuration registered for '{0}'")]
    UnconfiguredType(String),
}

impl Error {
    /// Returns the restriction if this error refused a removal.
    pub fn as_violation(&self) -> Option<&IntegrityViolation> {
        match self {
            Error::Violation(v) => Some(v),
            _ => None,
        }
    }

    /// Check if this error is a RESTRICT refusal.
    pub fn is_violation(&self) -> bool {
        self.as_violation().is_some()
    }
}

/// Result alias for engine operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
