//! Collaborator contracts consumed while validating integrity rules.

use super::relation::RelationDescriptor;
use crate::error::AccessError;
use crate::integrity::RawFieldRule;

/// Read access to per-type field metadata.
///
/// Used only during policy validation, never while building a plan.
pub trait MetadataProvider {
    /// Describe a reference field.
    ///
    /// Returns `Ok(None)` if the field does not exist or is not a reference.
    fn field_descriptor(
        &self,
        type_name: &str,
        field: &str,
    ) -> Result<Option<RelationDescriptor>, AccessError>;

    /// Check if a type declares a field of any kind.
    fn has_field(&self, type_name: &str, field: &str) -> Result<bool, AccessError>;
}

/// A source of raw, unvalidated integrity declarations.
///
/// This is the boundary to whatever parses annotations or schema files.
pub trait RuleSource: MetadataProvider {
    /// Names of every type that may declare rules.
    fn type_names(&self) -> Vec<String>;

    /// Rules declared on a type, in declaration order.
    fn declared_rules(&self, type_name: &str) -> Result<Vec<RawFieldRule>, AccessError>;
}
