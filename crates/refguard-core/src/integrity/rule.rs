//! Integrity rule types.

use serde::{Deserialize, Serialize};

use crate::catalog::{IntegrityAction, RelationDescriptor};

/// An unvalidated `(field, action)` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFieldRule {
    /// Declaring field on the source type.
    pub field: String,
    /// Declared action.
    pub action: IntegrityAction,
}

impl RawFieldRule {
    /// Create a declaration.
    pub fn new(field: impl Into<String>, action: IntegrityAction) -> Self {
        Self {
            field: field.into(),
            action,
        }
    }
}

/// A validated rule for one reference field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIntegrityRule {
    field: String,
    action: IntegrityAction,
    descriptor: RelationDescriptor,
}

impl FieldIntegrityRule {
    pub(crate) fn new(
        field: impl Into<String>,
        action: IntegrityAction,
        descriptor: RelationDescriptor,
    ) -> Self {
        Self {
            field: field.into(),
            action,
            descriptor,
        }
    }

    /// Field on the source type.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Action to apply.
    pub fn action(&self) -> IntegrityAction {
        self.action
    }

    /// Relation described by the field.
    pub fn descriptor(&self) -> &RelationDescriptor {
        &self.descriptor
    }

    /// Inverse field on the target type, if declared.
    pub fn mapped_by(&self) -> Option<&str> {
        self.descriptor.mapped_by.as_deref()
    }
}

/// Validated rules for one source type, in declaration order.
///
/// Only the policy resolver builds these, so every rule satisfies the
/// structural preconditions of its action. The value is immutable after
/// construction and shared behind an `Arc` by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeIntegrityConfig {
    type_name: String,
    rules: Vec<FieldIntegrityRule>,
}

impl TypeIntegrityConfig {
    pub(crate) fn new(type_name: impl Into<String>, rules: Vec<FieldIntegrityRule>) -> Self {
        Self {
            type_name: type_name.into(),
            rules,
        }
    }

    /// Source type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[FieldIntegrityRule] {
        &self.rules
    }

    /// Rule declared on `field`, if any.
    pub fn rule(&self, field: &str) -> Option<&FieldIntegrityRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the type declares no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
