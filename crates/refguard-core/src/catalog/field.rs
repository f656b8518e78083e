//! Field definitions for entity types.

use serde::{Deserialize, Serialize};

use super::relation::{Cardinality, IntegrityAction, RelationDescriptor};

/// What a field holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain data, never followed by the engine.
    Scalar,
    /// A reference to one or many other entities.
    Reference(RelationDescriptor),
}

/// A field definition within an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Field kind.
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Integrity action declared on this field, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<IntegrityAction>,
}

impl FieldDef {
    /// Create a scalar field.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Scalar,
            integrity: None,
        }
    }

    /// Create a reference field.
    pub fn reference(name: impl Into<String>, descriptor: RelationDescriptor) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Reference(descriptor),
            integrity: None,
        }
    }

    /// Declare an integrity action on this field.
    pub fn with_integrity(mut self, action: IntegrityAction) -> Self {
        self.integrity = Some(action);
        self
    }

    /// Get the relation descriptor if this is a reference field.
    pub fn descriptor(&self) -> Option<&RelationDescriptor> {
        match &self.kind {
            FieldKind::Reference(d) => Some(d),
            FieldKind::Scalar => None,
        }
    }

    /// Get the cardinality if this is a reference field.
    pub fn cardinality(&self) -> Option<Cardinality> {
        self.descriptor().map(|d| d.cardinality)
    }
}
