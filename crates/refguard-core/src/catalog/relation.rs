//! Relation descriptors for reference fields.

use serde::{Deserialize, Serialize};

/// Cardinality of a reference field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// The field holds at most one related entity.
    Single,
    /// The field holds many related entities.
    Collection,
}

impl Cardinality {
    /// Check if this is a collection-valued reference.
    pub fn is_collection(self) -> bool {
        self == Cardinality::Collection
    }

    /// Noun used in user-facing messages.
    pub fn noun(self) -> &'static str {
        match self {
            Cardinality::Single => "document",
            Cardinality::Collection => "collection",
        }
    }
}

/// Behavior applied to the inverse side when an entity is removed.
///
/// The set is closed on purpose: every dispatch over it is an exhaustive
/// `match`, so adding a variant fails to compile until each site handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityAction {
    /// Set the inverse field on every referenced entity to absent.
    Nullify,
    /// Remove the removed entity from the inverse collection.
    Pull,
    /// Refuse the removal while references exist.
    Restrict,
}

impl IntegrityAction {
    /// Check if the action mutates referenced entities.
    pub fn requires_mapped_by(self) -> bool {
        match self {
            IntegrityAction::Nullify | IntegrityAction::Pull => true,
            IntegrityAction::Restrict => false,
        }
    }

    /// Lower-case name as used in declarations.
    pub fn as_str(self) -> &'static str {
        match self {
            IntegrityAction::Nullify => "nullify",
            IntegrityAction::Pull => "pull",
            IntegrityAction::Restrict => "restrict",
        }
    }
}

impl std::fmt::Display for IntegrityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one reference field on a source type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    /// Whether the field holds one or many references.
    pub cardinality: Cardinality,
    /// Referenced type.
    pub target_type: String,
    /// Field on the target type pointing back at the source type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapped_by: Option<String>,
}

impl RelationDescriptor {
    /// Create a single-valued reference to `target_type`.
    pub fn single(target_type: impl Into<String>) -> Self {
        Self {
            cardinality: Cardinality::Single,
            target_type: target_type.into(),
            mapped_by: None,
        }
    }

    /// Create a collection-valued reference to `target_type`.
    pub fn collection(target_type: impl Into<String>) -> Self {
        Self {
            cardinality: Cardinality::Collection,
            target_type: target_type.into(),
            mapped_by: None,
        }
    }

    /// Set the inverse field on the target type.
    pub fn mapped_by(mut self, field: impl Into<String>) -> Self {
        self.mapped_by = Some(field.into());
        self
    }

    /// Check if this is a collection-valued reference.
    pub fn is_collection(&self) -> bool {
        self.cardinality.is_collection()
    }
}
