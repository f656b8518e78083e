//! Entity type definitions.

use serde::{Deserialize, Serialize};

use super::field::FieldDef;
use crate::integrity::RawFieldRule;

/// An entity type definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Type name (unique within a catalog).
    pub name: String,
    /// Field definitions in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl TypeDef {
    /// Create a new type definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field to the type.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add multiple fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check if the type declares a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Integrity rules declared on this type, in declaration order.
    pub fn declared_rules(&self) -> Vec<RawFieldRule> {
        self.fields
            .iter()
            .filter_map(|f| f.integrity.map(|action| RawFieldRule::new(&f.name, action)))
            .collect()
    }
}
