//! Schema catalog - the in-memory metadata provider.

use serde::{Deserialize, Serialize};

use super::entity::TypeDef;
use super::provider::{MetadataProvider, RuleSource};
use super::relation::RelationDescriptor;
use crate::error::{AccessError, ConfigError};
use crate::integrity::RawFieldRule;

/// A snapshot of every known entity type.
///
/// Types keep the order in which they were added; that order is also the
/// order in which a registry validates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaCatalog {
    /// Type definitions.
    #[serde(default)]
    pub types: Vec<TypeDef>,
}

impl SchemaCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type, replacing any previous definition with the same name.
    pub fn with_type(mut self, ty: TypeDef) -> Self {
        self.insert(ty);
        self
    }

    /// Insert a type, replacing any previous definition with the same name.
    pub fn insert(&mut self, ty: TypeDef) {
        match self.types.iter_mut().find(|t| t.name == ty.name) {
            Some(existing) => *existing = ty,
            None => self.types.push(ty),
        }
    }

    /// Get a type by name.
    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Parse a catalog from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Serialize the catalog to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    fn require_type(&self, name: &str) -> Result<&TypeDef, AccessError> {
        self.get_type(name)
            .ok_or_else(|| AccessError::UnknownType(name.to_string()))
    }
}

impl MetadataProvider for SchemaCatalog {
    fn field_descriptor(
        &self,
        type_name: &str,
        field: &str,
    ) -> Result<Option<RelationDescriptor>, AccessError> {
        let ty = self.require_type(type_name)?;
        Ok(ty.get_field(field).and_then(|f| f.descriptor().cloned()))
    }

    fn has_field(&self, type_name: &str, field: &str) -> Result<bool, AccessError> {
        Ok(self.require_type(type_name)?.has_field(field))
    }
}

impl RuleSource for SchemaCatalog {
    fn type_names(&self) -> Vec<String> {
        self.types.iter().map(|t| t.name.clone()).collect()
    }

    fn declared_rules(&self, type_name: &str) -> Result<Vec<RawFieldRule>, AccessError> {
        Ok(self.require_type(type_name)?.declared_rules())
    }
}
