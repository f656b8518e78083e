//! Policy resolver - validates declared rules against metadata.
//!
//! Validation happens once per type, when its metadata is loaded, and never
//! touches live data. A type that fails here must not serve removals.

use std::collections::HashSet;

use super::rule::{FieldIntegrityRule, RawFieldRule, TypeIntegrityConfig};
use crate::catalog::{IntegrityAction, MetadataProvider, RelationDescriptor};
use crate::error::{ConfigError, Result};

/// Validates raw integrity declarations for one type at a time.
pub struct PolicyResolver<'a, M: MetadataProvider + ?Sized> {
    metadata: &'a M,
}

impl<'a, M: MetadataProvider + ?Sized> PolicyResolver<'a, M> {
    /// Create a resolver over a metadata provider.
    pub fn new(metadata: &'a M) -> Self {
        Self { metadata }
    }

    /// Validate the rules declared on `source_type`.
    ///
    /// Identical input always yields an identical configuration.
    pub fn validate(
        &self,
        source_type: &str,
        raw_rules: &[RawFieldRule],
    ) -> Result<TypeIntegrityConfig> {
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(raw_rules.len());

        for raw in raw_rules {
            if !seen.insert(raw.field.as_str()) {
                return Err(ConfigError::DuplicateRule {
                    field: raw.field.clone(),
                    source_type: source_type.to_string(),
                }
                .into());
            }

            let descriptor = self
                .metadata
                .field_descriptor(source_type, &raw.field)?
                .ok_or_else(|| ConfigError::NotAReference {
                    field: raw.field.clone(),
                    source_type: source_type.to_string(),
                })?;

            self.check_action(source_type, &raw.field, raw.action, &descriptor)?;
            rules.push(FieldIntegrityRule::new(&raw.field, raw.action, descriptor));
        }

        tracing::debug!(
            source_type,
            rules = rules.len(),
            "integrity rules validated"
        );

        Ok(TypeIntegrityConfig::new(source_type, rules))
    }

    fn check_action(
        &self,
        source_type: &str,
        field: &str,
        action: IntegrityAction,
        descriptor: &RelationDescriptor,
    ) -> Result<()> {
        if !action.requires_mapped_by() {
            return Ok(());
        }
        let mapped_by = self.check_mapped_field(source_type, field, descriptor)?;

        match action {
            IntegrityAction::Pull => {
                let inverse = self
                    .metadata
                    .field_descriptor(&descriptor.target_type, mapped_by)?;
                if !inverse.is_some_and(|d| d.is_collection()) {
                    return Err(ConfigError::MappedFieldNotCollection {
                        mapped_by: mapped_by.to_string(),
                        target_type: descriptor.target_type.clone(),
                    }
                    .into());
                }
            }
            IntegrityAction::Nullify | IntegrityAction::Restrict => {}
        }
        Ok(())
    }

    /// Check that the inverse side is declared and exists on the target.
    fn check_mapped_field<'d>(
        &self,
        source_type: &str,
        field: &str,
        descriptor: &'d RelationDescriptor,
    ) -> Result<&'d str> {
        let mapped_by =
            descriptor
                .mapped_by
                .as_deref()
                .ok_or_else(|| ConfigError::MissingMappedBy {
                    field: field.to_string(),
                    source_type: source_type.to_string(),
                })?;

        if !self.metadata.has_field(&descriptor.target_type, mapped_by)? {
            return Err(ConfigError::UnknownMappedField {
                mapped_by: mapped_by.to_string(),
                target_type: descriptor.target_type.clone(),
            }
            .into());
        }

        Ok(mapped_by)
    }
}
