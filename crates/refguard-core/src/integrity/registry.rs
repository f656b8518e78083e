//! Process-wide registry of validated integrity configurations.
//!
//! The registry holds an immutable snapshot behind an `Arc`. Readers clone
//! the `Arc` and never block on validation; a reload validates a complete
//! new snapshot first and only then swaps it in.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::resolver::PolicyResolver;
use super::rule::TypeIntegrityConfig;
use crate::catalog::RuleSource;
use crate::error::Result;

/// One immutable generation of validated configurations.
#[derive(Debug, Default)]
pub struct RegistrySnapshot {
    generation: u64,
    configs: HashMap<String, Arc<TypeIntegrityConfig>>,
}

impl RegistrySnapshot {
    /// Generation number; increases with every successful reload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Configuration for a type.
    pub fn get(&self, type_name: &str) -> Option<&Arc<TypeIntegrityConfig>> {
        self.configs.get(type_name)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Check if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.configs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Registry of validated configurations, keyed by type name.
#[derive(Debug, Default)]
pub struct IntegrityRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl IntegrityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate every type exposed by `source` and build a registry.
    ///
    /// Fails on the first invalid type; nothing is cached in that case.
    pub fn load<S: RuleSource + ?Sized>(source: &S) -> Result<Self> {
        let snapshot = build_snapshot(source, 1)?;
        tracing::info!(
            types = snapshot.len(),
            generation = snapshot.generation,
            "integrity registry loaded"
        );
        Ok(Self {
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// Rebuild from `source` and swap the whole snapshot.
    ///
    /// On failure the previous snapshot stays in place. Returns the new
    /// generation.
    pub fn reload<S: RuleSource + ?Sized>(&self, source: &S) -> Result<u64> {
        let mut snapshot = match build_snapshot(source, 0) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "integrity registry reload rejected");
                return Err(e);
            }
        };

        let mut current = self.current.write();
        snapshot.generation = current.generation + 1;
        let generation = snapshot.generation;
        *current = Arc::new(snapshot);
        drop(current);

        tracing::info!(generation, "integrity registry reloaded");
        Ok(generation)
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Configuration for a type in the current snapshot.
    pub fn get(&self, type_name: &str) -> Option<Arc<TypeIntegrityConfig>> {
        self.current.read().get(type_name).cloned()
    }

    /// Current generation; zero for an empty registry.
    pub fn generation(&self) -> u64 {
        self.current.read().generation
    }
}

fn build_snapshot<S: RuleSource + ?Sized>(
    source: &S,
    generation: u64,
) -> Result<RegistrySnapshot> {
    let resolver = PolicyResolver::new(source);
    let mut configs = HashMap::new();

    for type_name in source.type_names() {
        let raw = source.declared_rules(&type_name)?;
        let config = resolver.validate(&type_name, &raw)?;
        configs.insert(type_name, Arc::new(config));
    }

    Ok(RegistrySnapshot {
        generation,
        configs,
    })
}
