//! Integrity engine - the before-remove hook hosts call.

use std::sync::Arc;

use super::config::EngineConfig;
use super::executor::ActionExecutor;
use super::plan::ExecutionPlan;
use super::registry::IntegrityRegistry;
use super::rule::TypeIntegrityConfig;
use crate::access::{EntityFetch, EntityRef, FieldAccess};
use crate::catalog::RuleSource;
use crate::error::{Error, Result};
use crate::metrics::{new_shared_metrics, SharedIntegrityMetrics};

/// Enforces reference integrity for removals.
///
/// The engine is `Send + Sync` and holds no per-removal state; share it
/// behind an `Arc` and call it from any thread.
#[derive(Debug)]
pub struct IntegrityEngine {
    registry: IntegrityRegistry,
    config: EngineConfig,
    metrics: SharedIntegrityMetrics,
}

impl IntegrityEngine {
    /// Create an engine over an existing registry.
    pub fn new(registry: IntegrityRegistry, config: EngineConfig) -> Self {
        Self {
            registry,
            config,
            metrics: new_shared_metrics(),
        }
    }

    /// Validate every type in `source` and create an engine.
    pub fn load<S: RuleSource + ?Sized>(source: &S, config: EngineConfig) -> Result<Self> {
        Ok(Self::new(IntegrityRegistry::load(source)?, config))
    }

    /// Report into a shared metrics registry.
    pub fn with_metrics(mut self, metrics: SharedIntegrityMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Rebuild the registry from `source`. See [`IntegrityRegistry::reload`].
    pub fn reload<S: RuleSource + ?Sized>(&self, source: &S) -> Result<u64> {
        self.registry.reload(source)
    }

    /// Get the registry.
    pub fn registry(&self) -> &IntegrityRegistry {
        &self.registry
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the metrics registry.
    pub fn metrics(&self) -> &SharedIntegrityMetrics {
        &self.metrics
    }

    /// Compute the writes that must accompany the removal of `entity`.
    ///
    /// Call before the entity is deleted. On `Ok` the host applies the plan
    /// and the deletion atomically; on `Err` it must abort the deletion.
    pub fn before_remove<H>(&self, entity: &EntityRef, host: &H) -> Result<ExecutionPlan>
    where
        H: FieldAccess + EntityFetch + ?Sized,
    {
        let result = self
            .config_for(entity)
            .and_then(|config| match config {
                Some(config) => self.execute(entity, &config, host),
                None => Ok(ExecutionPlan::empty(entity.clone())),
            });

        match &result {
            Ok(plan) => {
                self.metrics
                    .record_plan(plan.len() as u64, plan.staged_entities().len() as u64);
                tracing::debug!(
                    entity = %entity,
                    ops = plan.len(),
                    staged = plan.staged_entities().len(),
                    "integrity plan built"
                );
            }
            Err(Error::Violation(violation)) => {
                self.metrics.record_restriction(&entity.type_name);
                tracing::warn!(
                    entity = %entity,
                    field = violation.field(),
                    target_type = violation.target_type(),
                    "removal refused"
                );
            }
            Err(e) => {
                self.metrics.record_failure();
                tracing::error!(entity = %entity, error = %e, "integrity plan aborted");
            }
        }

        result
    }

    /// Check whether `entity` could be removed right now.
    ///
    /// Runs the same computation as [`before_remove`](Self::before_remove)
    /// and discards the plan. Metrics are not updated.
    pub fn check_remove<H>(&self, entity: &EntityRef, host: &H) -> Result<()>
    where
        H: FieldAccess + EntityFetch + ?Sized,
    {
        if let Some(config) = self.config_for(entity)? {
            ActionExecutor::new(&self.config).execute(entity, &config, host, host)?;
        }
        Ok(())
    }

    fn config_for(&self, entity: &EntityRef) -> Result<Option<Arc<TypeIntegrityConfig>>> {
        match self.registry.get(&entity.type_name) {
            Some(config) => Ok(Some(config)),
            None if self.config.require_config => {
                Err(Error::UnconfiguredType(entity.type_name.clone()))
            }
            None => Ok(None),
        }
    }

    fn execute<H>(
        &self,
        entity: &EntityRef,
        config: &TypeIntegrityConfig,
        host: &H,
    ) -> Result<ExecutionPlan>
    where
        H: FieldAccess + EntityFetch + ?Sized,
    {
        ActionExecutor::new(&self.config)
            .with_metrics(&self.metrics)
            .execute(entity, config, host, host)
    }
}
