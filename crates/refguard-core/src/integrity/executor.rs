//! Action executor - computes the mutations a removal requires.
//!
//! The executor never writes. It reads through the host's capabilities,
//! stages writes in an [`ExecutionPlan`] and returns the plan, or discards it
//! on the first failure. Reads of fields already staged in the plan see the
//! staged value, so several rules touching the same inverse field compose.

use super::config::EngineConfig;
use super::plan::ExecutionPlan;
use super::rule::{FieldIntegrityRule, TypeIntegrityConfig};
use crate::access::{EntityFetch, EntityRef, FieldAccess, Value};
use crate::catalog::IntegrityAction;
use crate::error::{AccessError, ConfigError, Error, IntegrityViolation, Result};
use crate::metrics::IntegrityMetrics;

/// Builds execution plans for removals.
///
/// Stateless across calls: each [`execute`](Self::execute) is a function of
/// the removed entity, its configuration and the data the host exposes.
pub struct ActionExecutor<'a> {
    config: &'a EngineConfig,
    metrics: Option<&'a IntegrityMetrics>,
}

impl<'a> ActionExecutor<'a> {
    /// Create an executor.
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            config,
            metrics: None,
        }
    }

    /// Report stale pulls and skipped references to `metrics`.
    pub fn with_metrics(mut self, metrics: &'a IntegrityMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Compute the plan for removing `removed`.
    ///
    /// Rules run in declaration order. A RESTRICT violation, a collaborator
    /// failure or an exhausted budget returns an error and no plan at all.
    pub fn execute<A, F>(
        &self,
        removed: &EntityRef,
        config: &TypeIntegrityConfig,
        access: &A,
        fetch: &F,
    ) -> Result<ExecutionPlan>
    where
        A: FieldAccess + ?Sized,
        F: EntityFetch + ?Sized,
    {
        let mut plan = ExecutionPlan::empty(removed.clone());

        for rule in config.rules() {
            let value = access.get(removed, rule.field())?;

            match rule.action() {
                IntegrityAction::Nullify => {
                    let mapped_by = inverse_field(config.type_name(), rule)?;
                    self.nullify(removed, mapped_by, &value, fetch, &mut plan)?;
                }
                IntegrityAction::Pull => {
                    let mapped_by = inverse_field(config.type_name(), rule)?;
                    self.pull(removed, mapped_by, &value, access, fetch, &mut plan)?;
                }
                IntegrityAction::Restrict => {
                    restrict(rule, &value)?;
                }
            }

            if !self.config.within_budget(plan.len()) {
                return Err(Error::PlanBudgetExceeded {
                    limit: self.config.max_plan_operations.unwrap_or(usize::MAX),
                    attempted: plan.len(),
                });
            }
        }

        Ok(plan)
    }

    /// Set the inverse field of every referenced entity to absent.
    fn nullify<F: EntityFetch + ?Sized>(
        &self,
        removed: &EntityRef,
        mapped_by: &str,
        value: &Value,
        fetch: &F,
        plan: &mut ExecutionPlan,
    ) -> Result<()> {
        for target in self.targets(removed, value, fetch)? {
            plan.stage_set(&target, mapped_by, Value::Absent);
        }
        Ok(())
    }

    /// Remove the removed entity from the inverse collection of every
    /// referenced entity.
    fn pull<A, F>(
        &self,
        removed: &EntityRef,
        mapped_by: &str,
        value: &Value,
        access: &A,
        fetch: &F,
        plan: &mut ExecutionPlan,
    ) -> Result<()>
    where
        A: FieldAccess + ?Sized,
        F: EntityFetch + ?Sized,
    {
        for target in self.targets(removed, value, fetch)? {
            let current = match plan.pending(&target, mapped_by) {
                Some(staged) => staged.clone(),
                None => access.get(&target, mapped_by)?,
            };
            let mut collection =
                current
                    .into_collection()
                    .map_err(|expected| AccessError::TypeMismatch {
                        type_name: target.type_name.clone(),
                        field: mapped_by.to_string(),
                        expected,
                    })?;

            if collection.remove(removed) {
                plan.stage_set(&target, mapped_by, Value::Collection(collection));
            } else {
                tracing::debug!(
                    removed = %removed,
                    target = %target,
                    field = mapped_by,
                    "pull found nothing to remove"
                );
                if let Some(metrics) = self.metrics {
                    metrics.record_stale_pull();
                }
            }
        }
        Ok(())
    }

    /// Live entities referenced by `value`, excluding the removed entity.
    fn targets<F: EntityFetch + ?Sized>(
        &self,
        removed: &EntityRef,
        value: &Value,
        fetch: &F,
    ) -> Result<Vec<EntityRef>> {
        let mut targets = Vec::with_capacity(value.count());
        for target in fetch.fetch(value)? {
            if &target == removed {
                continue;
            }
            if !fetch.exists(&target)? {
                if !self.config.skip_dangling {
                    return Err(AccessError::UnknownEntity(target.to_string()).into());
                }
                tracing::debug!(removed = %removed, target = %target, "skipping dangling reference");
                if let Some(metrics) = self.metrics {
                    metrics.record_dangling();
                }
                continue;
            }
            targets.push(target);
        }
        Ok(targets)
    }
}

/// Refuse the removal while the field still references anything.
fn restrict(rule: &FieldIntegrityRule, value: &Value) -> Result<(), IntegrityViolation> {
    if value.is_empty() {
        return Ok(());
    }
    Err(IntegrityViolation::Restricted {
        field: rule.field().to_string(),
        target_type: rule.descriptor().target_type.clone(),
        cardinality: rule.descriptor().cardinality,
    })
}

// Validated configurations always carry an inverse for NULLIFY and PULL.
fn inverse_field<'r>(
    source_type: &str,
    rule: &'r FieldIntegrityRule,
) -> Result<&'r str, ConfigError> {
    rule.mapped_by().ok_or_else(|| ConfigError::MissingMappedBy {
        field: rule.field().to_string(),
        source_type: source_type.to_string(),
    })
}
