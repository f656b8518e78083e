//! Reference integrity enforcement.
//!
//! - [`PolicyResolver`] validates declared rules against metadata.
//! - [`IntegrityRegistry`] caches validated configurations per type.
//! - [`ActionExecutor`] turns a removal into an [`ExecutionPlan`] or a refusal.
//! - [`IntegrityEngine`] ties them together behind the before-remove hook.

mod config;
mod engine;
mod executor;
mod plan;
mod registry;
mod resolver;
mod rule;

pub use crate::catalog::IntegrityAction;
pub use config::EngineConfig;
pub use engine::IntegrityEngine;
pub use executor::ActionExecutor;
pub use plan::{ExecutionPlan, PlanOp};
pub use registry::{IntegrityRegistry, RegistrySnapshot};
pub use resolver::PolicyResolver;
pub use rule::{FieldIntegrityRule, RawFieldRule, TypeIntegrityConfig};
