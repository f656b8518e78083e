//! Refguard Core - reference integrity enforcement for object stores.
//!
//! Document databases and in-memory object graphs have no foreign keys. This
//! crate keeps the entities that point at a removed entity consistent
//! according to a per-field policy (nullify, pull, restrict), or refuses the
//! removal outright.
//!
//! The flow is:
//!
//! 1. A [`RuleSource`] (usually a [`SchemaCatalog`]) exposes declared rules.
//! 2. [`IntegrityRegistry::load`] validates them through the
//!    [`PolicyResolver`] and caches an immutable snapshot.
//! 3. The host fires [`IntegrityEngine::before_remove`], which returns an
//!    [`ExecutionPlan`] to apply together with the deletion, or an error that
//!    must abort it.

pub mod access;
pub mod catalog;
pub mod error;
pub mod integrity;
pub mod metrics;

pub use access::{
    AccessorTable, Entity, EntityFetch, EntityId, EntityRef, FieldAccess, FieldWrite,
    RefCollection, Value,
};
pub use catalog::{
    Cardinality, FieldDef, FieldKind, MetadataProvider, RelationDescriptor, RuleSource,
    SchemaCatalog, TypeDef,
};
pub use error::{AccessError, ConfigError, Error, IntegrityViolation};
pub use integrity::{
    ActionExecutor, EngineConfig, ExecutionPlan, FieldIntegrityRule, IntegrityAction,
    IntegrityEngine, IntegrityRegistry, PlanOp, PolicyResolver, RawFieldRule,
    TypeIntegrityConfig,
};
pub use metrics::{new_shared_metrics, IntegrityMetrics, MetricsSnapshot, SharedIntegrityMetrics};
