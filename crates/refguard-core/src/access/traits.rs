//! Capabilities the host hands to the engine.

use super::handle::EntityRef;
use super::value::Value;
use crate::error::AccessError;

/// Read a named reference field.
pub trait FieldAccess {
    /// Current value of `field` on `entity`.
    fn get(&self, entity: &EntityRef, field: &str) -> Result<Value, AccessError>;
}

/// Write a named reference field.
///
/// Only used when a plan is applied; plan construction is read-only.
pub trait FieldWrite {
    /// Replace the value of `field` on `entity`.
    fn set(&mut self, entity: &EntityRef, field: &str, value: Value) -> Result<(), AccessError>;
}

/// Dereference values into the concrete entities to mutate.
pub trait EntityFetch {
    /// Check if the entity is live.
    fn exists(&self, entity: &EntityRef) -> Result<bool, AccessError>;

    /// Entities referenced by `value`, in value order.
    ///
    /// The default expands the handles as they are. Hosts with lazy proxies
    /// override this to load them.
    fn fetch(&self, value: &Value) -> Result<Vec<EntityRef>, AccessError> {
        Ok(value.refs().cloned().collect())
    }
}
