//! Type-erased per-type entity tables.

use std::any::Any;
use std::collections::HashMap;

use refguard_core::{AccessError, AccessorTable, Entity, EntityId, EntityRef, Value};

/// A stored entity and its persisted version.
pub(crate) struct Row<T> {
    pub(crate) entity: T,
    pub(crate) version: u64,
}

/// Object-safe view of one type's table.
pub(crate) trait Slot: Send + Sync {
    fn contains(&self, id: EntityId) -> bool;

    fn get(&self, id: EntityId, field: &str) -> Result<Value, AccessError>;

    fn set(&mut self, id: EntityId, field: &str, value: Value) -> Result<(), AccessError>;

    fn version(&self, id: EntityId) -> Option<u64>;

    /// Bump the version of a stored entity.
    fn persist(&mut self, id: EntityId) -> bool;

    fn delete(&mut self, id: EntityId) -> bool;

    fn len(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Table for entities of type `T`, with its accessors resolved once.
pub(crate) struct TypedSlot<T: Entity> {
    accessors: AccessorTable<T>,
    pub(crate) rows: HashMap<EntityId, Row<T>>,
}

impl<T: Entity> TypedSlot<T> {
    pub(crate) fn new() -> Self {
        Self {
            accessors: T::accessors(),
            rows: HashMap::new(),
        }
    }

    fn row(&self, id: EntityId) -> Result<&Row<T>, AccessError> {
        self.rows
            .get(&id)
            .ok_or_else(|| AccessError::UnknownEntity(EntityRef::new(T::TYPE_NAME, id).to_string()))
    }
}

impl<T: Entity> Slot for TypedSlot<T> {
    fn contains(&self, id: EntityId) -> bool {
        self.rows.contains_key(&id)
    }

    fn get(&self, id: EntityId, field: &str) -> Result<Value, AccessError> {
        self.accessors.get(&self.row(id)?.entity, field)
    }

    fn set(&mut self, id: EntityId, field: &str, value: Value) -> Result<(), AccessError> {
        let row = self
            .rows
            .get_mut(&id)
            .ok_or_else(|| AccessError::UnknownEntity(EntityRef::new(T::TYPE_NAME, id).to_string()))?;
        self.accessors.set(&mut row.entity, field, value)
    }

    fn version(&self, id: EntityId) -> Option<u64> {
        self.rows.get(&id).map(|row| row.version)
    }

    fn persist(&mut self, id: EntityId) -> bool {
        match self.rows.get_mut(&id) {
            Some(row) => {
                row.version += 1;
                true
            }
            None => false,
        }
    }

    fn delete(&mut self, id: EntityId) -> bool {
        self.rows.remove(&id).is_some()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
