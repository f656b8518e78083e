//! In-memory object store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use refguard_core::{
    AccessError, Entity, EntityFetch, EntityId, EntityRef, ExecutionPlan, FieldAccess, FieldWrite,
    IntegrityEngine, Value,
};

use crate::error::{Result, StoreError};
use crate::slot::{Row, Slot, TypedSlot};

/// All registered tables, keyed by type name.
#[derive(Default)]
struct Tables {
    slots: HashMap<String, Box<dyn Slot>>,
}

impl Tables {
    fn slot(&self, type_name: &str) -> std::result::Result<&dyn Slot, AccessError> {
        self.slots
            .get(type_name)
            .map(|slot| &**slot)
            .ok_or_else(|| AccessError::UnknownType(type_name.to_string()))
    }

    fn typed<T: Entity>(&self) -> Option<&TypedSlot<T>> {
        self.slots.get(T::TYPE_NAME)?.as_any().downcast_ref()
    }

    fn typed_mut<T: Entity>(&mut self) -> Result<&mut TypedSlot<T>> {
        self.slots
            .get_mut(T::TYPE_NAME)
            .and_then(|slot| slot.as_any_mut().downcast_mut())
            .ok_or_else(|| StoreError::UnregisteredType(T::TYPE_NAME.to_string()))
    }

    fn contains(&self, entity: &EntityRef) -> bool {
        self.slot(&entity.type_name)
            .map(|slot| slot.contains(entity.id))
            .unwrap_or(false)
    }

    /// Apply every write of `plan`, restoring previous values on failure.
    ///
    /// A restore can fail when a setter rejects the value it previously
    /// held; those failures come back alongside the original error.
    fn apply(&mut self, plan: &ExecutionPlan) -> Result<()> {
        let mut undo: Vec<(&EntityRef, &str, Value)> = Vec::with_capacity(plan.len());

        for op in plan.ops() {
            let previous = match self.get(&op.entity, &op.field) {
                Ok(previous) => previous,
                Err(e) => return Err(self.abort(undo, e)),
            };
            if let Err(e) = self.set(&op.entity, &op.field, op.value.clone()) {
                return Err(self.abort(undo, e));
            }
            undo.push((&op.entity, op.field.as_str(), previous));
        }
        Ok(())
    }

    fn abort(&mut self, undo: Vec<(&EntityRef, &str, Value)>, source: AccessError) -> StoreError {
        let restore_failures = self.rollback(undo);
        if restore_failures.is_empty() {
            return StoreError::Access(source);
        }
        tracing::error!(
            error = %source,
            unrestored = restore_failures.len(),
            "plan rollback incomplete"
        );
        StoreError::RollbackIncomplete {
            source,
            restore_failures,
        }
    }

    /// Undo writes in reverse order, collecting the restores that failed.
    fn rollback(&mut self, undo: Vec<(&EntityRef, &str, Value)>) -> Vec<AccessError> {
        let mut failures = Vec::new();
        for (entity, field, previous) in undo.into_iter().rev() {
            if let Err(e) = self.set(entity, field, previous) {
                tracing::error!(entity = %entity, field, error = %e, "failed to restore field");
                failures.push(e);
            }
        }
        failures
    }

    /// Bump the version of every entity the plan staged, except `removed`.
    fn persist(&mut self, plan: &ExecutionPlan) {
        for entity in plan.staged_entities() {
            if entity == plan.removed() {
                continue;
            }
            if let Some(slot) = self.slots.get_mut(&entity.type_name) {
                slot.persist(entity.id);
            }
        }
    }
}

impl FieldAccess for Tables {
    fn get(&self, entity: &EntityRef, field: &str) -> std::result::Result<Value, AccessError> {
        self.slot(&entity.type_name)?.get(entity.id, field)
    }
}

impl FieldWrite for Tables {
    fn set(
        &mut self,
        entity: &EntityRef,
        field: &str,
        value: Value,
    ) -> std::result::Result<(), AccessError> {
        self.slots
            .get_mut(&entity.type_name)
            .ok_or_else(|| AccessError::UnknownType(entity.type_name.clone()))?
            .set(entity.id, field, value)
    }
}

impl EntityFetch for Tables {
    fn exists(&self, entity: &EntityRef) -> std::result::Result<bool, AccessError> {
        Ok(self.slot(&entity.type_name)?.contains(entity.id))
    }
}

/// Typed, in-memory entity store.
///
/// Every removal goes through the integrity engine. A refused or failed
/// removal leaves the store as it was, unless a setter rejects the value it
/// held before; that case is reported as [`StoreError::RollbackIncomplete`].
pub struct ObjectStore {
    tables: RwLock<Tables>,
    engine: Arc<IntegrityEngine>,
}

impl ObjectStore {
    /// Create an empty store enforcing `engine`.
    pub fn new(engine: Arc<IntegrityEngine>) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            engine,
        }
    }

    /// Get the integrity engine.
    pub fn engine(&self) -> &Arc<IntegrityEngine> {
        &self.engine
    }

    /// Register entity type `T`, resolving its accessors once.
    pub fn register<T: Entity>(&self) -> Result<()> {
        let mut tables = self.tables.write();
        if tables.slots.contains_key(T::TYPE_NAME) {
            return Err(StoreError::AlreadyRegistered(T::TYPE_NAME));
        }
        tables
            .slots
            .insert(T::TYPE_NAME.to_string(), Box::new(TypedSlot::<T>::new()));
        tracing::debug!(type_name = T::TYPE_NAME, "entity type registered");
        Ok(())
    }

    /// Store a new entity.
    pub fn insert<T: Entity>(&self, entity: T) -> Result<EntityRef> {
        let handle = entity.entity_ref();
        let mut tables = self.tables.write();
        let slot = tables.typed_mut::<T>()?;
        if slot.rows.contains_key(&handle.id) {
            return Err(StoreError::AlreadyExists(handle));
        }
        slot.rows.insert(handle.id, Row { entity, version: 1 });
        Ok(handle)
    }

    /// Modify a stored entity in place and persist it.
    ///
    /// Returns the new version. Updates do not run integrity rules.
    pub fn update<T, F>(&self, id: impl Into<EntityId>, f: F) -> Result<u64>
    where
        T: Entity,
        F: FnOnce(&mut T),
    {
        let id = id.into();
        let mut tables = self.tables.write();
        let row = tables
            .typed_mut::<T>()?
            .rows
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(EntityRef::new(T::TYPE_NAME, id)))?;
        f(&mut row.entity);
        row.version += 1;
        Ok(row.version)
    }

    /// Get a copy of a stored entity.
    pub fn get<T: Entity + Clone>(&self, id: impl Into<EntityId>) -> Option<T> {
        self.with(id, T::clone)
    }

    /// Run `f` against a stored entity.
    pub fn with<T: Entity, R>(&self, id: impl Into<EntityId>, f: impl FnOnce(&T) -> R) -> Option<R> {
        let tables = self.tables.read();
        tables
            .typed::<T>()?
            .rows
            .get(&id.into())
            .map(|row| f(&row.entity))
    }

    /// Read a reference field through the registered accessors.
    pub fn field(&self, entity: &EntityRef, field: &str) -> Result<Value> {
        Ok(self.tables.read().get(entity, field)?)
    }

    /// Check if an entity is stored.
    pub fn contains(&self, entity: &EntityRef) -> bool {
        self.tables.read().contains(entity)
    }

    /// Persisted version of an entity.
    pub fn version(&self, entity: &EntityRef) -> Option<u64> {
        let tables = self.tables.read();
        tables.slot(&entity.type_name).ok()?.version(entity.id)
    }

    /// Number of stored entities of a type.
    pub fn count(&self, type_name: &str) -> usize {
        self.tables
            .read()
            .slot(type_name)
            .map(|slot| slot.len())
            .unwrap_or(0)
    }

    /// Total number of stored entities.
    pub fn len(&self) -> usize {
        self.tables.read().slots.values().map(|slot| slot.len()).sum()
    }

    /// Check if the store holds no entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether `entity` could be removed right now.
    pub fn check_remove(&self, entity: &EntityRef) -> Result<()> {
        let tables = self.tables.read();
        if !tables.contains(entity) {
            return Err(StoreError::NotFound(entity.clone()));
        }
        self.engine.check_remove(entity, &*tables)?;
        Ok(())
    }

    /// Remove an entity, keeping every entity that references it consistent.
    ///
    /// Runs the before-remove hook, applies the plan, persists the touched
    /// entities and deletes `entity`, all under the write lock. Returns the
    /// applied plan.
    pub fn remove(&self, entity: &EntityRef) -> Result<ExecutionPlan> {
        let mut tables = self.tables.write();
        if !tables.contains(entity) {
            return Err(StoreError::NotFound(entity.clone()));
        }

        let plan = self.engine.before_remove(entity, &*tables)?;
        tables.apply(&plan)?;
        tables.persist(&plan);
        if let Some(slot) = tables.slots.get_mut(&entity.type_name) {
            slot.delete(entity.id);
        }
        drop(tables);

        tracing::debug!(
            entity = %entity,
            ops = plan.len(),
            persisted = plan.staged_entities().len(),
            "entity removed"
        );
        Ok(plan)
    }
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self.tables.read();
        let mut types: Vec<_> = tables.slots.keys().collect();
        types.sort();
        f.debug_struct("ObjectStore")
            .field("types", &types)
            .field("entities", &tables.slots.values().map(|s| s.len()).sum::<usize>())
            .finish()
    }
}
