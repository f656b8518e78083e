//! Execution plans - staged, uncommitted field writes for one removal.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::access::{EntityRef, FieldWrite, Value};
use crate::error::AccessError;

/// Set `field` on `entity` to `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanOp {
    /// Entity to mutate.
    pub entity: EntityRef,
    /// Field to overwrite.
    pub field: String,
    /// New value.
    pub value: Value,
}

/// Ordered field writes computed for a removal.
///
/// A plan is all-or-nothing: the host applies every operation together with
/// the deletion, or discards the plan. Writes to the same `(entity, field)`
/// are coalesced and keep the position of the first write.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionPlan {
    removed: EntityRef,
    ops: Vec<PlanOp>,
    staged: Vec<EntityRef>,
    #[serde(skip)]
    index: HashMap<(EntityRef, String), usize>,
    #[serde(skip)]
    staged_set: HashSet<EntityRef>,
}

impl ExecutionPlan {
    /// Create an empty plan for the removal of `removed`.
    pub fn empty(removed: EntityRef) -> Self {
        Self {
            removed,
            ops: Vec::new(),
            staged: Vec::new(),
            index: HashMap::new(),
            staged_set: HashSet::new(),
        }
    }

    /// Stage a field write and mark the entity for persistence.
    pub(crate) fn stage_set(&mut self, entity: &EntityRef, field: &str, value: Value) {
        let key = (entity.clone(), field.to_string());
        match self.index.get(&key) {
            Some(&pos) => self.ops[pos].value = value,
            None => {
                self.index.insert(key, self.ops.len());
                self.ops.push(PlanOp {
                    entity: entity.clone(),
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.staged_set.insert(entity.clone()) {
            self.staged.push(entity.clone());
        }
    }

    /// Value already staged for `(entity, field)`, if any.
    pub fn pending(&self, entity: &EntityRef, field: &str) -> Option<&Value> {
        self.index
            .get(&(entity.clone(), field.to_string()))
            .map(|&pos| &self.ops[pos].value)
    }

    /// Entity whose removal this plan accompanies.
    pub fn removed(&self) -> &EntityRef {
        &self.removed
    }

    /// Field writes in order.
    pub fn ops(&self) -> &[PlanOp] {
        &self.ops
    }

    /// Writes targeting `entity`.
    pub fn ops_for<'a>(&'a self, entity: &'a EntityRef) -> impl Iterator<Item = &'a PlanOp> + 'a {
        self.ops.iter().filter(move |op| &op.entity == entity)
    }

    /// Entities to persist, de-duplicated, in first-staged order.
    pub fn staged_entities(&self) -> &[EntityRef] {
        &self.staged
    }

    /// Number of field writes.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the plan has no writes.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Apply every write, in order, through `writer`.
    ///
    /// Stops at the first failure; the host is expected to apply plans inside
    /// its own transaction so that a failure rolls everything back.
    pub fn apply<W: FieldWrite + ?Sized>(&self, writer: &mut W) -> Result<(), AccessError> {
        for op in &self.ops {
            writer.set(&op.entity, &op.field, op.value.clone())?;
        }
        Ok(())
    }
}
