//! Reference field values.

use serde::{Deserialize, Serialize};

use super::handle::EntityRef;

/// An ordered collection of entity handles.
///
/// Membership and removal use [`EntityRef`] equality, i.e. identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefCollection {
    items: Vec<EntityRef>,
}

impl RefCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handle.
    pub fn push(&mut self, entity: EntityRef) {
        self.items.push(entity);
    }

    /// Check if the collection holds `entity`.
    pub fn contains(&self, entity: &EntityRef) -> bool {
        self.items.contains(entity)
    }

    /// Remove the first element equal to `entity`.
    ///
    /// Returns `false` if no element matched; that is not an error.
    pub fn remove(&mut self, entity: &EntityRef) -> bool {
        match self.items.iter().position(|e| e == entity) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of elements.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Iterate over the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, EntityRef> {
        self.items.iter()
    }
}

impl FromIterator<EntityRef> for RefCollection {
    fn from_iter<I: IntoIterator<Item = EntityRef>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RefCollection {
    type Item = EntityRef;
    type IntoIter = std::vec::IntoIter<EntityRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a RefCollection {
    type Item = &'a EntityRef;
    type IntoIter = std::slice::Iter<'a, EntityRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// The value of a reference field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// No reference.
    #[default]
    Absent,
    /// A single referenced entity.
    Single(EntityRef),
    /// Many referenced entities.
    Collection(RefCollection),
}

impl Value {
    /// Build a collection value.
    pub fn collection(items: impl IntoIterator<Item = EntityRef>) -> Self {
        Value::Collection(items.into_iter().collect())
    }

    /// Check if the value is absent.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Check if the value references nothing (absent or an empty collection).
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Absent => true,
            Value::Single(_) => false,
            Value::Collection(c) => c.is_empty(),
        }
    }

    /// Number of referenced entities.
    pub fn count(&self) -> usize {
        match self {
            Value::Absent => 0,
            Value::Single(_) => 1,
            Value::Collection(c) => c.count(),
        }
    }

    /// Iterate over every referenced handle.
    pub fn refs(&self) -> Box<dyn Iterator<Item = &EntityRef> + '_> {
        match self {
            Value::Absent => Box::new(std::iter::empty()),
            Value::Single(r) => Box::new(std::iter::once(r)),
            Value::Collection(c) => Box::new(c.iter()),
        }
    }

    /// Convert to an optional single reference.
    ///
    /// The error carries the expected shape for the caller's message.
    pub fn into_single(self) -> Result<Option<EntityRef>, &'static str> {
        match self {
            Value::Absent => Ok(None),
            Value::Single(r) => Ok(Some(r)),
            Value::Collection(_) => Err("single reference"),
        }
    }

    /// Convert to a collection; absent reads as empty.
    pub fn into_collection(self) -> Result<RefCollection, &'static str> {
        match self {
            Value::Absent => Ok(RefCollection::new()),
            Value::Collection(c) => Ok(c),
            Value::Single(_) => Err("collection reference"),
        }
    }
}

impl From<Option<EntityRef>> for Value {
    fn from(entity: Option<EntityRef>) -> Self {
        match entity {
            Some(r) => Value::Single(r),
            None => Value::Absent,
        }
    }
}

impl From<EntityRef> for Value {
    fn from(entity: EntityRef) -> Self {
        Value::Single(entity)
    }
}

impl From<RefCollection> for Value {
    fn from(collection: RefCollection) -> Self {
        Value::Collection(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(id: u64) -> EntityRef {
        EntityRef::new("Tag", id)
    }

    #[test]
    fn test_collection_remove_by_identity() {
        let mut c: RefCollection = [r(1), r(2), r(3)].into_iter().collect();

        assert!(c.remove(&r(2)));
        assert_eq!(c.count(), 2);
        assert!(!c.contains(&r(2)));
        assert!(c.contains(&r(1)) && c.contains(&r(3)));

        // Removing an element that is not there is a no-op.
        assert!(!c.remove(&r(2)));
        assert!(!c.remove(&EntityRef::new("Post", 1)));
        assert_eq!(c.count(), 2);
    }

    #[test]
    fn test_collection_remove_first_occurrence_only() {
        let mut c: RefCollection = [r(1), r(1)].into_iter().collect();
        assert!(c.remove(&r(1)));
        assert_eq!(c.count(), 1);
    }

    #[test]
    fn test_value_emptiness() {
        assert!(Value::Absent.is_empty());
        assert!(Value::Collection(RefCollection::new()).is_empty());
        assert!(!Value::Single(r(1)).is_empty());
        assert!(!Value::collection([r(1)]).is_empty());
        assert_eq!(Value::collection([r(1), r(2)]).count(), 2);
        assert_eq!(Value::Single(r(7)).refs().count(), 1);
    }

    #[test]
    fn test_value_shape_conversions() {
        assert_eq!(Value::Absent.into_single(), Ok(None));
        assert_eq!(Value::Single(r(1)).into_single(), Ok(Some(r(1))));
        assert!(Value::collection([r(1)]).into_single().is_err());

        assert!(Value::Absent.into_collection().unwrap().is_empty());
        assert!(Value::Single(r(1)).into_collection().is_err());
    }
}
