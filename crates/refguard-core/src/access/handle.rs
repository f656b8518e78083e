//! Entity handles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an entity within its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        EntityId(id)
    }
}

/// Handle to one entity.
///
/// Equality is identity: two handles are equal exactly when they name the
/// same type and id. Collection membership and PULL removal rely on this.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// Entity type name.
    pub type_name: String,
    /// Entity id within the type.
    pub id: EntityId,
}

impl EntityRef {
    /// Create a handle.
    pub fn new(type_name: impl Into<String>, id: impl Into<EntityId>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.type_name, self.id)
    }
}
