//! Named, typed field accessors.
//!
//! Each entity type describes its reference fields once as a table of plain
//! function pointers. Hosts build the table when the type is registered and
//! keep it for the life of the process.

use std::collections::HashMap;

use super::handle::{EntityId, EntityRef};
use super::value::Value;
use crate::error::AccessError;

/// Reads a field from an entity.
pub type Getter<T> = fn(&T) -> Value;

/// Writes a field on an entity.
///
/// On a shape mismatch the setter returns the shape it expected.
pub type Setter<T> = fn(&mut T, Value) -> Result<(), &'static str>;

struct Accessor<T> {
    get: Getter<T>,
    set: Option<Setter<T>>,
}

/// Field accessor table for one entity type.
pub struct AccessorTable<T> {
    type_name: &'static str,
    fields: HashMap<String, Accessor<T>>,
}

impl<T> AccessorTable<T> {
    /// Create an empty table.
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: HashMap::new(),
        }
    }

    /// Register a readable and writable field.
    pub fn field(mut self, name: impl Into<String>, get: Getter<T>, set: Setter<T>) -> Self {
        self.fields.insert(
            name.into(),
            Accessor {
                get,
                set: Some(set),
            },
        );
        self
    }

    /// Register a read-only field.
    pub fn read_only(mut self, name: impl Into<String>, get: Getter<T>) -> Self {
        self.fields.insert(name.into(), Accessor { get, set: None });
        self
    }

    /// Type name the table belongs to.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check if the table has an accessor for `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Read `field` from `entity`.
    pub fn get(&self, entity: &T, field: &str) -> Result<Value, AccessError> {
        let accessor = self.accessor(field)?;
        Ok((accessor.get)(entity))
    }

    /// Write `field` on `entity`.
    pub fn set(&self, entity: &mut T, field: &str, value: Value) -> Result<(), AccessError> {
        let accessor = self.accessor(field)?;
        let set = accessor.set.ok_or_else(|| AccessError::ReadOnlyField {
            type_name: self.type_name.to_string(),
            field: field.to_string(),
        })?;
        set(entity, value).map_err(|expected| AccessError::TypeMismatch {
            type_name: self.type_name.to_string(),
            field: field.to_string(),
            expected,
        })
    }

    fn accessor(&self, field: &str) -> Result<&Accessor<T>, AccessError> {
        self.fields.get(field).ok_or_else(|| AccessError::UnknownField {
            type_name: self.type_name.to_string(),
            field: field.to_string(),
        })
    }
}

impl<T> std::fmt::Debug for AccessorTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.fields.keys().collect();
        names.sort();
        f.debug_struct("AccessorTable")
            .field("type_name", &self.type_name)
            .field("fields", &names)
            .finish()
    }
}

/// A typed entity that can be stored by a host.
pub trait Entity: Send + Sync + 'static {
    /// Type name, matching the metadata catalog.
    const TYPE_NAME: &'static str;

    /// Identity of this entity within its type.
    fn id(&self) -> EntityId;

    /// Accessors for the entity's reference fields.
    ///
    /// Start from [`accessor_table`](Self::accessor_table) so the entity type
    /// is fixed before the first closure is checked.
    fn accessors() -> AccessorTable<Self>
    where
        Self: Sized;

    /// Empty accessor table for this type.
    fn accessor_table() -> AccessorTable<Self>
    where
        Self: Sized,
    {
        AccessorTable::new(Self::TYPE_NAME)
    }

    /// Handle naming this entity.
    fn entity_ref(&self) -> EntityRef {
        EntityRef::new(Self::TYPE_NAME, self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Comment {
        id: u64,
        article: Option<u64>,
        version: u64,
    }

    impl Entity for Comment {
        const TYPE_NAME: &'static str = "Comment";

        fn id(&self) -> EntityId {
            EntityId(self.id)
        }

        fn accessors() -> AccessorTable<Self> {
            Self::accessor_table()
                .field(
                    "article",
                    |c| c.article.map(|id| EntityRef::new("Article", id)).into(),
                    |c, v| {
                        c.article = v.into_single()?.map(|r| r.id.0);
                        Ok(())
                    },
                )
                .read_only("version", |c| {
                    Value::Single(EntityRef::new("Version", c.version))
                })
        }
    }

    #[test]
    fn test_get_and_set() {
        let table = Comment::accessors();
        let mut comment = Comment {
            id: 3,
            article: Some(1),
            version: 0,
        };

        assert_eq!(
            table.get(&comment, "article").unwrap(),
            Value::Single(EntityRef::new("Article", 1))
        );

        table.set(&mut comment, "article", Value::Absent).unwrap();
        assert_eq!(comment.article, None);
        assert_eq!(comment.entity_ref(), EntityRef::new("Comment", 3));
    }

    #[test]
    fn test_accessor_table_chains_several_fields() {
        let table = Comment::accessors();
        assert_eq!(table.type_name(), "Comment");
        assert!(table.has_field("article"));
        assert!(table.has_field("version"));
        assert!(!table.has_field("body"));
    }

    #[test]
    fn test_errors_carry_type_and_field() {
        let table = Comment::accessors();
        let mut comment = Comment {
            id: 3,
            article: None,
            version: 0,
        };

        assert!(matches!(
            table.get(&comment, "missing"),
            Err(AccessError::UnknownField { field, .. }) if field == "missing"
        ));
        assert!(matches!(
            table.set(&mut comment, "version", Value::Absent),
            Err(AccessError::ReadOnlyField { .. })
        ));
        assert!(matches!(
            table.set(&mut comment, "article", Value::Collection(Default::default())),
            Err(AccessError::TypeMismatch { expected: "single reference", .. })
        ));
    }
}
