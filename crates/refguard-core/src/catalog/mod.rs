//! Metadata catalog for reference integrity.
//!
//! The catalog describes entity types, their reference fields and the
//! integrity actions declared on them.

mod entity;
mod field;
mod provider;
mod relation;
mod schema;

pub use entity::TypeDef;
pub use field::{FieldDef, FieldKind};
pub use provider::{MetadataProvider, RuleSource};
pub use relation::{Cardinality, IntegrityAction, RelationDescriptor};
pub use schema::SchemaCatalog;
