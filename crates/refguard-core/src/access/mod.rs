//! Runtime access to entities.
//!
//! The engine never inspects entities directly. It reads and writes named
//! reference fields through capabilities supplied by the host:
//! [`FieldAccess`], [`FieldWrite`] and [`EntityFetch`]. Typed hosts build
//! those capabilities from per-type [`AccessorTable`]s.

mod handle;
mod table;
mod traits;
mod value;

pub use handle::{EntityId, EntityRef};
pub use table::{AccessorTable, Entity, Getter, Setter};
pub use traits::{EntityFetch, FieldAccess, FieldWrite};
pub use value::{RefCollection, Value};
