//! Refguard Store - an in-memory typed object store with integrity
//! enforcement.
//!
//! Entity types register once through their accessor tables. Removals run
//! the integrity engine's before-remove hook and apply the resulting plan,
//! the persistence of every touched entity and the deletion under a single
//! write lock, so readers never observe a half-applied removal.

pub mod error;
mod slot;
pub mod store;

pub use error::{Result, StoreError};
pub use store::ObjectStore;
