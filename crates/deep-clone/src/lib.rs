//! # elif-deep-clone: Deep cloning of model graphs
//!
//! Copies a record together with a selected part of its relationship graph.
//! Copies come back unsaved, with foreign keys and inverse relationships
//! relinked to the new records. Shared many-to-many records are linked,
//! not duplicated, and an optional dictionary makes sure every record
//! reachable through several paths is copied once.
//!
//! The engine talks to records through the [`AttributeStore`] and
//! [`RelationshipStore`] traits and learns relationship shapes from a
//! [`RelationshipResolver`]. [`MemoryStore`] and [`SchemaRegistry`] are the
//! in-crate implementations of those seams.

pub mod error;
pub mod config;
pub mod relationships;
pub mod schema;
pub mod store;
pub mod memory;
pub mod options;
pub mod dictionary;
pub mod hooks;
pub mod cloner;

#[cfg(test)]
mod tests;

// Re-export core traits and types
pub use error::*;
pub use config::*;
pub use relationships::*;
pub use schema::*;
pub use store::*;
pub use memory::*;
pub use options::*;
pub use dictionary::*;
pub use hooks::*;
pub use cloner::*;
