//! Store traits - how the clone engine reads and writes records
//!
//! The engine never owns records. It addresses them through a cheap handle
//! (`AttributeStore::Record`) and asks the store to read attributes, create
//! duplicates and rewire relationship slots. Nothing here persists anything.

use std::fmt::Debug;
use std::hash::Hash;

use serde_json::Value;

/// Identity of a record for deduplication purposes
///
/// Stored records are identified by their primary key value, unsaved records
/// by their handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordIdentity<H> {
    /// Primary key value, rendered as a string
    Persisted(String),
    /// Handle of a record that has no primary key yet
    Transient(H),
}

/// Loaded value of a relationship slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Related<H> {
    /// To-one slot, possibly empty
    One(Option<H>),
    /// To-many slot
    Many(Vec<H>),
}

impl<H: Copy> Related<H> {
    /// All records held by this slot, in order
    pub fn records(&self) -> Vec<H> {
        match self {
            Related::One(record) => record.iter().copied().collect(),
            Related::Many(records) => records.clone(),
        }
    }

    /// The single record of a to-one slot (first record of a to-many slot)
    pub fn first(&self) -> Option<H> {
        match self {
            Related::One(record) => *record,
            Related::Many(records) => records.first().copied(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Related::One(record) => record.is_none(),
            Related::Many(records) => records.is_empty(),
        }
    }
}

impl<H> Default for Related<H> {
    fn default() -> Self {
        Related::One(None)
    }
}

/// Attribute bag access for records
pub trait AttributeStore {
    /// Handle used to address a record
    type Record: Copy + Eq + Hash + Debug;

    /// Type name of the record
    fn model_name(&self, record: Self::Record) -> String;

    /// Identity used to key the deduplication dictionary
    fn identity(&self, record: Self::Record) -> RecordIdentity<Self::Record>;

    /// Create a new, unsaved record of the same model with the same
    /// attributes, no primary key and no loaded relationships
    fn duplicate(&mut self, record: Self::Record) -> Self::Record;

    /// Read an attribute
    fn get(&self, record: Self::Record, attribute: &str) -> Option<Value>;

    /// Write an attribute
    fn set(&mut self, record: Self::Record, attribute: &str, value: Value);

    /// Column default for `attribute` on `model_name`
    fn default_value(&self, model_name: &str, attribute: &str) -> Value;

    /// Every attribute name carried by the record
    fn attribute_names(&self, record: Self::Record) -> Vec<String>;

    /// Flag the record so the persistence layer saves it without validations
    fn mark_skip_validation(&mut self, record: Self::Record);
}

/// Relationship slot access for records
pub trait RelationshipStore: AttributeStore {
    /// Loaded records of a relationship; an unknown or unloaded slot is empty
    fn get_related(&self, record: Self::Record, relationship: &str) -> Related<Self::Record>;

    /// Replace the contents of a relationship slot
    fn set_related(&mut self, record: Self::Record, relationship: &str, value: Related<Self::Record>);

    /// Append `value` to the in-memory collection `relationship` of `record`
    fn append_to_reverse_collection(&mut self, record: Self::Record, relationship: &str, value: Self::Record);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_related_accessors() {
        let one: Related<u32> = Related::One(Some(7));
        assert_eq!(one.records(), vec![7]);
        assert_eq!(one.first(), Some(7));
        assert!(!one.is_empty());

        let many: Related<u32> = Related::Many(vec![1, 2]);
        assert_eq!(many.records(), vec![1, 2]);
        assert_eq!(many.first(), Some(1));

        assert!(Related::<u32>::default().is_empty());
        assert!(Related::<u32>::Many(vec![]).is_empty());
    }
}
