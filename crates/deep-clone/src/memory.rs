//! In-memory record graph
//!
//! `MemoryStore` keeps records in an arena and hands out `RecordId` handles.
//! It implements both store traits over a [`SchemaRegistry`], which makes it
//! the reference backend for the clone engine and for fixtures built in
//! tests. It does not persist anything; `create` only simulates an already
//! stored record by assigning a primary key.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{CloneError, CloneResult};
use crate::schema::SchemaRegistry;
use crate::store::{AttributeStore, RecordIdentity, Related, RelationshipStore};

/// Handle to a record held by a [`MemoryStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(usize);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct StoredRecord {
    model: String,
    attributes: Map<String, Value>,
    relationships: HashMap<String, Related<RecordId>>,
    skip_validation: bool,
}

/// Arena-backed record graph
///
/// Handles are only meaningful for the store that issued them; passing a
/// foreign handle panics.
#[derive(Debug)]
pub struct MemoryStore {
    schema: Arc<SchemaRegistry>,
    records: Vec<StoredRecord>,
    next_key: i64,
}

impl MemoryStore {
    pub fn new(schema: Arc<SchemaRegistry>) -> Self {
        Self {
            schema,
            records: Vec::new(),
            next_key: 1,
        }
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// Add an unsaved record; missing columns take their defaults
    pub fn insert(&mut self, model_name: &str, attributes: Value) -> CloneResult<RecordId> {
        let model = self.schema.model(model_name).ok_or_else(|| {
            CloneError::Schema(format!("Model '{}' is not registered", model_name))
        })?;

        let mut given = match attributes {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(CloneError::Serialization(format!(
                    "Attributes for '{}' must be a JSON object, got {}",
                    model_name, other
                )))
            }
        };

        let names = model.attribute_names();
        if let Some(unknown) = given.keys().find(|key| !names.contains(key)) {
            return Err(CloneError::Schema(format!(
                "Model '{}' has no column '{}'",
                model_name, unknown
            )));
        }

        let mut bag = Map::new();
        for name in names {
            let value = given
                .remove(&name)
                .unwrap_or_else(|| model.default_value(&name));
            bag.insert(name, value);
        }

        self.records.push(StoredRecord {
            model: model_name.to_string(),
            attributes: bag,
            relationships: HashMap::new(),
            skip_validation: false,
        });
        Ok(RecordId(self.records.len() - 1))
    }

    /// Add a record that looks stored: it gets the next primary key value
    pub fn create(&mut self, model_name: &str, attributes: Value) -> CloneResult<RecordId> {
        let record = self.insert(model_name, attributes)?;
        let primary_key = self.primary_key_name(record);
        let key = self.next_key;
        self.next_key += 1;
        self.entry_mut(record)
            .attributes
            .insert(primary_key, Value::from(key));
        Ok(record)
    }

    /// Replace a declared relationship slot
    pub fn attach(&mut self, record: RecordId, relationship: &str, value: Related<RecordId>) -> CloneResult<()> {
        self.ensure_relationship(record, relationship)?;
        self.set_related(record, relationship, value);
        Ok(())
    }

    /// Append to a declared collection slot
    pub fn push_related(&mut self, record: RecordId, relationship: &str, other: RecordId) -> CloneResult<()> {
        self.ensure_relationship(record, relationship)?;
        self.append_to_reverse_collection(record, relationship, other);
        Ok(())
    }

    /// Records held by a relationship slot
    pub fn related_many(&self, record: RecordId, relationship: &str) -> Vec<RecordId> {
        self.get_related(record, relationship).records()
    }

    /// Single record held by a to-one slot
    pub fn related_one(&self, record: RecordId, relationship: &str) -> Option<RecordId> {
        self.get_related(record, relationship).first()
    }

    /// Attribute bag of a record
    pub fn attributes(&self, record: RecordId) -> &Map<String, Value> {
        &self.entry(record).attributes
    }

    /// True while the record has no primary key value
    pub fn is_new_record(&self, record: RecordId) -> bool {
        let primary_key = self.primary_key_name(record);
        self.entry(record)
            .attributes
            .get(&primary_key)
            .map_or(true, Value::is_null)
    }

    /// True when the record was flagged to be saved without validations
    pub fn skips_validation(&self, record: RecordId) -> bool {
        self.entry(record).skip_validation
    }

    /// Handles of all records of `model_name`, oldest first
    pub fn records_of(&self, model_name: &str) -> Vec<RecordId> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, stored)| stored.model == model_name)
            .map(|(index, _)| RecordId(index))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn entry(&self, record: RecordId) -> &StoredRecord {
        &self.records[record.0]
    }

    fn entry_mut(&mut self, record: RecordId) -> &mut StoredRecord {
        &mut self.records[record.0]
    }

    fn primary_key_name(&self, record: RecordId) -> String {
        self.schema
            .model(&self.entry(record).model)
            .map(|model| model.primary_key.clone())
            .unwrap_or_else(|| "id".to_string())
    }

    fn ensure_relationship(&self, record: RecordId, relationship: &str) -> CloneResult<()> {
        let model = &self.entry(record).model;
        if self.schema.relationships().has_relationship(model, relationship) {
            Ok(())
        } else {
            Err(CloneError::association_not_found(model, relationship))
        }
    }

    fn empty_slot(&self, model: &str, relationship: &str) -> Related<RecordId> {
        match self.schema.relationships().get(model, relationship) {
            Some(metadata) if metadata.relationship_type.is_collection() => Related::Many(Vec::new()),
            _ => Related::One(None),
        }
    }
}

impl AttributeStore for MemoryStore {
    type Record = RecordId;

    fn model_name(&self, record: RecordId) -> String {
        self.entry(record).model.clone()
    }

    fn identity(&self, record: RecordId) -> RecordIdentity<RecordId> {
        let primary_key = self.primary_key_name(record);
        match self.entry(record).attributes.get(&primary_key) {
            None | Some(Value::Null) => RecordIdentity::Transient(record),
            Some(Value::String(key)) => RecordIdentity::Persisted(key.clone()),
            Some(key) => RecordIdentity::Persisted(key.to_string()),
        }
    }

    fn duplicate(&mut self, record: RecordId) -> RecordId {
        let primary_key = self.primary_key_name(record);
        let source = self.entry(record);
        let mut attributes = source.attributes.clone();
        attributes.insert(primary_key, Value::Null);

        let copy = StoredRecord {
            model: source.model.clone(),
            attributes,
            relationships: HashMap::new(),
            skip_validation: false,
        };
        self.records.push(copy);
        RecordId(self.records.len() - 1)
    }

    fn get(&self, record: RecordId, attribute: &str) -> Option<Value> {
        self.entry(record).attributes.get(attribute).cloned()
    }

    fn set(&mut self, record: RecordId, attribute: &str, value: Value) {
        self.entry_mut(record)
            .attributes
            .insert(attribute.to_string(), value);
    }

    fn default_value(&self, model_name: &str, attribute: &str) -> Value {
        self.schema.default_value(model_name, attribute)
    }

    fn attribute_names(&self, record: RecordId) -> Vec<String> {
        self.entry(record).attributes.keys().cloned().collect()
    }

    fn mark_skip_validation(&mut self, record: RecordId) {
        self.entry_mut(record).skip_validation = true;
    }
}

impl RelationshipStore for MemoryStore {
    fn get_related(&self, record: RecordId, relationship: &str) -> Related<RecordId> {
        let stored = self.entry(record);
        match stored.relationships.get(relationship) {
            Some(value) => value.clone(),
            None => self.empty_slot(&stored.model, relationship),
        }
    }

    fn set_related(&mut self, record: RecordId, relationship: &str, value: Related<RecordId>) {
        self.entry_mut(record)
            .relationships
            .insert(relationship.to_string(), value);
    }

    fn append_to_reverse_collection(&mut self, record: RecordId, relationship: &str, value: RecordId) {
        let mut slot = self.get_related(record, relationship);
        match slot {
            Related::Many(ref mut records) => records.push(value),
            Related::One(ref mut current) => *current = Some(value),
        }
        self.set_related(record, relationship, slot);
    }
}
