//! Deduplication dictionary: original record identity -> produced copy
//!
//! One dictionary lives for one top-level clone unless the caller owns it,
//! in which case it can be seeded beforehand and reused across calls.

use std::collections::HashMap;
use std::hash::Hash;

use crate::store::{AttributeStore, RecordIdentity};

/// Copies already produced, by model name and original identity
#[derive(Debug, Clone)]
pub struct CloneDictionary<H: Eq + Hash> {
    entries: HashMap<String, HashMap<RecordIdentity<H>, H>>,
}

impl<H: Copy + Eq + Hash> CloneDictionary<H> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Copy registered for an original, if any
    pub fn get(&self, model_name: &str, identity: &RecordIdentity<H>) -> Option<H> {
        self.entries.get(model_name)?.get(identity).copied()
    }

    /// Register `copy` for an original, returning the copy it replaces
    pub fn insert(&mut self, model_name: &str, identity: RecordIdentity<H>, copy: H) -> Option<H> {
        self.entries
            .entry(model_name.to_string())
            .or_default()
            .insert(identity, copy)
    }

    pub fn contains(&self, model_name: &str, identity: &RecordIdentity<H>) -> bool {
        self.get(model_name, identity).is_some()
    }

    /// Register `copy` for `original`, reading model and identity from the store
    pub fn seed<S>(&mut self, store: &S, original: H, copy: H) -> Option<H>
    where
        S: AttributeStore<Record = H>,
    {
        let model_name = store.model_name(original);
        self.insert(&model_name, store.identity(original), copy)
    }

    /// Copy registered for `original`, reading model and identity from the store
    pub fn lookup<S>(&self, store: &S, original: H) -> Option<H>
    where
        S: AttributeStore<Record = H>,
    {
        self.get(&store.model_name(original), &store.identity(original))
    }

    /// All copies of one model
    pub fn copies_of(&self, model_name: &str) -> Vec<H> {
        self.entries
            .get(model_name)
            .map(|copies| copies.values().copied().collect())
            .unwrap_or_default()
    }

    /// Total number of copies across models
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H: Copy + Eq + Hash> Default for CloneDictionary<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::schema::{ModelSchema, SchemaRegistry};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_insert_and_get_by_identity() {
        let mut dictionary: CloneDictionary<u32> = CloneDictionary::new();
        assert!(dictionary.is_empty());

        dictionary.insert("Matey", RecordIdentity::Persisted("1".to_string()), 10);
        dictionary.insert("Matey", RecordIdentity::Transient(4), 11);

        assert_eq!(dictionary.get("Matey", &RecordIdentity::Persisted("1".to_string())), Some(10));
        assert_eq!(dictionary.get("Matey", &RecordIdentity::Transient(4)), Some(11));
        assert!(!dictionary.contains("Pirate", &RecordIdentity::Persisted("1".to_string())));
        assert_eq!(dictionary.len(), 2);

        let mut copies = dictionary.copies_of("Matey");
        copies.sort();
        assert_eq!(copies, vec![10, 11]);
    }

    #[test]
    fn test_seed_and_lookup_through_store() {
        let schema = SchemaRegistry::new()
            .with_model(ModelSchema::new("Matey").column("name"))
            .unwrap();
        let mut store = MemoryStore::new(Arc::new(schema));
        let john = store.create("Matey", json!({ "name": "John" })).unwrap();
        let copy = store.duplicate(john);

        let mut dictionary = CloneDictionary::new();
        assert_eq!(dictionary.seed(&store, john, copy), None);
        assert_eq!(dictionary.lookup(&store, john), Some(copy));
        assert_eq!(dictionary.lookup(&store, copy), None);
    }
}
