//! Relationship Registry - Runtime metadata storage and lookup

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use super::metadata::{RelationshipMetadata, RelationshipType};
use super::resolver::RelationshipResolver;
use crate::error::{CloneError, CloneResult};

/// Thread-safe relationship registry, built once from the host schema
#[derive(Debug, Clone, Default)]
pub struct RelationshipRegistry {
    /// Map of model name -> relationship name -> metadata
    relationships: Arc<DashMap<String, HashMap<String, RelationshipMetadata>>>,
}

impl RelationshipRegistry {
    /// Create a new empty relationship registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a relationship for a model
    pub fn register(&self, model_name: &str, metadata: RelationshipMetadata) -> CloneResult<()> {
        metadata.validate().map_err(|e| {
            CloneError::Schema(format!(
                "Validation failed for relationship '{}' in model '{}': {}",
                metadata.name, model_name, e
            ))
        })?;

        self.relationships
            .entry(model_name.to_string())
            .or_default()
            .insert(metadata.name.clone(), metadata);

        Ok(())
    }

    /// Get relationship metadata by model and relationship name, as declared
    pub fn get(&self, model_name: &str, relationship_name: &str) -> Option<RelationshipMetadata> {
        self.relationships
            .get(model_name)?
            .get(relationship_name)
            .cloned()
    }

    /// Check if a relationship exists
    pub fn has_relationship(&self, model_name: &str, relationship_name: &str) -> bool {
        self.relationships
            .get(model_name)
            .map(|relationships| relationships.contains_key(relationship_name))
            .unwrap_or(false)
    }

    /// Get all relationship names for a model, sorted
    pub fn relationship_names(&self, model_name: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .relationships
            .get(model_name)
            .map(|relationships| relationships.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Get all relationships declared on a model
    pub fn for_model(&self, model_name: &str) -> Vec<RelationshipMetadata> {
        self.relationships
            .get(model_name)
            .map(|relationships| relationships.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of models with at least one registered relationship
    pub fn model_count(&self) -> usize {
        self.relationships.len()
    }

    /// Clear all registered relationships
    pub fn clear(&self) {
        self.relationships.clear();
    }

    /// Find the relationship on the related model that points back along `metadata`
    ///
    /// An explicitly declared inverse wins. Otherwise the related model is
    /// searched for a relationship of the mirrored kind sharing the same keys.
    pub fn find_inverse(&self, model_name: &str, metadata: &RelationshipMetadata) -> Option<String> {
        if let Some(ref inverse) = metadata.inverse {
            return Some(inverse.clone());
        }

        let related = self.relationships.get(&metadata.related_model)?;
        let mut candidates: Vec<&RelationshipMetadata> = related
            .values()
            .filter(|candidate| {
                !(metadata.related_model == model_name && candidate.name == metadata.name)
            })
            .filter(|candidate| is_inverse_relationship(model_name, metadata, candidate))
            .collect();

        // HashMap iteration order is arbitrary, keep the pick stable
        candidates.sort_by(|a, b| a.name.cmp(&b.name));
        candidates.first().map(|candidate| candidate.name.clone())
    }
}

impl RelationshipResolver for RelationshipRegistry {
    fn describe_relationship(&self, model_name: &str, relationship_name: &str) -> Option<RelationshipMetadata> {
        let mut metadata = self.get(model_name, relationship_name)?;
        metadata.inverse = self.find_inverse(model_name, &metadata);
        Some(metadata)
    }
}

/// Check if `candidate` (declared on the related model) mirrors `source` (declared on `model_name`)
fn is_inverse_relationship(
    model_name: &str,
    source: &RelationshipMetadata,
    candidate: &RelationshipMetadata,
) -> bool {
    if candidate.related_model != model_name {
        return false;
    }

    match (source.relationship_type, candidate.relationship_type) {
        (RelationshipType::HasOne, RelationshipType::BelongsTo)
        | (RelationshipType::HasMany, RelationshipType::BelongsTo)
        | (RelationshipType::BelongsTo, RelationshipType::HasOne)
        | (RelationshipType::BelongsTo, RelationshipType::HasMany) => {
            source.foreign_key.primary_column() == candidate.foreign_key.primary_column()
        }
        (RelationshipType::ManyToMany, RelationshipType::ManyToMany)
        | (
            RelationshipType::HasManyThrough | RelationshipType::HasOneThrough,
            RelationshipType::HasManyThrough | RelationshipType::HasOneThrough,
        ) => match (&source.pivot_config, &candidate.pivot_config) {
            (Some(pivot), Some(other)) => pivot.mirrors(other),
            _ => false,
        },
        _ => false,
    }
}
