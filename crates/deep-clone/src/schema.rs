//! Model schema: column defaults plus the relationship registry
//!
//! The clone engine resets excluded attributes to their column default, so
//! every model the graph can reach needs its columns declared here. Schemas
//! are either built in code or loaded from a JSON document:
//!
//! ```json
//! { "models": [
//!     { "name": "Pirate",
//!       "columns": [ { "name": "name" }, { "name": "nick_name", "default": "no nickname" } ],
//!       "relationships": [
//!         { "type": "has_many", "name": "mateys", "related_model": "Matey",
//!           "foreign_key": { "columns": ["pirate_id"] } } ] } ] }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CloneError, CloneResult};
use crate::relationships::{RelationshipMetadata, RelationshipRegistry, RelationshipResolver};

fn default_primary_key() -> String {
    "id".to_string()
}

/// A column and its default value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(default)]
    pub default: Value,
}

impl ColumnDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            default: Value::Null,
        }
    }

    pub fn with_default(name: &str, default: Value) -> Self {
        Self {
            name: name.to_string(),
            default,
        }
    }
}

/// Column layout of one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub name: String,
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
}

impl ModelSchema {
    /// Create a model schema with an `id` primary key and no other columns
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            primary_key: default_primary_key(),
            columns: Vec::new(),
        }
    }

    /// Set the primary key column name
    pub fn with_primary_key(mut self, primary_key: &str) -> Self {
        self.primary_key = primary_key.to_string();
        self
    }

    /// Add a column defaulting to null
    pub fn column(mut self, name: &str) -> Self {
        self.columns.push(ColumnDefinition::new(name));
        self
    }

    /// Add a column with an explicit default
    pub fn column_with_default(mut self, name: &str, default: Value) -> Self {
        self.columns.push(ColumnDefinition::with_default(name, default));
        self
    }

    /// All attribute names, primary key first
    pub fn attribute_names(&self) -> Vec<String> {
        std::iter::once(self.primary_key.clone())
            .chain(self.columns.iter().map(|c| c.name.clone()))
            .collect()
    }

    /// Default value for a column; unknown columns and the primary key default to null
    pub fn default_value(&self, attribute: &str) -> Value {
        self.columns
            .iter()
            .find(|c| c.name == attribute)
            .map(|c| c.default.clone())
            .unwrap_or(Value::Null)
    }

    fn validate(&self) -> CloneResult<()> {
        if self.name.is_empty() || self.primary_key.is_empty() {
            return Err(CloneError::Schema(
                "Model name and primary key cannot be empty".to_string(),
            ));
        }

        let mut seen = vec![self.primary_key.as_str()];
        for column in &self.columns {
            if column.name.is_empty() || seen.contains(&column.name.as_str()) {
                return Err(CloneError::Schema(format!(
                    "Model '{}' declares column '{}' more than once or with an empty name",
                    self.name, column.name
                )));
            }
            seen.push(&column.name);
        }

        Ok(())
    }
}

/// Serialized form of a whole schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub models: Vec<ModelDefinition>,
}

/// Serialized form of one model and its relationships
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDefinition {
    #[serde(flatten)]
    pub schema: ModelSchema,
    #[serde(default)]
    pub relationships: Vec<RelationshipMetadata>,
}

/// Model columns and relationships for every model a clone can reach
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    models: HashMap<String, ModelSchema>,
    relationships: RelationshipRegistry,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a parsed definition, validating cross references
    pub fn from_definition(definition: SchemaDefinition) -> CloneResult<Self> {
        let mut registry = Self::new();
        for model in definition.models {
            let name = model.schema.name.clone();
            registry.register_model(model.schema)?;
            for relationship in model.relationships {
                registry.register_relationship(&name, relationship)?;
            }
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Parse a JSON schema document
    pub fn from_json(json: &str) -> CloneResult<Self> {
        let definition: SchemaDefinition = serde_json::from_str(json)?;
        Self::from_definition(definition)
    }

    /// Register a model's columns
    pub fn register_model(&mut self, schema: ModelSchema) -> CloneResult<()> {
        schema.validate()?;
        if self.models.contains_key(&schema.name) {
            return Err(CloneError::Schema(format!(
                "Model '{}' is already registered",
                schema.name
            )));
        }
        self.models.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Register a relationship declared on `model_name`
    pub fn register_relationship(&mut self, model_name: &str, metadata: RelationshipMetadata) -> CloneResult<()> {
        self.relationships.register(model_name, metadata)
    }

    /// Builder-style registration for fixtures and setup code
    pub fn with_model(mut self, schema: ModelSchema) -> CloneResult<Self> {
        self.register_model(schema)?;
        Ok(self)
    }

    /// Builder-style relationship registration
    pub fn with_relationship(mut self, model_name: &str, metadata: RelationshipMetadata) -> CloneResult<Self> {
        self.register_relationship(model_name, metadata)?;
        Ok(self)
    }

    /// Look up a model's column layout
    pub fn model(&self, model_name: &str) -> Option<&ModelSchema> {
        self.models.get(model_name)
    }

    /// Column default for `attribute` on `model_name`, null when unknown
    pub fn default_value(&self, model_name: &str, attribute: &str) -> Value {
        self.model(model_name)
            .map(|model| model.default_value(attribute))
            .unwrap_or(Value::Null)
    }

    /// The relationship registry backing this schema
    pub fn relationships(&self) -> &RelationshipRegistry {
        &self.relationships
    }

    /// Check that every relationship targets a registered model
    pub fn validate(&self) -> CloneResult<()> {
        for model_name in self.models.keys() {
            for relationship in self.relationships.for_model(model_name) {
                if !self.models.contains_key(&relationship.related_model) {
                    return Err(CloneError::Schema(format!(
                        "Relationship '{}#{}' targets unknown model '{}'",
                        model_name, relationship.name, relationship.related_model
                    )));
                }
                if let Some(ref through) = relationship.through {
                    if !self.relationships.has_relationship(model_name, through) {
                        return Err(CloneError::Schema(format!(
                            "Relationship '{}#{}' goes through undeclared relationship '{}'",
                            model_name, relationship.name, through
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

impl RelationshipResolver for SchemaRegistry {
    fn describe_relationship(&self, model_name: &str, relationship_name: &str) -> Option<RelationshipMetadata> {
        self.relationships.describe_relationship(model_name, relationship_name)
    }
}
