//! Relationship Metadata - Descriptors consumed by the clone engine

use serde::{Deserialize, Serialize};

use crate::error::{CloneError, CloneResult};

/// Defines the type of relationship between models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    /// Many-to-one relationship (belongsTo), the foreign key lives on this model
    BelongsTo,
    /// One-to-one relationship (hasOne), the foreign key lives on the related model
    HasOne,
    /// One-to-many relationship (hasMany)
    HasMany,
    /// Many-to-many relationship through a pivot table
    ManyToMany,
    /// Many-to-many relationship through intermediate join records
    HasManyThrough,
    /// One-to-one relationship through an intermediate join record
    HasOneThrough,
}

impl RelationshipType {
    /// Returns true if this relationship returns a collection
    pub fn is_collection(self) -> bool {
        matches!(self, Self::HasMany | Self::ManyToMany | Self::HasManyThrough)
    }

    /// Returns true if related records are shared rather than owned by the parent
    pub fn is_joined(self) -> bool {
        matches!(self, Self::ManyToMany | Self::HasManyThrough | Self::HasOneThrough)
    }

    /// Returns true if this relationship is declared through another relationship
    pub fn is_through(self) -> bool {
        matches!(self, Self::HasManyThrough | Self::HasOneThrough)
    }
}

/// Descriptor for a named relationship on a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipMetadata {
    /// The type of relationship
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,

    /// Name of the relationship (field name in the model)
    pub name: String,

    /// The related model's type name
    pub related_model: String,

    /// Foreign key configuration
    pub foreign_key: ForeignKeyConfig,

    /// Pivot table configuration for joined relationships
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot_config: Option<PivotConfig>,

    /// Name of the intermediate relationship for through relationships
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,

    /// Inverse relationship name on the related model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse: Option<String>,
}

impl RelationshipMetadata {
    /// Create a new RelationshipMetadata instance
    pub fn new(
        relationship_type: RelationshipType,
        name: impl Into<String>,
        related_model: impl Into<String>,
        foreign_key: ForeignKeyConfig,
    ) -> Self {
        Self {
            relationship_type,
            name: name.into(),
            related_model: related_model.into(),
            foreign_key,
            pivot_config: None,
            through: None,
            inverse: None,
        }
    }

    /// Shorthand for a belongs-to relationship keyed by `column` on this model
    pub fn belongs_to(name: impl Into<String>, related_model: impl Into<String>, column: &str) -> Self {
        Self::new(
            RelationshipType::BelongsTo,
            name,
            related_model,
            ForeignKeyConfig::simple(column),
        )
    }

    /// Shorthand for a has-one relationship keyed by `column` on the related model
    pub fn has_one(name: impl Into<String>, related_model: impl Into<String>, column: &str) -> Self {
        Self::new(
            RelationshipType::HasOne,
            name,
            related_model,
            ForeignKeyConfig::simple(column),
        )
    }

    /// Shorthand for a has-many relationship keyed by `column` on the related model
    pub fn has_many(name: impl Into<String>, related_model: impl Into<String>, column: &str) -> Self {
        Self::new(
            RelationshipType::HasMany,
            name,
            related_model,
            ForeignKeyConfig::simple(column),
        )
    }

    /// Shorthand for a many-to-many relationship over a pivot table
    pub fn many_to_many(
        name: impl Into<String>,
        related_model: impl Into<String>,
        pivot: PivotConfig,
    ) -> Self {
        let foreign_key = ForeignKeyConfig::simple(&pivot.local_key);
        Self::new(RelationshipType::ManyToMany, name, related_model, foreign_key).with_pivot(pivot)
    }

    /// Shorthand for a has-many-through relationship over join records
    pub fn has_many_through(
        name: impl Into<String>,
        related_model: impl Into<String>,
        through: impl Into<String>,
        pivot: PivotConfig,
    ) -> Self {
        let foreign_key = ForeignKeyConfig::simple(&pivot.local_key);
        Self::new(RelationshipType::HasManyThrough, name, related_model, foreign_key)
            .with_pivot(pivot)
            .with_through(through)
    }

    /// Shorthand for a has-one-through relationship over a join record
    pub fn has_one_through(
        name: impl Into<String>,
        related_model: impl Into<String>,
        through: impl Into<String>,
        pivot: PivotConfig,
    ) -> Self {
        let foreign_key = ForeignKeyConfig::simple(&pivot.local_key);
        Self::new(RelationshipType::HasOneThrough, name, related_model, foreign_key)
            .with_pivot(pivot)
            .with_through(through)
    }

    /// Set pivot table configuration
    pub fn with_pivot(mut self, pivot_config: PivotConfig) -> Self {
        self.pivot_config = Some(pivot_config);
        self
    }

    /// Set the intermediate relationship name
    pub fn with_through(mut self, through: impl Into<String>) -> Self {
        self.through = Some(through.into());
        self
    }

    /// Set the inverse relationship name
    pub fn with_inverse(mut self, inverse: impl Into<String>) -> Self {
        self.inverse = Some(inverse.into());
        self
    }

    /// Validate the relationship metadata for consistency
    pub fn validate(&self) -> CloneResult<()> {
        if self.name.is_empty() {
            return Err(CloneError::Schema(
                "Relationship name cannot be empty".to_string(),
            ));
        }

        if self.related_model.is_empty() {
            return Err(CloneError::Schema(format!(
                "Relationship '{}' must name a related model",
                self.name
            )));
        }

        if self.relationship_type.is_joined() && self.pivot_config.is_none() {
            return Err(CloneError::Schema(format!(
                "Relationship '{}' of type {:?} requires pivot configuration",
                self.name, self.relationship_type
            )));
        }

        if self.relationship_type.is_through() && self.through.is_none() {
            return Err(CloneError::Schema(format!(
                "Relationship '{}' of type {:?} requires a through relationship",
                self.name, self.relationship_type
            )));
        }

        self.foreign_key.validate()?;

        if let Some(ref pivot) = self.pivot_config {
            pivot.validate()?;
        }

        Ok(())
    }
}

/// Foreign key configuration for relationships
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyConfig {
    /// The foreign key column name(s)
    pub columns: Vec<String>,
}

impl ForeignKeyConfig {
    /// Create a simple foreign key configuration
    pub fn simple(column: &str) -> Self {
        Self {
            columns: vec![column.to_string()],
        }
    }

    /// Create a composite foreign key configuration
    pub fn composite(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Whether this is a composite foreign key
    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }

    /// Get the primary foreign key column (first in composite keys)
    pub fn primary_column(&self) -> &str {
        self.columns.first().map(|s| s.as_str()).unwrap_or("")
    }

    /// Validate the foreign key configuration
    pub fn validate(&self) -> CloneResult<()> {
        if self.columns.is_empty() || self.columns.iter().any(|c| c.is_empty()) {
            return Err(CloneError::Schema(
                "Foreign key configuration must have at least one non-empty column".to_string(),
            ));
        }

        Ok(())
    }
}

/// Pivot configuration for joined relationships
///
/// For through relationships `table` names the join model's table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotConfig {
    /// The pivot table name
    pub table: String,

    /// The foreign key column for the local model in the pivot table
    pub local_key: String,

    /// The foreign key column for the related model in the pivot table
    pub foreign_key: String,
}

impl PivotConfig {
    /// Create a new pivot configuration
    pub fn new(table: &str, local_key: &str, foreign_key: &str) -> Self {
        Self {
            table: table.to_string(),
            local_key: local_key.to_string(),
            foreign_key: foreign_key.to_string(),
        }
    }

    /// True when `other` describes the same pivot seen from the related side
    pub fn mirrors(&self, other: &PivotConfig) -> bool {
        self.table == other.table
            && self.local_key == other.foreign_key
            && self.foreign_key == other.local_key
    }

    /// Validate the pivot configuration
    pub fn validate(&self) -> CloneResult<()> {
        if self.table.is_empty() {
            return Err(CloneError::Schema(
                "Pivot table name cannot be empty".to_string(),
            ));
        }

        if self.local_key.is_empty() || self.foreign_key.is_empty() {
            return Err(CloneError::Schema(
                "Pivot keys cannot be empty".to_string(),
            ));
        }

        if self.local_key == self.foreign_key {
            return Err(CloneError::Schema(
                "Pivot local key and foreign key must be different".to_string(),
            ));
        }

        Ok(())
    }
}
