//! Error types for the deep clone system
//!
//! Covers relationship lookups during traversal, malformed clone options
//! and invalid schema definitions.

use thiserror::Error;

/// Result type alias for clone operations
pub type CloneResult<T> = Result<T, CloneError>;

/// Error types for clone operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CloneError {
    /// A requested relationship does not exist on the model
    #[error("Association not found: {model}#{relationship}")]
    AssociationNotFound {
        model: String,
        relationship: String,
    },

    /// The include/except/only options have an unsupported shape
    #[error("Invalid clone options: {0}")]
    InvalidOptions(String),

    /// Relationship or model definition is inconsistent
    #[error("Schema error: {0}")]
    Schema(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CloneError {
    /// Build an `AssociationNotFound` error for a model/relationship pair
    pub fn association_not_found(model: &str, relationship: &str) -> Self {
        CloneError::AssociationNotFound {
            model: model.to_string(),
            relationship: relationship.to_string(),
        }
    }

    /// Returns true if this error was raised for an unknown relationship
    pub fn is_association_not_found(&self) -> bool {
        matches!(self, CloneError::AssociationNotFound { .. })
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for CloneError {
    fn from(err: serde_json::Error) -> Self {
        CloneError::Serialization(err.to_string())
    }
}
