//! Metadata resolver seam between the clone engine and the host schema

use super::metadata::RelationshipMetadata;

/// Looks up relationship descriptors by model and relationship name
///
/// Implementations return the descriptor with `inverse` filled in whenever
/// a matching relationship exists on the related model.
pub trait RelationshipResolver {
    /// Describe `relationship_name` on `model_name`, or `None` when it is not declared
    fn describe_relationship(&self, model_name: &str, relationship_name: &str) -> Option<RelationshipMetadata>;
}

impl<T: RelationshipResolver + ?Sized> RelationshipResolver for &T {
    fn describe_relationship(&self, model_name: &str, relationship_name: &str) -> Option<RelationshipMetadata> {
        (**self).describe_relationship(model_name, relationship_name)
    }
}
