//! Attribute filters for `except` and `only`

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CloneError, CloneResult};

/// An entry of an attribute filter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEntry {
    /// Attribute of the record at the current level
    Attribute(String),
    /// Filter handed down to the records of a relationship
    Nested(String, AttributeFilter),
}

/// List of attribute names plus per-relationship nested filters
///
/// Deserializes from the same JSON shapes `from_json` accepts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct AttributeFilter {
    entries: Vec<FilterEntry>,
}

/// An attribute filter split by level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitFilter {
    /// Attribute names applying to the current record
    pub local: Vec<String>,
    /// Filters for related records, by relationship name
    pub nested: HashMap<String, AttributeFilter>,
}

impl AttributeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute of the current record
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.entries.push(FilterEntry::Attribute(name.into()));
        self
    }

    /// Add a filter for the records of `relationship`
    pub fn nested(mut self, relationship: impl Into<String>, filter: impl Into<AttributeFilter>) -> Self {
        self.entries
            .push(FilterEntry::Nested(relationship.into(), filter.into()));
        self
    }

    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse `"name"`, `["name", {"parrot": ["name"]}]` style JSON
    pub fn from_json(value: &Value) -> CloneResult<Self> {
        let mut filter = Self::new();
        filter.extend_from_json(value)?;
        Ok(filter)
    }

    fn extend_from_json(&mut self, value: &Value) -> CloneResult<()> {
        match value {
            Value::Null => {}
            Value::String(name) => self.entries.push(FilterEntry::Attribute(name.clone())),
            Value::Array(items) => {
                for item in items {
                    self.extend_from_json(item)?;
                }
            }
            Value::Object(map) => {
                for (relationship, nested) in map {
                    if nested.is_null() {
                        continue;
                    }
                    self.entries.push(FilterEntry::Nested(
                        relationship.clone(),
                        Self::from_json(nested)?,
                    ));
                }
            }
            other => {
                return Err(CloneError::InvalidOptions(format!(
                    "Unsupported attribute filter value: {}",
                    other
                )))
            }
        }
        Ok(())
    }

    /// Separate names for this level from filters for child relationships
    ///
    /// When the same relationship appears more than once the last filter wins.
    pub fn split(&self) -> SplitFilter {
        let mut split = SplitFilter::default();
        for entry in &self.entries {
            match entry {
                FilterEntry::Attribute(name) => split.local.push(name.clone()),
                FilterEntry::Nested(relationship, filter) => {
                    split.nested.insert(relationship.clone(), filter.clone());
                }
            }
        }
        split
    }
}

impl SplitFilter {
    /// Filter for the records of `relationship`, if one was given
    pub fn nested_for(&self, relationship: &str) -> Option<AttributeFilter> {
        self.nested.get(relationship).cloned()
    }
}

impl TryFrom<Value> for AttributeFilter {
    type Error = CloneError;

    fn try_from(value: Value) -> CloneResult<Self> {
        Self::from_json(&value)
    }
}

impl From<&str> for AttributeFilter {
    fn from(name: &str) -> Self {
        Self::new().attribute(name)
    }
}

impl From<Vec<&str>> for AttributeFilter {
    fn from(names: Vec<&str>) -> Self {
        names
            .into_iter()
            .fold(Self::new(), |filter, name| filter.attribute(name))
    }
}

impl<const N: usize> From<[&str; N]> for AttributeFilter {
    fn from(names: [&str; N]) -> Self {
        Self::from(names.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_local_and_nested() {
        let filter = AttributeFilter::new()
            .attribute("name")
            .nested("parrot", ["name"]);
        let split = filter.split();

        assert_eq!(split.local, vec!["name"]);
        assert_eq!(split.nested_for("parrot"), Some(AttributeFilter::from("name")));
        assert_eq!(split.nested_for("mateys"), None);
    }

    #[test]
    fn test_later_nested_filter_wins() {
        let filter = AttributeFilter::new()
            .nested("parrot", "name")
            .nested("parrot", "age");
        assert_eq!(filter.split().nested_for("parrot"), Some(AttributeFilter::from("age")));
    }

    #[test]
    fn test_from_json() {
        let filter = AttributeFilter::from_json(&json!(["name", { "parrot": ["name"], "mateys": "name" }])).unwrap();
        let split = filter.split();

        assert_eq!(split.local, vec!["name"]);
        assert_eq!(split.nested.len(), 2);
        assert_eq!(split.nested_for("mateys"), Some(AttributeFilter::from("name")));

        let single = AttributeFilter::from_json(&json!("nick_name")).unwrap();
        assert_eq!(single, AttributeFilter::from("nick_name"));
    }

    #[test]
    fn test_null_nested_value_adds_no_child_filter() {
        let filter = AttributeFilter::from_json(&json!(["name", { "parrot": null }])).unwrap();
        let split = filter.split();

        assert_eq!(split.local, vec!["name"]);
        assert_eq!(split.nested_for("parrot"), None);
    }

    #[test]
    fn test_deserialize_rejects_scalars() {
        let parsed: Result<AttributeFilter, _> = serde_json::from_value(json!(["name", 3]));
        assert!(parsed.is_err());

        let parsed: AttributeFilter = serde_json::from_value(json!(["name", "age"])).unwrap();
        assert_eq!(parsed, AttributeFilter::from(vec!["name", "age"]));
    }
}
