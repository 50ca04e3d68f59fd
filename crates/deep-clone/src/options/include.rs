//! Include specs and their normalization
//!
//! Callers describe which relationships to follow with a nested structure:
//! a bare name, a list, or an ordered map from relationship name to a
//! nested spec, a condition, or a list mixing both. Normalization turns one
//! level of that structure into an ordered list of [`IncludeEntry`] values.
//! Order is kept exactly as given because dictionary-based deduplication
//! depends on which path reaches a shared record first.

use std::fmt;

use serde_json::Value;

use super::condition::Condition;
use crate::error::{CloneError, CloneResult};
use crate::store::AttributeStore;

/// Nested description of the relationships to copy
pub enum IncludeSpec<S: AttributeStore> {
    /// A single relationship name
    Name(String),
    /// Several specs, processed in order
    List(Vec<IncludeSpec<S>>),
    /// Relationship name to nested spec, in insertion order
    Map(Vec<(String, IncludeSpec<S>)>),
    /// Filter for the enclosing relationship
    Condition(Condition<S>),
}

/// One normalized relationship to follow at the current level
pub struct IncludeEntry<S: AttributeStore> {
    /// Relationship name on the current model
    pub relationship: String,
    /// Include spec handed to the related records, if any
    pub nested: Option<IncludeSpec<S>>,
    /// Filter applied to each related record
    pub condition: Condition<S>,
}

impl<S: AttributeStore> IncludeSpec<S> {
    pub fn name(name: impl Into<String>) -> Self {
        IncludeSpec::Name(name.into())
    }

    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<IncludeSpec<S>>,
    {
        IncludeSpec::List(items.into_iter().map(Into::into).collect())
    }

    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<IncludeSpec<S>>,
    {
        IncludeSpec::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Follow `relationship` only for records accepted by `condition`
    pub fn conditional(relationship: impl Into<String>, condition: Condition<S>) -> Self {
        IncludeSpec::Map(vec![(relationship.into(), IncludeSpec::Condition(condition))])
    }

    /// Follow `relationship` with a nested spec, filtered by `condition`
    pub fn nested_conditional(
        relationship: impl Into<String>,
        nested: impl Into<IncludeSpec<S>>,
        condition: Condition<S>,
    ) -> Self {
        IncludeSpec::Map(vec![(
            relationship.into(),
            IncludeSpec::List(vec![nested.into(), IncludeSpec::Condition(condition)]),
        )])
    }

    /// Parse the structural part of a spec from JSON
    ///
    /// Strings become names, arrays lists and objects ordered maps. Conditions
    /// are code and cannot be expressed in JSON.
    pub fn from_json(value: &Value) -> CloneResult<Self> {
        match value {
            Value::Null => Ok(IncludeSpec::List(Vec::new())),
            Value::String(name) => Ok(IncludeSpec::Name(name.clone())),
            Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<CloneResult<Vec<_>>>()
                .map(IncludeSpec::List),
            Value::Object(map) => {
                if let Some(key) = map.keys().find(|key| *key == "if" || *key == "unless") {
                    return Err(CloneError::InvalidOptions(format!(
                        "'{}' conditions must be supplied as predicates, not JSON",
                        key
                    )));
                }
                map.iter()
                    .map(|(key, value)| Ok::<_, CloneError>((key.clone(), Self::from_json(value)?)))
                    .collect::<CloneResult<Vec<_>>>()
                    .map(IncludeSpec::Map)
            }
            other => Err(CloneError::InvalidOptions(format!(
                "Unsupported include value: {}",
                other
            ))),
        }
    }

    /// Normalize this level into ordered entries
    pub fn normalize(&self) -> CloneResult<Vec<IncludeEntry<S>>> {
        let mut entries = Vec::new();
        self.collect_entries(&mut entries)?;
        Ok(entries)
    }

    /// Normalize every level, surfacing shape errors before any copying starts
    pub fn validate(&self) -> CloneResult<()> {
        for entry in self.normalize()? {
            if let Some(ref nested) = entry.nested {
                nested.validate()?;
            }
        }
        Ok(())
    }

    fn collect_entries(&self, entries: &mut Vec<IncludeEntry<S>>) -> CloneResult<()> {
        match self {
            IncludeSpec::Name(name) => entries.push(IncludeEntry::from_value(name, None)?),
            IncludeSpec::List(items) => {
                for item in items {
                    item.collect_entries(entries)?;
                }
            }
            // Multi-key maps are split so each relationship is processed on its own
            IncludeSpec::Map(pairs) => {
                for (name, value) in pairs {
                    entries.push(IncludeEntry::from_value(name, Some(value))?);
                }
            }
            IncludeSpec::Condition(_) => {
                return Err(CloneError::InvalidOptions(
                    "A condition must be attached to a relationship".to_string(),
                ))
            }
        }
        Ok(())
    }
}

impl<S: AttributeStore> IncludeEntry<S> {
    /// Build an entry for `relationship` from the value it maps to
    fn from_value(relationship: &str, value: Option<&IncludeSpec<S>>) -> CloneResult<Self> {
        if relationship.is_empty() {
            return Err(CloneError::InvalidOptions(
                "Relationship names cannot be empty".to_string(),
            ));
        }

        let mut condition = Condition::new();
        let nested = match value {
            None => None,
            Some(IncludeSpec::Condition(found)) => {
                condition.merge(found);
                None
            }
            Some(IncludeSpec::List(items)) => {
                let mut rest = Vec::new();
                for item in items {
                    match item {
                        IncludeSpec::Condition(found) => condition.merge(found),
                        other => rest.push(other.clone()),
                    }
                }
                if rest.is_empty() {
                    None
                } else {
                    Some(IncludeSpec::List(rest))
                }
            }
            Some(IncludeSpec::Map(pairs)) if pairs.is_empty() => None,
            Some(other) => Some(other.clone()),
        };

        Ok(Self {
            relationship: relationship.to_string(),
            nested,
            condition,
        })
    }
}

impl<S: AttributeStore> Clone for IncludeSpec<S> {
    fn clone(&self) -> Self {
        match self {
            IncludeSpec::Name(name) => IncludeSpec::Name(name.clone()),
            IncludeSpec::List(items) => IncludeSpec::List(items.clone()),
            IncludeSpec::Map(pairs) => IncludeSpec::Map(pairs.clone()),
            IncludeSpec::Condition(condition) => IncludeSpec::Condition(condition.clone()),
        }
    }
}

impl<S: AttributeStore> fmt::Debug for IncludeSpec<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncludeSpec::Name(name) => f.debug_tuple("Name").field(name).finish(),
            IncludeSpec::List(items) => f.debug_tuple("List").field(items).finish(),
            IncludeSpec::Map(pairs) => f.debug_tuple("Map").field(pairs).finish(),
            IncludeSpec::Condition(condition) => f.debug_tuple("Condition").field(condition).finish(),
        }
    }
}

impl<S: AttributeStore> fmt::Debug for IncludeEntry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncludeEntry")
            .field("relationship", &self.relationship)
            .field("nested", &self.nested)
            .field("condition", &self.condition)
            .finish()
    }
}

impl<S: AttributeStore> From<&str> for IncludeSpec<S> {
    fn from(name: &str) -> Self {
        IncludeSpec::Name(name.to_string())
    }
}

impl<S: AttributeStore> From<String> for IncludeSpec<S> {
    fn from(name: String) -> Self {
        IncludeSpec::Name(name)
    }
}

impl<S: AttributeStore> From<Condition<S>> for IncludeSpec<S> {
    fn from(condition: Condition<S>) -> Self {
        IncludeSpec::Condition(condition)
    }
}

impl<S: AttributeStore, T: Into<IncludeSpec<S>>> From<Vec<T>> for IncludeSpec<S> {
    fn from(items: Vec<T>) -> Self {
        IncludeSpec::list(items)
    }
}
