//! Options controlling one deep clone

pub mod attributes;
pub mod condition;
pub mod include;

pub use attributes::*;
pub use condition::*;
pub use include::*;

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::config::CloneConfig;
use crate::error::CloneResult;
use crate::hooks::CloneHooks;
use crate::store::AttributeStore;

/// Options for a top-level clone
///
/// ```ignore
/// let options = CloneOptions::new()
///     .include(IncludeSpec::map(vec![("treasures", "gold_pieces")]))
///     .except(AttributeFilter::new().attribute("name").nested("mateys", "name"))
///     .use_dictionary(true);
/// ```
pub struct CloneOptions<S: AttributeStore> {
    pub(crate) include: Option<IncludeSpec<S>>,
    pub(crate) except: Option<AttributeFilter>,
    pub(crate) only: Option<AttributeFilter>,
    pub(crate) use_dictionary: bool,
    pub(crate) skip_missing_associations: bool,
    pub(crate) validate: bool,
    pub(crate) hooks: CloneHooks<S>,
}

impl<S: AttributeStore> CloneOptions<S> {
    pub fn new() -> Self {
        Self {
            include: None,
            except: None,
            only: None,
            use_dictionary: false,
            skip_missing_associations: false,
            validate: true,
            hooks: CloneHooks::new(),
        }
    }

    /// Start from environment-provided defaults
    pub fn from_config(config: &CloneConfig) -> Self {
        Self::new()
            .use_dictionary(config.use_dictionary)
            .skip_missing_associations(config.skip_missing_associations)
            .validate(config.validate)
    }

    /// Relationships to follow
    pub fn include(mut self, include: impl Into<IncludeSpec<S>>) -> Self {
        self.include = Some(include.into());
        self
    }

    /// Relationships to follow, given as JSON
    pub fn include_json(self, include: &Value) -> CloneResult<Self> {
        Ok(self.include(IncludeSpec::from_json(include)?))
    }

    /// Attributes reset to their column defaults on the copies
    pub fn except(mut self, filter: impl Into<AttributeFilter>) -> Self {
        self.except = Some(filter.into());
        self
    }

    /// The only attributes carried over; everything else is reset
    pub fn only(mut self, filter: impl Into<AttributeFilter>) -> Self {
        self.only = Some(filter.into());
        self
    }

    pub fn use_dictionary(mut self, enabled: bool) -> Self {
        self.use_dictionary = enabled;
        self
    }

    pub fn skip_missing_associations(mut self, enabled: bool) -> Self {
        self.skip_missing_associations = enabled;
        self
    }

    pub fn validate(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }

    /// Run right after each copy is created, before filters and relationships
    pub fn preprocessor<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut S, S::Record, S::Record) + 'static,
    {
        self.hooks.preprocessor = Some(Rc::new(hook));
        self
    }

    /// Run once each copy has its relationships, before the postprocessor
    pub fn callback<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut S, S::Record, S::Record) + 'static,
    {
        self.hooks.callback = Some(Rc::new(hook));
        self
    }

    /// Run last for each copy
    pub fn postprocessor<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut S, S::Record, S::Record) + 'static,
    {
        self.hooks.postprocessor = Some(Rc::new(hook));
        self
    }

    pub fn include_spec(&self) -> Option<&IncludeSpec<S>> {
        self.include.as_ref()
    }

    pub fn hooks(&self) -> &CloneHooks<S> {
        &self.hooks
    }

    pub fn uses_dictionary(&self) -> bool {
        self.use_dictionary
    }

    pub fn skips_missing_associations(&self) -> bool {
        self.skip_missing_associations
    }

    pub fn validates(&self) -> bool {
        self.validate
    }

    /// Check the include spec at every level
    pub fn check(&self) -> CloneResult<()> {
        match self.include {
            Some(ref include) => include.validate(),
            None => Ok(()),
        }
    }
}

impl<S: AttributeStore> Default for CloneOptions<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AttributeStore> Clone for CloneOptions<S> {
    fn clone(&self) -> Self {
        Self {
            include: self.include.clone(),
            except: self.except.clone(),
            only: self.only.clone(),
            use_dictionary: self.use_dictionary,
            skip_missing_associations: self.skip_missing_associations,
            validate: self.validate,
            hooks: self.hooks.clone(),
        }
    }
}

impl<S: AttributeStore> fmt::Debug for CloneOptions<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloneOptions")
            .field("include", &self.include)
            .field("except", &self.except)
            .field("only", &self.only)
            .field("use_dictionary", &self.use_dictionary)
            .field("skip_missing_associations", &self.skip_missing_associations)
            .field("validate", &self.validate)
            .field("hooks", &self.hooks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CloneError;
    use crate::memory::MemoryStore;
    use serde_json::json;

    type Options = CloneOptions<MemoryStore>;

    #[test]
    fn test_defaults() {
        let options = Options::new();
        assert!(options.include_spec().is_none());
        assert!(!options.uses_dictionary());
        assert!(!options.skips_missing_associations());
        assert!(options.validates());
        assert!(options.hooks().is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = CloneConfig {
            use_dictionary: true,
            skip_missing_associations: true,
            validate: false,
        };
        let options = Options::from_config(&config);
        assert!(options.uses_dictionary());
        assert!(options.skips_missing_associations());
        assert!(!options.validates());
    }

    #[test]
    fn test_hooks_are_registered() {
        let options = Options::new()
            .preprocessor(|_, _, _| {})
            .postprocessor(|_, _, _| {});
        assert!(!options.hooks().is_empty());
        assert!(options.hooks().callback.is_none());
    }

    #[test]
    fn test_check_surfaces_nested_shape_errors() {
        let options = Options::new()
            .include_json(&json!({ "treasures": { "": "gold_pieces" } }))
            .unwrap();
        assert!(matches!(options.check(), Err(CloneError::InvalidOptions(_))));

        assert!(Options::new().include("mateys").check().is_ok());
    }
}
