//! Deep clone engine
//!
//! `DeepCloner` walks the requested part of a record graph depth-first.
//! Each visited record is duplicated (or taken from the dictionary), has
//! its attribute filters applied and then gets its relationship slots
//! filled by the handler for the relationship's kind. Nothing is saved;
//! the returned copy and everything hanging off it is new and unsaved.

mod handlers;

use tracing::{debug, trace};

use crate::dictionary::CloneDictionary;
use crate::error::{CloneError, CloneResult};
use crate::hooks::CloneHooks;
use crate::options::{AttributeFilter, CloneOptions, IncludeEntry, IncludeSpec, SplitFilter};
use crate::relationships::RelationshipResolver;
use crate::store::{AttributeStore, RelationshipStore};

/// Entry point for deep clones
///
/// ```ignore
/// let schema = Arc::new(SchemaRegistry::from_json(SCHEMA)?);
/// let mut store = MemoryStore::new(Arc::clone(&schema));
/// // ... populate the store ...
/// let copy = DeepCloner::new(&*schema).clone(&mut store, pirate, &options)?;
/// ```
pub struct DeepCloner<'r, R: RelationshipResolver + ?Sized> {
    resolver: &'r R,
}

impl<'r, R: RelationshipResolver + ?Sized> DeepCloner<'r, R> {
    pub fn new(resolver: &'r R) -> Self {
        Self { resolver }
    }

    /// Copy `record` and the relationships selected by `options`
    ///
    /// A fresh dictionary is used when `options` asks for one.
    pub fn clone<S: RelationshipStore>(
        &self,
        store: &mut S,
        record: S::Record,
        options: &CloneOptions<S>,
    ) -> CloneResult<S::Record> {
        if options.use_dictionary {
            let mut dictionary = CloneDictionary::new();
            self.run(store, record, options, Some(&mut dictionary))
        } else {
            self.run(store, record, options, None)
        }
    }

    /// Copy `record` deduplicating through a caller-owned dictionary
    ///
    /// Entries already in `dictionary` are reused as-is, which allows
    /// seeding it before the call. `use_dictionary` is ignored.
    pub fn clone_with_dictionary<S: RelationshipStore>(
        &self,
        store: &mut S,
        record: S::Record,
        options: &CloneOptions<S>,
        dictionary: &mut CloneDictionary<S::Record>,
    ) -> CloneResult<S::Record> {
        self.run(store, record, options, Some(dictionary))
    }

    fn run<S: RelationshipStore>(
        &self,
        store: &mut S,
        record: S::Record,
        options: &CloneOptions<S>,
        dictionary: Option<&mut CloneDictionary<S::Record>>,
    ) -> CloneResult<S::Record> {
        options.check()?;
        let root = NodeOptions::root(options)?;

        debug!(
            "Deep cloning {} {:?} with {} top-level relationship(s), dictionary: {}",
            store.model_name(record),
            record,
            root.include.len(),
            dictionary.is_some()
        );

        let mut traversal = Traversal {
            resolver: self.resolver,
            hooks: &options.hooks,
            skip_missing: options.skip_missing_associations,
            validate: options.validate,
            dictionary,
        };
        traversal.clone_node(store, record, &root)
    }
}

/// Copy `record` with a one-off [`DeepCloner`]
pub fn deep_clone<S, R>(
    resolver: &R,
    store: &mut S,
    record: S::Record,
    options: &CloneOptions<S>,
) -> CloneResult<S::Record>
where
    S: RelationshipStore,
    R: RelationshipResolver + ?Sized,
{
    DeepCloner::new(resolver).clone(store, record, options)
}

/// Options for one level of the traversal
struct NodeOptions<S: AttributeStore> {
    include: Vec<IncludeEntry<S>>,
    except: SplitFilter,
    only: Option<SplitFilter>,
}

impl<S: AttributeStore> NodeOptions<S> {
    fn new(
        include: Option<&IncludeSpec<S>>,
        except: Option<&AttributeFilter>,
        only: Option<&AttributeFilter>,
    ) -> CloneResult<Self> {
        let include = match include {
            Some(spec) => spec.normalize()?,
            None => Vec::new(),
        };

        Ok(Self {
            include,
            except: except.map(AttributeFilter::split).unwrap_or_default(),
            only: only.map(AttributeFilter::split),
        })
    }

    fn root(options: &CloneOptions<S>) -> CloneResult<Self> {
        Self::new(
            options.include.as_ref(),
            options.except.as_ref(),
            options.only.as_ref(),
        )
    }

    /// Options handed to the records reached through `entry`
    fn child(&self, entry: &IncludeEntry<S>) -> CloneResult<Self> {
        let except = self.except.nested_for(&entry.relationship);
        let only = self
            .only
            .as_ref()
            .and_then(|only| only.nested_for(&entry.relationship));

        Self::new(entry.nested.as_ref(), except.as_ref(), only.as_ref())
    }
}

/// State shared by every level of one top-level clone
struct Traversal<'a, S: AttributeStore, R: RelationshipResolver + ?Sized> {
    resolver: &'a R,
    hooks: &'a CloneHooks<S>,
    skip_missing: bool,
    validate: bool,
    dictionary: Option<&'a mut CloneDictionary<S::Record>>,
}

impl<'a, S, R> Traversal<'a, S, R>
where
    S: RelationshipStore,
    R: RelationshipResolver + ?Sized,
{
    fn clone_node(
        &mut self,
        store: &mut S,
        record: S::Record,
        node: &NodeOptions<S>,
    ) -> CloneResult<S::Record> {
        let copy = match self.dictionary {
            Some(ref mut dictionary) => {
                if let Some(existing) = dictionary.lookup(&*store, record) {
                    trace!("Dictionary hit for {:?}, reusing {:?}", record, existing);
                    return Ok(existing);
                }
                check_exceptions(&*store, record, &node.except.local)?;
                let copy = store.duplicate(record);
                trace!("Dictionary miss for {:?}, created {:?}", record, copy);
                dictionary.seed(&*store, record, copy);
                copy
            }
            None => {
                check_exceptions(&*store, record, &node.except.local)?;
                store.duplicate(record)
            }
        };

        self.hooks.before_relationships(store, record, copy);

        let model_name = store.model_name(record);
        for attribute in &node.except.local {
            reset_to_default(store, &model_name, copy, attribute);
        }
        if let Some(ref only) = node.only {
            for attribute in store.attribute_names(copy) {
                if !only.local.contains(&attribute) {
                    reset_to_default(store, &model_name, copy, &attribute);
                }
            }
        }

        if !self.validate {
            store.mark_skip_validation(copy);
        }

        for entry in &node.include {
            let metadata = match self
                .resolver
                .describe_relationship(&model_name, &entry.relationship)
            {
                Some(metadata) => metadata,
                None if self.skip_missing => {
                    debug!(
                        "Skipping missing association {}#{}",
                        model_name, entry.relationship
                    );
                    continue;
                }
                None => {
                    return Err(CloneError::association_not_found(
                        &model_name,
                        &entry.relationship,
                    ))
                }
            };

            let child = node.child(entry)?;
            let related = self.dispatch(store, record, copy, &metadata, &child, &entry.condition)?;
            store.set_related(copy, &entry.relationship, related);
        }

        self.hooks.after_relationships(store, record, copy);
        Ok(copy)
    }
}

/// Every `except` name must be an attribute of the record being copied
fn check_exceptions<S: AttributeStore>(store: &S, record: S::Record, names: &[String]) -> CloneResult<()> {
    let attributes = store.attribute_names(record);
    match names.iter().find(|name| !attributes.contains(*name)) {
        Some(name) => Err(CloneError::InvalidOptions(format!(
            "Unknown attribute '{}' on {}",
            name,
            store.model_name(record)
        ))),
        None => Ok(()),
    }
}

fn reset_to_default<S: AttributeStore>(store: &mut S, model_name: &str, copy: S::Record, attribute: &str) {
    let value = store.default_value(model_name, attribute);
    store.set(copy, attribute, value);
}
