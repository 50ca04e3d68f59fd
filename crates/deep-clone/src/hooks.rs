//! Per-node callbacks fired while a graph is copied

use std::fmt;
use std::rc::Rc;

use crate::store::AttributeStore;

/// Callback receiving the store, the original record and its copy
pub type RecordHook<S> =
    Rc<dyn Fn(&mut S, <S as AttributeStore>::Record, <S as AttributeStore>::Record)>;

/// Hooks shared by every level of one traversal
///
/// `preprocessor` runs right after a copy is created, before attribute
/// filters and relationships. `callback` and then `postprocessor` run once
/// the copy's relationships are assigned. Dictionary hits fire nothing.
pub struct CloneHooks<S: AttributeStore> {
    pub(crate) preprocessor: Option<RecordHook<S>>,
    pub(crate) callback: Option<RecordHook<S>>,
    pub(crate) postprocessor: Option<RecordHook<S>>,
}

impl<S: AttributeStore> CloneHooks<S> {
    pub fn new() -> Self {
        Self {
            preprocessor: None,
            callback: None,
            postprocessor: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.preprocessor.is_none() && self.callback.is_none() && self.postprocessor.is_none()
    }

    pub(crate) fn before_relationships(&self, store: &mut S, original: S::Record, copy: S::Record) {
        if let Some(ref hook) = self.preprocessor {
            hook(store, original, copy);
        }
    }

    pub(crate) fn after_relationships(&self, store: &mut S, original: S::Record, copy: S::Record) {
        if let Some(ref hook) = self.callback {
            hook(store, original, copy);
        }
        if let Some(ref hook) = self.postprocessor {
            hook(store, original, copy);
        }
    }
}

impl<S: AttributeStore> Default for CloneHooks<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AttributeStore> Clone for CloneHooks<S> {
    fn clone(&self) -> Self {
        Self {
            preprocessor: self.preprocessor.clone(),
            callback: self.callback.clone(),
            postprocessor: self.postprocessor.clone(),
        }
    }
}

impl<S: AttributeStore> fmt::Debug for CloneHooks<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloneHooks")
            .field("preprocessor", &self.preprocessor.is_some())
            .field("callback", &self.callback.is_some())
            .field("postprocessor", &self.postprocessor.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryStore, RecordId};
    use crate::schema::{ModelSchema, SchemaRegistry};
    use serde_json::json;
    use std::cell::RefCell;
    use std::sync::Arc;

    #[test]
    fn test_hooks_fire_in_order() {
        let schema = SchemaRegistry::new()
            .with_model(ModelSchema::new("Pirate").column("name"))
            .unwrap();
        let mut store = MemoryStore::new(Arc::new(schema));
        let jack = store.create("Pirate", json!({ "name": "Jack" })).unwrap();
        let copy = store.duplicate(jack);

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut hooks = CloneHooks::<MemoryStore>::new();
        assert!(hooks.is_empty());

        for (slot, label) in [
            (&mut hooks.preprocessor, "pre"),
            (&mut hooks.callback, "block"),
            (&mut hooks.postprocessor, "post"),
        ] {
            let log = Rc::clone(&log);
            *slot = Some(Rc::new(move |_: &mut MemoryStore, _: RecordId, _: RecordId| {
                log.borrow_mut().push(label)
            }));
        }

        hooks.after_relationships(&mut store, jack, copy);
        hooks.before_relationships(&mut store, jack, copy);
        assert_eq!(*log.borrow(), vec!["block", "post", "pre"]);
    }
}
