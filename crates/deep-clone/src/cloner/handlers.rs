//! Relinking rules per relationship kind

use serde_json::Value;
use tracing::trace;

use super::{NodeOptions, Traversal};
use crate::error::CloneResult;
use crate::options::Condition;
use crate::relationships::{RelationshipMetadata, RelationshipResolver, RelationshipType};
use crate::store::{Related, RelationshipStore};

impl<'a, S, R> Traversal<'a, S, R>
where
    S: RelationshipStore,
    R: RelationshipResolver + ?Sized,
{
    /// Produce the value of `copy`'s slot for `metadata`
    pub(super) fn dispatch(
        &mut self,
        store: &mut S,
        record: S::Record,
        copy: S::Record,
        metadata: &RelationshipMetadata,
        child: &NodeOptions<S>,
        condition: &Condition<S>,
    ) -> CloneResult<Related<S::Record>> {
        trace!(
            "Dispatching {:?} relationship {} of {:?}",
            metadata.relationship_type,
            metadata.name,
            record
        );

        match metadata.relationship_type {
            RelationshipType::BelongsTo | RelationshipType::HasOne => {
                self.clone_to_one(store, record, metadata, child, condition)
            }
            RelationshipType::HasMany => {
                self.clone_has_many(store, record, copy, metadata, child, condition)
            }
            RelationshipType::ManyToMany | RelationshipType::HasManyThrough => {
                self.relink_joined_many(store, record, copy, metadata, child, condition)
            }
            RelationshipType::HasOneThrough => {
                self.relink_joined_one(store, record, copy, metadata, child, condition)
            }
        }
    }

    fn clone_to_one(
        &mut self,
        store: &mut S,
        record: S::Record,
        metadata: &RelationshipMetadata,
        child: &NodeOptions<S>,
        condition: &Condition<S>,
    ) -> CloneResult<Related<S::Record>> {
        let related = store.get_related(record, &metadata.name).first();
        let cloned = match related {
            Some(object) if condition.evaluate(store, object) => {
                Some(self.clone_node(store, object, child)?)
            }
            _ => None,
        };
        Ok(Related::One(cloned))
    }

    /// Children are cloned, detached from the original owner's key and
    /// pointed at `copy` through the inverse belongs-to, when there is one
    fn clone_has_many(
        &mut self,
        store: &mut S,
        record: S::Record,
        copy: S::Record,
        metadata: &RelationshipMetadata,
        child: &NodeOptions<S>,
        condition: &Condition<S>,
    ) -> CloneResult<Related<S::Record>> {
        let objects = accepted(&*store, record, metadata, condition);
        let mut clones = Vec::with_capacity(objects.len());

        for object in objects {
            let cloned = self.clone_node(store, object, child)?;
            for column in &metadata.foreign_key.columns {
                store.set(cloned, column, Value::Null);
            }
            if let Some(ref inverse) = metadata.inverse {
                store.set_related(cloned, inverse, Related::One(Some(copy)));
            }
            clones.push(cloned);
        }

        Ok(Related::Many(clones))
    }

    fn relink_joined_many(
        &mut self,
        store: &mut S,
        record: S::Record,
        copy: S::Record,
        metadata: &RelationshipMetadata,
        child: &NodeOptions<S>,
        condition: &Condition<S>,
    ) -> CloneResult<Related<S::Record>> {
        let objects = accepted(&*store, record, metadata, condition);
        let mut linked = Vec::with_capacity(objects.len());

        for object in objects {
            linked.push(self.process_joined(store, object, copy, metadata, child)?);
        }

        Ok(Related::Many(linked))
    }

    fn relink_joined_one(
        &mut self,
        store: &mut S,
        record: S::Record,
        copy: S::Record,
        metadata: &RelationshipMetadata,
        child: &NodeOptions<S>,
        condition: &Condition<S>,
    ) -> CloneResult<Related<S::Record>> {
        let related = store.get_related(record, &metadata.name).first();
        let linked = match related {
            Some(object) if condition.evaluate(store, object) => {
                Some(self.process_joined(store, object, copy, metadata, child)?)
            }
            _ => None,
        };
        Ok(Related::One(linked))
    }

    /// Far-side records of a join are shared, not copied
    ///
    /// Only a record the dictionary already knows is routed through the
    /// clone path, which hands back its existing copy. Anything else stays
    /// the original record and gets `copy` appended to its reverse
    /// collection so both sides agree before persistence.
    fn process_joined(
        &mut self,
        store: &mut S,
        object: S::Record,
        copy: S::Record,
        metadata: &RelationshipMetadata,
        child: &NodeOptions<S>,
    ) -> CloneResult<S::Record> {
        let known = self
            .dictionary
            .as_ref()
            .map_or(false, |dictionary| dictionary.lookup(&*store, object).is_some());

        if known {
            return self.clone_node(store, object, child);
        }

        match metadata.inverse {
            Some(ref inverse) => {
                trace!("Relinking {:?} to {:?} through {}", object, copy, inverse);
                store.append_to_reverse_collection(object, inverse, copy);
            }
            None => trace!("No inverse for {}, {:?} is shared as-is", metadata.name, object),
        }
        Ok(object)
    }
}

/// Related records of `record` accepted by `condition`, in order
fn accepted<S: RelationshipStore>(
    store: &S,
    record: S::Record,
    metadata: &RelationshipMetadata,
    condition: &Condition<S>,
) -> Vec<S::Record> {
    store
        .get_related(record, &metadata.name)
        .records()
        .into_iter()
        .filter(|object| condition.evaluate(store, *object))
        .collect()
}
