//! Per-relationship `if` / `unless` filters

use std::fmt;
use std::rc::Rc;

use crate::store::AttributeStore;

/// Predicate over a candidate related record
pub type Predicate<S> = Rc<dyn Fn(&S, <S as AttributeStore>::Record) -> bool>;

/// Decides whether a related record takes part in the copy
///
/// With no predicates every record is included. Otherwise a record is
/// included when `if` says yes OR `unless` says no.
pub struct Condition<S: AttributeStore> {
    if_predicate: Option<Predicate<S>>,
    unless_predicate: Option<Predicate<S>>,
}

impl<S: AttributeStore> Condition<S> {
    /// A condition that includes every record
    pub fn new() -> Self {
        Self {
            if_predicate: None,
            unless_predicate: None,
        }
    }

    /// Include records for which `predicate` is true
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&S, S::Record) -> bool + 'static,
    {
        Self::new().with_if(predicate)
    }

    /// Include records for which `predicate` is false
    pub fn unless<F>(predicate: F) -> Self
    where
        F: Fn(&S, S::Record) -> bool + 'static,
    {
        Self::new().with_unless(predicate)
    }

    /// Set the `if` predicate
    pub fn with_if<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&S, S::Record) -> bool + 'static,
    {
        self.if_predicate = Some(Rc::new(predicate));
        self
    }

    /// Set the `unless` predicate
    pub fn with_unless<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&S, S::Record) -> bool + 'static,
    {
        self.unless_predicate = Some(Rc::new(predicate));
        self
    }

    /// True when neither predicate is set
    pub fn is_empty(&self) -> bool {
        self.if_predicate.is_none() && self.unless_predicate.is_none()
    }

    /// Overlay `other` on top of this condition; predicates set in `other` replace ours
    pub fn merge(&mut self, other: &Condition<S>) {
        if let Some(ref predicate) = other.if_predicate {
            self.if_predicate = Some(Rc::clone(predicate));
        }
        if let Some(ref predicate) = other.unless_predicate {
            self.unless_predicate = Some(Rc::clone(predicate));
        }
    }

    /// Evaluate the condition for `record`
    pub fn evaluate(&self, store: &S, record: S::Record) -> bool {
        if self.is_empty() {
            return true;
        }

        let by_if = self
            .if_predicate
            .as_ref()
            .map_or(false, |predicate| predicate(store, record));
        let by_unless = self
            .unless_predicate
            .as_ref()
            .map_or(false, |predicate| !predicate(store, record));

        by_if || by_unless
    }
}

impl<S: AttributeStore> Default for Condition<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AttributeStore> Clone for Condition<S> {
    fn clone(&self) -> Self {
        Self {
            if_predicate: self.if_predicate.clone(),
            unless_predicate: self.unless_predicate.clone(),
        }
    }
}

impl<S: AttributeStore> fmt::Debug for Condition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("if", &self.if_predicate.is_some())
            .field("unless", &self.unless_predicate.is_some())
            .finish()
    }
}
