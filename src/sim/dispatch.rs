//! Per-body collision dispatch
//!
//! Every body with gameplay behavior owns a [`Dispatcher`]: its own identity
//! plus a table of handlers keyed by the category of whatever it hits. Given
//! a collision event, the dispatcher finds the pair that involves its owner,
//! works out the counterpart, and runs the handler registered for the
//! counterpart's category.
//!
//! Handlers are generic over a context `C` (the scene they may mutate). The
//! owner is passed explicitly; there is no receiver binding.

use std::collections::HashMap;
use std::fmt;

use super::body::{BodyId, BodyRef, Category};
use super::engine::CollisionEvent;

/// Collision reaction: `(context, owner, target, event)`
pub type Handler<C> = Box<dyn Fn(&mut C, BodyRef, BodyRef, &CollisionEvent)>;

/// Handlers keyed by counterpart category
pub struct HandlerTable<C> {
    handlers: HashMap<Category, Handler<C>>,
}

impl<C> Default for HandlerTable<C> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }
}

impl<C> fmt::Debug for HandlerTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.handlers.keys().map(Category::label).collect();
        keys.sort_unstable();
        f.debug_struct("HandlerTable").field("categories", &keys).finish()
    }
}

impl<C> HandlerTable<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the reaction to hitting a body of `category`
    pub fn on<F>(mut self, category: Category, handler: F) -> Self
    where
        F: Fn(&mut C, BodyRef, BodyRef, &CollisionEvent) + 'static,
    {
        self.handlers.insert(category, Box::new(handler));
        self
    }

    pub fn get(&self, category: Category) -> Option<&Handler<C>> {
        self.handlers.get(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Find the counterpart of `owner` in the first pair that involves it.
///
/// Pairs are matched by identity, so two bodies of the same category resolve
/// each other unambiguously, and pairs between other bodies that merely share
/// the owner's category are skipped.
pub fn resolve_target(owner: BodyId, event: &CollisionEvent) -> Option<BodyRef> {
    event.pairs.iter().find_map(|pair| pair.other(owner))
}

/// A body's collision reactions
pub struct Dispatcher<C> {
    owner: BodyRef,
    table: HandlerTable<C>,
}

impl<C> fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("owner", &self.owner)
            .field("table", &self.table)
            .finish()
    }
}

impl<C> Dispatcher<C> {
    pub fn new(owner: BodyRef, table: HandlerTable<C>) -> Self {
        Self { owner, table }
    }

    pub fn owner(&self) -> BodyRef {
        self.owner
    }

    /// Run the handler for whatever the owner hit in `event`.
    ///
    /// Returns whether a handler ran. An event that does not involve the
    /// owner, or a counterpart with no registered handler, is a no-op.
    pub fn dispatch(&self, ctx: &mut C, event: &CollisionEvent) -> bool {
        let Some(target) = resolve_target(self.owner.id, event) else {
            return false;
        };
        match self.table.get(target.category) {
            Some(handler) => {
                handler(ctx, self.owner, target, event);
                true
            }
            None => false,
        }
    }
}
