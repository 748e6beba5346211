//! The physics engine surface the glue layer depends on
//!
//! Bodies, integration and contact detection are owned by the engine; the
//! game only adds/removes bodies, nudges velocities and forces, and reacts to
//! the collision-start events returned from [`PhysicsEngine::step`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{BodyDesc, BodyId, BodyRef, Category, RenderStyle};

/// Two bodies that started touching during one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionPair {
    pub first: BodyRef,
    pub second: BodyRef,
}

impl CollisionPair {
    pub fn new(first: BodyRef, second: BodyRef) -> Self {
        debug_assert_ne!(first.id, second.id, "a body cannot collide with itself");
        Self { first, second }
    }

    /// Whether `id` is one of the two members
    pub fn involves(&self, id: BodyId) -> bool {
        self.first.id == id || self.second.id == id
    }

    /// The member that is not `id`, if `id` is a member at all
    pub fn other(&self, id: BodyId) -> Option<BodyRef> {
        if self.first.id == id {
            Some(self.second)
        } else if self.second.id == id {
            Some(self.first)
        } else {
            None
        }
    }

    pub fn members(&self) -> [BodyRef; 2] {
        [self.first, self.second]
    }
}

/// All collision-start pairs of one step, in deterministic order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    /// Simulation time of the step that produced the event (seconds)
    pub timestamp: f64,
    pub pairs: Vec<CollisionPair>,
}

impl CollisionEvent {
    pub fn new(timestamp: f64, pairs: Vec<CollisionPair>) -> Self {
        Self { timestamp, pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Minimal engine surface.
///
/// Velocities are expressed in length units per tick. Every accessor taking
/// a [`BodyId`] treats an unknown or removed id as a no-op.
pub trait PhysicsEngine {
    fn add_body(&mut self, desc: BodyDesc) -> BodyId;

    /// Returns `false` when the body was already gone
    fn remove_body(&mut self, id: BodyId) -> bool;

    fn contains(&self, id: BodyId) -> bool;

    fn category(&self, id: BodyId) -> Option<Category>;

    fn position(&self, id: BodyId) -> Option<Vec2>;

    fn velocity(&self, id: BodyId) -> Option<Vec2>;

    fn set_velocity(&mut self, id: BodyId, velocity: Vec2);

    /// Apply a force at a world-space point for the next step only
    fn apply_force(&mut self, id: BodyId, position: Vec2, force: Vec2);

    fn style(&self, id: BodyId) -> Option<&RenderStyle>;

    fn style_mut(&mut self, id: BodyId) -> Option<&mut RenderStyle>;

    /// Integrate one step and report the pairs that started touching
    fn step(&mut self, dt: f32) -> CollisionEvent;

    /// Elapsed simulation time (seconds)
    fn time(&self) -> f64;

    /// Ids of all bodies currently in the world, ascending
    fn body_ids(&self) -> Vec<BodyId>;

    fn body_ref(&self, id: BodyId) -> Option<BodyRef> {
        self.category(id).map(|category| BodyRef::new(id, category))
    }

    fn count(&self, category: Category) -> usize {
        self.body_ids()
            .into_iter()
            .filter(|id| self.category(*id) == Some(category))
            .count()
    }
}
