//! Scripted engine for exercising hooks without a real solver

use std::collections::{BTreeMap, VecDeque};

use glam::Vec2;

use super::body::{BodyDesc, BodyId, BodyRef, Category, RenderStyle};
use super::engine::{CollisionEvent, CollisionPair, PhysicsEngine};

#[derive(Debug)]
struct ScriptedBody {
    category: Category,
    position: Vec2,
    velocity: Vec2,
    pending_force: Vec2,
    style: RenderStyle,
}

/// Unit-mass point bodies; collisions are whatever the test queues
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    bodies: BTreeMap<BodyId, ScriptedBody>,
    next_id: u32,
    time: f64,
    queued: VecDeque<Vec<(BodyId, BodyId)>>,
    /// Every force passed to `apply_force`, in call order
    pub applied_forces: Vec<(BodyId, Vec2)>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs reported by the next `step`
    pub fn queue_collisions(&mut self, pairs: &[(BodyId, BodyId)]) {
        self.queued.push_back(pairs.to_vec());
    }

    /// Build an event from ids currently in the world
    pub fn event(&self, pairs: &[(BodyId, BodyId)]) -> CollisionEvent {
        let pairs = pairs
            .iter()
            .filter_map(|(a, b)| Some(CollisionPair::new(self.body_ref(*a)?, self.body_ref(*b)?)))
            .collect();
        CollisionEvent::new(self.time, pairs)
    }
}

impl PhysicsEngine for ScriptedEngine {
    fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        self.next_id += 1;
        let id = BodyId(self.next_id);
        self.bodies.insert(
            id,
            ScriptedBody {
                category: desc.category,
                position: desc.position,
                velocity: Vec2::ZERO,
                pending_force: Vec2::ZERO,
                style: desc.style,
            },
        );
        id
    }

    fn remove_body(&mut self, id: BodyId) -> bool {
        self.bodies.remove(&id).is_some()
    }

    fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    fn category(&self, id: BodyId) -> Option<Category> {
        self.bodies.get(&id).map(|b| b.category)
    }

    fn position(&self, id: BodyId) -> Option<Vec2> {
        self.bodies.get(&id).map(|b| b.position)
    }

    fn velocity(&self, id: BodyId) -> Option<Vec2> {
        self.bodies.get(&id).map(|b| b.velocity)
    }

    fn set_velocity(&mut self, id: BodyId, velocity: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.velocity = velocity;
        }
    }

    fn apply_force(&mut self, id: BodyId, _position: Vec2, force: Vec2) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.pending_force += force;
            self.applied_forces.push((id, force));
        }
    }

    fn style(&self, id: BodyId) -> Option<&RenderStyle> {
        self.bodies.get(&id).map(|b| &b.style)
    }

    fn style_mut(&mut self, id: BodyId) -> Option<&mut RenderStyle> {
        self.bodies.get_mut(&id).map(|b| &mut b.style)
    }

    fn step(&mut self, dt: f32) -> CollisionEvent {
        for body in self.bodies.values_mut() {
            body.velocity += body.pending_force;
            body.position += body.velocity;
            body.pending_force = Vec2::ZERO;
        }
        self.time += dt as f64;
        let pairs = self.queued.pop_front().unwrap_or_default();
        self.event(&pairs)
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn body_ids(&self) -> Vec<BodyId> {
        self.bodies.keys().copied().collect()
    }

    fn body_ref(&self, id: BodyId) -> Option<BodyRef> {
        self.category(id).map(|c| BodyRef::new(id, c))
    }
}
