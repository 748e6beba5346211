//! rapier2d-backed engine
//!
//! [`RapierWorld`] owns a rapier simulation and exposes it through
//! [`PhysicsEngine`]. Each step:
//!
//! 1. Forces queued by `apply_force` act for exactly one step.
//! 2. rapier integrates with the requested dt and zero gravity.
//! 3. Collision-started events are mapped back to [`BodyId`]s and sorted
//!    by id so the same state always yields the same pair order.
//!
//! The game's tuning works in length units per tick and forces against a
//! millisecond time base; the conversions live here and nowhere else.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;
use rapier2d::geometry::CollisionEvent as ContactEvent;
use rapier2d::prelude::{
    ActiveEvents, CCDSolver, ChannelEventCollector, ColliderBuilder, ColliderHandle, ColliderSet,
    ContactForceEvent, DefaultBroadPhase, ImpulseJointSet, IntegrationParameters, IslandManager,
    MultibodyJointSet, NarrowPhase, PhysicsPipeline, Point, Real, RigidBodyBuilder,
    RigidBodyHandle, RigidBodySet, SharedShape, Vector,
};

use super::body::{BodyDesc, BodyId, Category, RenderStyle, Shape};
use super::engine::{CollisionEvent, CollisionPair, PhysicsEngine};
use crate::consts::SIM_DT;

/// `(ms / s)^2`: converts millisecond-based forces to rapier's seconds
const FORCE_SCALE: Real = 1.0e6;

/// Surface friction for every collider
const SURFACE_FRICTION: Real = 0.1;

#[derive(Debug)]
struct BodyRecord {
    handle: RigidBodyHandle,
    category: Category,
    style: RenderStyle,
}

/// Zero-gravity rapier2d world
pub struct RapierWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    bodies: BTreeMap<BodyId, BodyRecord>,
    collider_to_body: HashMap<ColliderHandle, BodyId>,
    next_id: u32,
    time: f64,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl RapierWorld {
    pub fn new() -> Self {
        let mut integration_params = IntegrationParameters::default();
        integration_params.dt = SIM_DT;
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: Vector::new(0.0, 0.0),
            integration_params,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            bodies: BTreeMap::new(),
            collider_to_body: HashMap::new(),
            next_id: 1,
            time: 0.0,
        }
    }

    /// Seconds per tick, the base for per-tick velocities
    fn tick_dt(&self) -> Real {
        self.integration_params.dt
    }

    fn handle(&self, id: BodyId) -> Option<RigidBodyHandle> {
        self.bodies.get(&id).map(|record| record.handle)
    }
}

impl PhysicsEngine for RapierWorld {
    fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;

        let builder = if desc.is_static {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
                .linear_damping(desc.friction_air / self.tick_dt())
                .ccd_enabled(true)
        };
        let rb = builder
            .translation(Vector::new(desc.position.x, desc.position.y))
            .build();
        let handle = self.rigid_body_set.insert(rb);

        let shape = match desc.shape {
            Shape::Circle { radius } => SharedShape::ball(radius),
            Shape::Rect { width, height } => SharedShape::cuboid(width / 2.0, height / 2.0),
        };
        let collider = ColliderBuilder::new(shape)
            .restitution(desc.restitution)
            .friction(SURFACE_FRICTION)
            .density(desc.density)
            .sensor(desc.is_sensor)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        self.collider_to_body.insert(collider_handle, id);
        self.bodies.insert(
            id,
            BodyRecord {
                handle,
                category: desc.category,
                style: desc.style,
            },
        );
        id
    }

    fn remove_body(&mut self, id: BodyId) -> bool {
        let Some(record) = self.bodies.remove(&id) else {
            return false;
        };
        self.rigid_body_set.remove(
            record.handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        self.collider_to_body.retain(|_, body| *body != id);
        true
    }

    fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    fn category(&self, id: BodyId) -> Option<Category> {
        self.bodies.get(&id).map(|record| record.category)
    }

    fn position(&self, id: BodyId) -> Option<Vec2> {
        let rb = self.rigid_body_set.get(self.handle(id)?)?;
        let t = rb.translation();
        Some(Vec2::new(t.x, t.y))
    }

    fn velocity(&self, id: BodyId) -> Option<Vec2> {
        let rb = self.rigid_body_set.get(self.handle(id)?)?;
        let v = rb.linvel() * self.tick_dt();
        Some(Vec2::new(v.x, v.y))
    }

    fn set_velocity(&mut self, id: BodyId, velocity: Vec2) {
        let dt = self.tick_dt();
        let Some(handle) = self.handle(id) else {
            return;
        };
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.set_linvel(Vector::new(velocity.x / dt, velocity.y / dt), true);
        }
    }

    fn apply_force(&mut self, id: BodyId, position: Vec2, force: Vec2) {
        let Some(handle) = self.handle(id) else {
            return;
        };
        if let Some(rb) = self.rigid_body_set.get_mut(handle) {
            rb.add_force_at_point(
                Vector::new(force.x, force.y) * FORCE_SCALE,
                Point::new(position.x, position.y),
                true,
            );
        }
    }

    fn style(&self, id: BodyId) -> Option<&RenderStyle> {
        self.bodies.get(&id).map(|record| &record.style)
    }

    fn style_mut(&mut self, id: BodyId) -> Option<&mut RenderStyle> {
        self.bodies.get_mut(&id).map(|record| &mut record.style)
    }

    fn step(&mut self, dt: f32) -> CollisionEvent {
        self.integration_params.dt = dt;

        let (collision_send, collision_recv) =
            rapier2d::crossbeam::channel::unbounded::<ContactEvent>();
        let (force_send, _force_recv) =
            rapier2d::crossbeam::channel::unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &event_handler,
        );

        // Forces last one step only
        for (_, rb) in self.rigid_body_set.iter_mut() {
            rb.reset_forces(false);
            rb.reset_torques(false);
        }
        self.time += dt as f64;

        let mut pairs = Vec::new();
        while let Ok(event) = collision_recv.try_recv() {
            if let ContactEvent::Started(h1, h2, _flags) = event {
                let first = self.collider_to_body.get(&h1).and_then(|id| self.body_ref(*id));
                let second = self.collider_to_body.get(&h2).and_then(|id| self.body_ref(*id));
                if let (Some(first), Some(second)) = (first, second) {
                    pairs.push(CollisionPair::new(first, second));
                }
            }
        }
        pairs.sort_by_key(|pair| {
            let (a, b) = (pair.first.id, pair.second.id);
            (a.min(b), a.max(b))
        });

        CollisionEvent::new(self.time, pairs)
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn body_ids(&self) -> Vec<BodyId> {
        self.bodies.keys().copied().collect()
    }
}
