//! Per-tick and per-collision hooks
//!
//! A [`Session`] owns the scene, the held keys and every body's dispatcher.
//! One call to [`Session::tick`] runs, in order:
//! 1. `before_tick`: input force, velocity clamp, telemetry, highlight timers
//! 2. the engine step
//! 3. `collision_start`: fan-out of the step's collision event

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::body::{BodyId, BodyRef};
use super::dispatch::{Dispatcher, resolve_target};
use super::engine::{CollisionEvent, PhysicsEngine};
use super::factories::{self, Spawn};
use super::input::{DirectionTable, InputCommand, Key, KeyState, resolve_input};
use super::state::{GameWorld, Scene};
use super::telemetry::{ChartSink, LogChart, MotionSampler};
use super::vector::{clamp_components, magnitude};
use crate::settings::{ControlValues, Settings};

/// One running toy: scene, controls and collision wiring
pub struct Session<E: PhysicsEngine> {
    pub scene: Scene<E>,
    dispatchers: BTreeMap<BodyId, Dispatcher<Scene<E>>>,
    keys: KeyState,
    directions: DirectionTable,
    controls: ControlValues,
    player: Option<BodyId>,
    sampler: Option<MotionSampler>,
    chart: Box<dyn ChartSink>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl<E: PhysicsEngine + 'static> Session<E> {
    /// Empty session over `engine`; call [`populate`](Self::populate) or
    /// [`spawn`](Self::spawn) to add bodies
    pub fn new(engine: E, settings: &Settings) -> Self {
        let world = GameWorld::new(settings.world_width, settings.world_height);
        Self {
            scene: Scene::new(engine, world),
            dispatchers: BTreeMap::new(),
            keys: KeyState::new(),
            directions: DirectionTable::unit(),
            controls: settings.control_values(),
            player: None,
            sampler: settings
                .telemetry
                .then(|| MotionSampler::new(settings.telemetry_threshold)),
            chart: Box::new(LogChart::default()),
            time_ticks: 0,
        }
    }

    /// Route finished motion episodes to `chart` instead of the log
    pub fn with_chart(mut self, chart: Box<dyn ChartSink>) -> Self {
        self.chart = chart;
        self
    }

    /// Add a body and register its dispatcher
    pub fn spawn(&mut self, spawn: Spawn<Scene<E>>) -> BodyId {
        let category = spawn.desc.category;
        let id = self.scene.engine.add_body(spawn.desc);
        if !spawn.handlers.is_empty() {
            let dispatcher = Dispatcher::new(BodyRef::new(id, category), spawn.handlers);
            debug_assert_eq!(dispatcher.owner().id, id);
            self.dispatchers.insert(id, dispatcher);
        }
        id
    }

    /// The body driven by the arrow keys
    pub fn set_player(&mut self, id: BodyId) {
        self.player = Some(id);
    }

    pub fn player(&self) -> Option<BodyId> {
        self.player
    }

    pub fn controls(&self) -> ControlValues {
        self.controls
    }

    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    /// Walls plus the starting level; returns the player id
    pub fn populate(&mut self, settings: &Settings) -> BodyId {
        let world = self.scene.world;
        for wall in factories::board(&world, settings) {
            self.spawn(wall);
        }
        let level = factories::level(&world, settings);
        let pac = self.spawn(level.pac);
        for body in level.bodies {
            self.spawn(body);
        }
        self.set_player(pac);

        log::info!(
            "World {}x{} populated: {} bodies, player {}",
            world.width,
            world.height,
            self.scene.engine.body_ids().len(),
            pac
        );
        pac
    }

    pub fn key_down(&mut self, key: Key) {
        self.keys.press(key);
    }

    pub fn key_up(&mut self, key: &Key) {
        self.keys.release(key);
    }

    /// Forget every held key, e.g. when the page loses focus
    pub fn release_all_keys(&mut self) {
        self.keys = KeyState::new();
    }

    /// Whether `id` still has collision handlers registered
    pub fn has_dispatcher(&self, id: BodyId) -> bool {
        self.dispatchers.contains_key(&id)
    }

    /// Input, clamp and telemetry for the player, then highlight timers
    pub fn before_tick(&mut self) {
        if let Some(player) = self.player.filter(|id| self.scene.engine.contains(*id)) {
            self.drive_player(player);
        }
        self.scene.advance_flashes();
    }

    fn drive_player(&mut self, player: BodyId) {
        let engine = &mut self.scene.engine;

        match resolve_input(&self.keys, &self.directions, self.controls.acceleration) {
            InputCommand::Stop => engine.set_velocity(player, Vec2::ZERO),
            InputCommand::Push(force) => {
                if magnitude(force) > 0.0 {
                    if let Some(position) = engine.position(player) {
                        engine.apply_force(player, position, force);
                    }
                }
            }
        }

        let Some(velocity) = engine.velocity(player) else {
            return;
        };
        let clamped = clamp_components(velocity, self.controls.max_speed);
        if clamped != velocity {
            engine.set_velocity(player, clamped);
        }

        if let Some(sampler) = &mut self.sampler {
            sampler.record(magnitude(clamped), engine.time(), self.chart.as_mut());
        }
    }

    /// Give every body in every pair a chance to react to `event`.
    ///
    /// Bodies removed by an earlier handler in the same batch are skipped as
    /// owners but still count as targets. A pair naming a body that was gone
    /// before the batch started reaches nobody.
    pub fn collision_start(&mut self, event: &CollisionEvent) {
        let live: BTreeSet<BodyId> = event
            .pairs
            .iter()
            .flat_map(|pair| pair.members())
            .map(|member| member.id)
            .filter(|id| self.scene.engine.contains(*id))
            .collect();

        for pair in &event.pairs {
            for member in pair.members() {
                if !self.scene.engine.contains(member.id) {
                    continue;
                }
                let Some(dispatcher) = self.dispatchers.get(&member.id) else {
                    continue;
                };
                match resolve_target(member.id, event) {
                    Some(target) if live.contains(&target.id) => {
                        dispatcher.dispatch(&mut self.scene, event);
                    }
                    Some(target) => {
                        log::debug!("Skipping {}: {} no longer exists", member.id, target.id);
                    }
                    None => {}
                }
            }
        }
        self.dispatchers
            .retain(|id, _| self.scene.engine.contains(*id));
    }

    /// Advance the simulation by one fixed timestep
    pub fn tick(&mut self, dt: f32) -> CollisionEvent {
        self.before_tick();
        let event = self.scene.engine.step(dt);
        if !event.is_empty() {
            self.collision_start(&event);
        }
        self.time_ticks += 1;
        event
    }
}
