//! Simulation glue module
//!
//! Everything that sits between input events and the physics engine:
//! - Force/velocity vector helpers
//! - Held-key to force mapping
//! - Per-body collision dispatch keyed by category
//! - Before-tick and collision-start hooks
//!
//! Integration and contact detection belong to the engine behind
//! [`PhysicsEngine`]; nothing here owns a body's lifecycle.

pub mod body;
pub mod dispatch;
pub mod engine;
pub mod factories;
pub mod input;
pub mod rapier_world;
pub mod state;
pub mod telemetry;
pub mod tick;
pub mod vector;

#[cfg(test)]
pub(crate) mod testing;

pub use body::{BodyDesc, BodyId, BodyRef, Category, RenderStyle, Shape};
pub use dispatch::{Dispatcher, Handler, HandlerTable};
pub use engine::{CollisionEvent, CollisionPair, PhysicsEngine};
pub use input::{
    Direction, DirectionTable, InputCommand, Key, KeyState, compute_input_force, resolve_input,
};
pub use rapier_world::RapierWorld;
pub use state::{GameWorld, Scene, WallFlash};
pub use telemetry::{ChartSink, LogChart, MotionSampler, Sample};
pub use tick::Session;
pub use vector::{add, clamp_components, magnitude, scale};
