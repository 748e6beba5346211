//! Body factories
//!
//! Each factory returns the creation descriptor together with the body's
//! collision handlers:
//! - Wall: static boundary, flashes when a ghost hits it
//! - Pac: player ball, speeds up when it eats a pellet
//! - Pellet: sensor dot, removed when pac touches it
//! - Ghost: loose ball, removed when it hits a wall hard enough

use glam::Vec2;

use super::body::{BodyDesc, Category, RenderStyle};
use super::dispatch::HandlerTable;
use super::engine::PhysicsEngine;
use super::state::{GameWorld, Scene};
use super::vector::{magnitude, scale};
use crate::consts::*;
use crate::settings::Settings;

/// A body waiting to be added, with its handlers
pub struct Spawn<C> {
    pub desc: BodyDesc,
    pub handlers: HandlerTable<C>,
}

impl<C> Spawn<C> {
    pub fn new(desc: BodyDesc, handlers: HandlerTable<C>) -> Self {
        Self { desc, handlers }
    }
}

/// The starting layout: the player plus everything else
pub struct Level<C> {
    pub pac: Spawn<C>,
    pub bodies: Vec<Spawn<C>>,
}

fn wall_flash_style() -> RenderStyle {
    RenderStyle {
        fill: COLOR_BLUE_FLASH.to_string(),
        stroke: Some(COLOR_WHITE.to_string()),
        line_width: 3.0,
    }
}

pub fn wall<E: PhysicsEngine + 'static>(
    center: Vec2,
    width: f32,
    height: f32,
    settings: &Settings,
) -> Spawn<Scene<E>> {
    let flash_ticks = settings.wall_flash_ticks;
    let desc = BodyDesc::rect(Category::Wall, center, width, height)
        .fixed()
        .style(RenderStyle::filled(COLOR_BLUE));

    let handlers = HandlerTable::new().on(Category::Ghost, move |scene: &mut Scene<E>, owner, _, _| {
        scene.flash(owner.id, wall_flash_style(), flash_ticks);
    });

    Spawn::new(desc, handlers)
}

pub fn pac<E: PhysicsEngine + 'static>(
    world: &GameWorld,
    position: Vec2,
    settings: &Settings,
) -> Spawn<Scene<E>> {
    let boost = world.unit * settings.pellet_boost_factor;
    let desc = BodyDesc::circle(Category::Pac, position, world.unit * 1.5)
        .friction_air(settings.control_values().friction)
        .restitution(0.5)
        .density(world.unit)
        .style(RenderStyle::filled(COLOR_YELLOW_DARK));

    let handlers = HandlerTable::new().on(Category::Pellet, move |scene: &mut Scene<E>, owner, _, _| {
        if let Some(velocity) = scene.engine.velocity(owner.id) {
            scene.engine.set_velocity(owner.id, scale(velocity, boost));
        }
    });

    Spawn::new(desc, handlers)
}

pub fn pellet<E: PhysicsEngine + 'static>(world: &GameWorld, position: Vec2) -> Spawn<Scene<E>> {
    // Sensor so pac passes through instead of bouncing off
    let desc = BodyDesc::circle(Category::Pellet, position, world.unit * 0.75)
        .fixed()
        .sensor()
        .style(RenderStyle::filled(COLOR_YELLOW_LIGHT));

    let handlers = HandlerTable::new().on(Category::Pac, |scene: &mut Scene<E>, owner, target, _| {
        if scene.remove(owner.id) {
            log::debug!("Pellet {} eaten by {}", owner.id, target.id);
        }
    });

    Spawn::new(desc, handlers)
}

pub fn ghost<E: PhysicsEngine + 'static>(
    world: &GameWorld,
    position: Vec2,
    settings: &Settings,
) -> Spawn<Scene<E>> {
    let despawn_speed = settings.ghost_despawn_speed;
    let desc = BodyDesc::circle(Category::Ghost, position, world.unit * 2.0)
        .friction_air(0.03)
        .restitution(0.5)
        .density(world.unit * 0.05)
        .style(RenderStyle::filled(COLOR_RED));

    let handlers = HandlerTable::new().on(Category::Wall, move |scene: &mut Scene<E>, owner, _, _| {
        let speed = scene.engine.velocity(owner.id).map(magnitude).unwrap_or(0.0);
        if speed > despawn_speed && scene.remove(owner.id) {
            log::debug!("Ghost {} despawned at speed {:.2}", owner.id, speed);
        }
    });

    Spawn::new(desc, handlers)
}

/// Four walls, one unit thick, centered on each edge
pub fn board<E: PhysicsEngine + 'static>(world: &GameWorld, settings: &Settings) -> Vec<Spawn<Scene<E>>> {
    let (w, h, u) = (world.width, world.height, world.unit);
    vec![
        wall(Vec2::new(world.center_x, world.top), w + u, u, settings),
        wall(Vec2::new(world.left, world.center_y), u, h + u, settings),
        wall(Vec2::new(world.right, world.center_y), u, h + u, settings),
        wall(Vec2::new(world.center_x, world.bottom), w + u, u, settings),
    ]
}

/// Pac in the lower left, two diagonal pellet trails, a lone pellet near the
/// top and a column of ghosts.
pub fn level<E: PhysicsEngine + 'static>(world: &GameWorld, settings: &Settings) -> Level<Scene<E>> {
    let u = world.unit;
    let pac = pac(world, Vec2::new(u * 1.5, world.height * 0.75), settings);

    let mut bodies = Vec::new();
    for i in 0..4 {
        let i = i as f32;
        bodies.push(pellet(world, Vec2::new(u * 1.5 + i, world.height * 0.65 - i * 20.0)));
    }
    for i in 0..4 {
        let i = i as f32;
        bodies.push(pellet(world, Vec2::new(250.0 + i, world.height * 0.25 + i * 25.0)));
    }
    bodies.push(pellet(world, Vec2::new(134.0, 20.0)));
    for row in [0.5, 0.6, 0.7, 0.8] {
        bodies.push(ghost(world, Vec2::new(260.0, world.height * row), settings));
    }

    Level { pac, bodies }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{BodyRef, Shape};
    use crate::sim::dispatch::Dispatcher;
    use crate::sim::testing::ScriptedEngine;

    fn scene() -> Scene<ScriptedEngine> {
        Scene::new(ScriptedEngine::new(), GameWorld::new(400.0, 400.0))
    }

    fn add(scene: &mut Scene<ScriptedEngine>, spawn: Spawn<Scene<ScriptedEngine>>) -> Dispatcher<Scene<ScriptedEngine>> {
        let category = spawn.desc.category;
        let id = scene.engine.add_body(spawn.desc);
        Dispatcher::new(BodyRef::new(id, category), spawn.handlers)
    }

    #[test]
    fn test_ghost_survives_soft_wall_hit() {
        let settings = Settings::default();
        let mut scene = scene();
        let world = scene.world;
        let ghost = add(&mut scene, ghost(&world, Vec2::new(100.0, 100.0), &settings));
        let wall = add(&mut scene, wall(Vec2::ZERO, 10.0, 10.0, &settings));
        let (g, w) = (ghost.owner().id, wall.owner().id);

        scene.engine.set_velocity(g, Vec2::new(3.0, 4.0)); // speed 5, not above
        let event = scene.engine.event(&[(g, w)]);
        assert!(ghost.dispatch(&mut scene, &event));
        assert!(scene.engine.contains(g));
    }

    #[test]
    fn test_ghost_despawns_on_hard_wall_hit() {
        let settings = Settings::default();
        let mut scene = scene();
        let world = scene.world;
        let ghost = add(&mut scene, ghost(&world, Vec2::new(100.0, 100.0), &settings));
        let wall = add(&mut scene, wall(Vec2::ZERO, 10.0, 10.0, &settings));
        let (g, w) = (ghost.owner().id, wall.owner().id);

        scene.engine.set_velocity(g, Vec2::new(6.0, 0.0));
        let event = scene.engine.event(&[(w, g)]);
        ghost.dispatch(&mut scene, &event);
        assert!(!scene.engine.contains(g));
    }

    #[test]
    fn test_wall_flashes_on_ghost() {
        let settings = Settings::default();
        let mut scene = scene();
        let world = scene.world;
        let ghost = add(&mut scene, ghost(&world, Vec2::new(100.0, 100.0), &settings));
        let wall = add(&mut scene, wall(Vec2::ZERO, 10.0, 10.0, &settings));
        let (g, w) = (ghost.owner().id, wall.owner().id);

        let event = scene.engine.event(&[(w, g)]);
        wall.dispatch(&mut scene, &event);
        let style = scene.engine.style(w).unwrap();
        assert_eq!(style.fill, COLOR_BLUE_FLASH);
        assert_eq!(style.stroke.as_deref(), Some(COLOR_WHITE));
        assert_eq!(scene.flashes()[0].ticks_left, settings.wall_flash_ticks);
    }

    #[test]
    fn test_pac_boosts_on_pellet() {
        let settings = Settings::default();
        let mut scene = scene();
        let world = scene.world;
        let pac = add(&mut scene, pac(&world, Vec2::new(10.0, 10.0), &settings));
        let pellet = add(&mut scene, pellet(&world, Vec2::new(12.0, 10.0)));
        let (p, d) = (pac.owner().id, pellet.owner().id);

        scene.engine.set_velocity(p, Vec2::new(2.0, 0.0));
        let event = scene.engine.event(&[(p, d)]);
        pac.dispatch(&mut scene, &event);
        pellet.dispatch(&mut scene, &event);

        let boosted = scene.engine.velocity(p).unwrap();
        assert!((boosted.x - 2.0 * 4.0 * 0.35).abs() < 1e-5);
        assert!(!scene.engine.contains(d));
    }

    #[test]
    fn test_pellet_ignores_ghosts() {
        let settings = Settings::default();
        let mut scene = scene();
        let world = scene.world;
        let pellet = add(&mut scene, pellet(&world, Vec2::new(12.0, 10.0)));
        let ghost = add(&mut scene, ghost(&world, Vec2::new(10.0, 10.0), &settings));

        let event = scene.engine.event(&[(ghost.owner().id, pellet.owner().id)]);
        assert!(!pellet.dispatch(&mut scene, &event));
        assert!(scene.engine.contains(pellet.owner().id));
    }

    #[test]
    fn test_board_walls_cover_edges() {
        let world = GameWorld::new(400.0, 400.0);
        let walls = board::<ScriptedEngine>(&world, &Settings::default());
        assert_eq!(walls.len(), 4);
        assert!(walls.iter().all(|w| w.desc.is_static && w.desc.category == Category::Wall));
        assert_eq!(walls[0].desc.shape, Shape::Rect { width: 404.0, height: 4.0 });
        assert_eq!(walls[3].desc.position, Vec2::new(200.0, 400.0));
    }

    #[test]
    fn test_level_layout() {
        let world = GameWorld::new(400.0, 400.0);
        let level = level::<ScriptedEngine>(&world, &Settings::default());
        assert_eq!(level.pac.desc.position, Vec2::new(6.0, 300.0));
        let count = |c: Category| level.bodies.iter().filter(|b| b.desc.category == c).count();
        assert_eq!(count(Category::Pellet), 9);
        assert_eq!(count(Category::Ghost), 4);
        assert!(level
            .bodies
            .iter()
            .filter(|b| b.desc.category == Category::Pellet)
            .all(|b| b.desc.is_sensor));
    }
}
