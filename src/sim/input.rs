//! Held-key tracking and key-to-force mapping

use std::collections::{HashMap, HashSet};

use glam::Vec2;

pub use super::vector::Direction;
use super::vector::{add, scale};

/// A key the game cares about
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Kills the controlled body's velocity while held
    Stop,
    /// Any other key, kept so held state stays faithful
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            " " | "Spacebar" => Key::Stop,
            other => Key::Other(other.to_string()),
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            Key::Stop | Key::Other(_) => None,
        }
    }
}

impl From<Direction> for Key {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Key::Up,
            Direction::Down => Key::Down,
            Direction::Left => Key::Left,
            Direction::Right => Key::Right,
        }
    }
}

/// Keys currently held down.
///
/// Updated by key-down/key-up events and read once per tick. Keys stay held
/// until released.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<Key>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: &Key) {
        self.held.remove(key);
    }

    pub fn is_held(&self, key: &Key) -> bool {
        self.held.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Held movement directions, in [`Direction::ALL`] order
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(|d| self.held.contains(&Key::from(*d)))
    }
}

/// Direction to force mapping, fixed at configuration time.
///
/// Lookups of a direction without an entry return the fallback vector.
#[derive(Debug, Clone)]
pub struct DirectionTable {
    entries: HashMap<Direction, Vec2>,
    fallback: Vec2,
}

impl Default for DirectionTable {
    fn default() -> Self {
        Self::unit()
    }
}

impl DirectionTable {
    /// Empty table; every lookup yields `fallback`
    pub fn empty(fallback: Vec2) -> Self {
        Self {
            entries: HashMap::new(),
            fallback,
        }
    }

    /// Screen-space unit vectors for all four directions, zero fallback
    pub fn unit() -> Self {
        Direction::ALL
            .into_iter()
            .fold(Self::empty(Vec2::ZERO), |table, d| table.with(d, d.unit()))
    }

    pub fn with(mut self, direction: Direction, force: Vec2) -> Self {
        self.entries.insert(direction, force);
        self
    }

    pub fn get(&self, direction: Direction) -> Vec2 {
        self.entries.get(&direction).copied().unwrap_or(self.fallback)
    }
}

/// What the controlled body should do this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCommand {
    /// Zero the velocity immediately, no force this tick
    Stop,
    /// Apply this force (may be zero)
    Push(Vec2),
}

/// Sum `table[dir] * magnitude` over every held direction.
///
/// Non-directional keys are ignored. Diagonals are not normalized, so two
/// perpendicular keys push `sqrt(2)` times harder than one.
pub fn compute_input_force(held: &KeyState, table: &DirectionTable, magnitude: f32) -> Vec2 {
    held.directions().fold(Vec2::ZERO, |force, direction| {
        add(force, scale(table.get(direction), magnitude))
    })
}

/// Reduce held keys to a command; the stop key overrides movement
pub fn resolve_input(held: &KeyState, table: &DirectionTable, magnitude: f32) -> InputCommand {
    if held.is_held(&Key::Stop) {
        InputCommand::Stop
    } else {
        InputCommand::Push(compute_input_force(held, table, magnitude))
    }
}
