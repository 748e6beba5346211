//! Play field geometry and the mutable scene handlers work on

use serde::{Deserialize, Serialize};

use super::body::{BodyId, RenderStyle};
use super::engine::PhysicsEngine;

/// Play field dimensions and derived landmarks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameWorld {
    pub width: f32,
    pub height: f32,
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
    pub center_x: f32,
    pub center_y: f32,
    /// 1% of the width; sizes and speeds scale with it
    pub unit: f32,
}

impl GameWorld {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            top: 0.0,
            bottom: height,
            left: 0.0,
            right: width,
            center_x: width / 2.0,
            center_y: height / 2.0,
            unit: width / 100.0,
        }
    }
}

/// A pending style restoration after a timed highlight
#[derive(Debug, Clone, PartialEq)]
pub struct WallFlash {
    pub body: BodyId,
    pub original: RenderStyle,
    pub ticks_left: u32,
}

/// The engine plus per-session side state, passed to collision handlers
#[derive(Debug)]
pub struct Scene<E> {
    pub engine: E,
    pub world: GameWorld,
    flashes: Vec<WallFlash>,
}

impl<E: PhysicsEngine> Scene<E> {
    pub fn new(engine: E, world: GameWorld) -> Self {
        Self {
            engine,
            world,
            flashes: Vec::new(),
        }
    }

    /// Ask the engine to drop a body. Returns `false` if it was already gone.
    pub fn remove(&mut self, id: BodyId) -> bool {
        let removed = self.engine.remove_body(id);
        if removed {
            log::debug!("Removed {} ({} flashes pending)", id, self.flashes.len());
            self.flashes.retain(|flash| flash.body != id);
        }
        removed
    }

    /// Swap in `highlight` for `ticks` ticks, then restore the style.
    ///
    /// Re-flashing a body that is still highlighted restarts the timer but
    /// keeps the style captured by the first flash.
    pub fn flash(&mut self, id: BodyId, highlight: RenderStyle, ticks: u32) {
        let Some(style) = self.engine.style_mut(id) else {
            return;
        };
        let original = std::mem::replace(style, highlight);

        match self.flashes.iter_mut().find(|flash| flash.body == id) {
            Some(flash) => flash.ticks_left = ticks,
            None => self.flashes.push(WallFlash {
                body: id,
                original,
                ticks_left: ticks,
            }),
        }
    }

    /// Count down highlights and restore the expired ones
    pub fn advance_flashes(&mut self) {
        let mut expired = Vec::new();
        self.flashes.retain_mut(|flash| {
            flash.ticks_left = flash.ticks_left.saturating_sub(1);
            if flash.ticks_left == 0 {
                expired.push((flash.body, flash.original.clone()));
                false
            } else {
                true
            }
        });

        for (id, original) in expired {
            if let Some(style) = self.engine.style_mut(id) {
                *style = original;
            }
        }
    }

    pub fn flashes(&self) -> &[WallFlash] {
        &self.flashes
    }
}
