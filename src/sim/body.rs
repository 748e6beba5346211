//! Body identity, categories and creation descriptors

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable identifier handed out by the engine when a body is added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Body category, the key used to pick a collision handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Static boundary
    Wall,
    /// Player-controlled ball
    Pac,
    /// Consumable sensor dot
    Pellet,
    /// Free-roaming hazard
    Ghost,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Wall => "wall",
            Category::Pac => "pac",
            Category::Pellet => "pellet",
            Category::Ghost => "ghost",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A body as seen from a collision event: identity plus category.
///
/// The category is captured when the event is produced so a reference stays
/// meaningful after the body has left the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyRef {
    pub id: BodyId,
    pub category: Category,
}

impl BodyRef {
    pub fn new(id: BodyId, category: Category) -> Self {
        Self { id, category }
    }
}

/// Render fields the renderer reads and collision handlers may tweak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub fill: String,
    pub stroke: Option<String>,
    pub line_width: f32,
}

impl RenderStyle {
    pub fn filled(fill: &str) -> Self {
        Self {
            fill: fill.to_string(),
            stroke: None,
            line_width: 0.0,
        }
    }
}

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

/// Everything the engine needs to create a body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDesc {
    pub category: Category,
    pub position: Vec2,
    pub shape: Shape,
    /// Immovable body
    pub is_static: bool,
    /// Reports contacts but produces no collision response
    pub is_sensor: bool,
    pub restitution: f32,
    /// Fraction of velocity lost per tick to air drag
    pub friction_air: f32,
    pub density: f32,
    pub style: RenderStyle,
}

impl BodyDesc {
    pub fn circle(category: Category, position: Vec2, radius: f32) -> Self {
        Self::new(category, position, Shape::Circle { radius })
    }

    pub fn rect(category: Category, position: Vec2, width: f32, height: f32) -> Self {
        Self::new(category, position, Shape::Rect { width, height })
    }

    fn new(category: Category, position: Vec2, shape: Shape) -> Self {
        Self {
            category,
            position,
            shape,
            is_static: false,
            is_sensor: false,
            restitution: 0.0,
            friction_air: 0.01,
            density: 0.001,
            style: RenderStyle::filled(crate::consts::COLOR_WHITE),
        }
    }

    pub fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }

    pub fn restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn friction_air(mut self, friction_air: f32) -> Self {
        self.friction_air = friction_air;
        self
    }

    pub fn density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn style(mut self, style: RenderStyle) -> Self {
        self.style = style;
        self
    }
}
