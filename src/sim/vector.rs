//! Force and velocity vector helpers
//!
//! Small pure functions over [`Vec2`] used to build, combine and bound the
//! vectors handed to the engine. Screen coordinates: +y points down.

use glam::Vec2;

/// Cardinal movement intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector for this direction in screen space
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Multiply both components by `factor`
#[inline]
pub fn scale(vector: Vec2, factor: f32) -> Vec2 {
    vector * factor
}

/// Componentwise sum
#[inline]
pub fn add(a: Vec2, b: Vec2) -> Vec2 {
    a + b
}

/// Euclidean norm
#[inline]
pub fn magnitude(vector: Vec2) -> f32 {
    vector.length()
}

/// Cap each axis independently to `[-limit, limit]`, keeping its sign.
///
/// This is not a magnitude clamp: a diagonal vector can come out with a
/// length of up to `limit * sqrt(2)`. Components already within the limit
/// are returned untouched.
pub fn clamp_components(vector: Vec2, limit: f32) -> Vec2 {
    Vec2::new(clamp_axis(vector.x, limit), clamp_axis(vector.y, limit))
}

#[inline]
fn clamp_axis(component: f32, limit: f32) -> f32 {
    if component.abs() > limit {
        component.signum() * limit
    } else {
        component
    }
}
