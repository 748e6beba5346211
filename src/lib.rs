//! Physics Toys - keyboard-driven bodies on a rapier2d play field
//!
//! Core modules:
//! - `sim`: Input-to-force mapping, collision dispatch, tick hooks
//! - `settings`: Data-driven tuning, persisted as JSON

pub mod settings;
pub mod sim;

pub use settings::{ControlValues, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per animation frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Default play field dimensions
    pub const WORLD_WIDTH: f32 = 400.0;
    pub const WORLD_HEIGHT: f32 = 400.0;

    /// Speed above which the tracked body is considered "in motion"
    pub const TELEMETRY_SPEED_THRESHOLD: f32 = 0.2;
    /// Ghosts hitting a wall faster than this are despawned
    pub const GHOST_DESPAWN_SPEED: f32 = 5.0;
    /// Pac velocity multiplier on eating a pellet (times world unit)
    pub const PELLET_BOOST_FACTOR: f32 = 0.35;
    /// Wall highlight duration (200ms at 60 Hz)
    pub const WALL_FLASH_TICKS: u32 = 12;

    /// Palette
    pub const COLOR_BLUE: &str = "#46bfee";
    pub const COLOR_BLUE_FLASH: &str = "#d3effb";
    pub const COLOR_YELLOW_DARK: &str = "#cacc00";
    pub const COLOR_YELLOW_LIGHT: &str = "#fdff33";
    pub const COLOR_RED: &str = "#d03e19";
    pub const COLOR_WHITE: &str = "#fff";
}
