//! Game tuning and preferences
//!
//! Persisted as JSON: LocalStorage on the web, a file in the working
//! directory natively. The defaults are written out on first run.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable knobs for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Play field ===
    pub world_width: f32,
    pub world_height: f32,

    // === Controls (multiples of the world unit) ===
    /// Push strength per held arrow key
    pub acceleration_factor: f32,
    /// Per-axis speed cap
    pub max_speed_factor: f32,
    /// Pac air drag as a fraction of acceleration
    pub friction_factor: f32,

    // === Gameplay ===
    pub ghost_despawn_speed: f32,
    pub pellet_boost_factor: f32,
    pub wall_flash_ticks: u32,

    // === Telemetry ===
    pub telemetry: bool,
    pub telemetry_threshold: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,

            acceleration_factor: 0.7,
            max_speed_factor: 4.0,
            friction_factor: 0.01,

            ghost_despawn_speed: GHOST_DESPAWN_SPEED,
            pellet_boost_factor: PELLET_BOOST_FACTOR,
            wall_flash_ticks: WALL_FLASH_TICKS,

            telemetry: true,
            telemetry_threshold: TELEMETRY_SPEED_THRESHOLD,
        }
    }
}

/// Primary control variables derived from settings and world size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlValues {
    pub acceleration: f32,
    pub max_speed: f32,
    pub friction: f32,
}

impl Settings {
    /// Length unit everything scales with (1% of the field width)
    pub fn unit(&self) -> f32 {
        self.world_width / 100.0
    }

    pub fn control_values(&self) -> ControlValues {
        let unit = self.unit();
        let acceleration = unit * self.acceleration_factor;
        ControlValues {
            acceleration,
            max_speed: unit * self.max_speed_factor,
            friction: acceleration * self.friction_factor,
        }
    }

    /// Parse settings, falling back to defaults for missing fields.
    /// Malformed input is logged and yields `None`.
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                None
            }
        }
    }

    /// LocalStorage key (used only in wasm32)
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "physics_toys_settings";
    /// Settings file name (native only)
    #[cfg(not(target_arch = "wasm32"))]
    const SETTINGS_FILE: &'static str = "physics_toys.json";

    /// Load settings from LocalStorage, storing the defaults on first run
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok()).flatten() else {
            log::info!("No LocalStorage, using default settings");
            return Self::default();
        };

        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Self::from_json(&json).unwrap_or_default(),
            _ => {
                let settings = Self::default();
                settings.save();
                settings
            }
        }
    }

    /// Write settings to LocalStorage
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok()).flatten() else {
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings stored under {}", Self::STORAGE_KEY),
                Err(e) => log::warn!("Failed to store settings: {:?}", e),
            },
            Err(e) => log::warn!("Failed to encode settings: {}", e),
        }
    }

    /// Load `physics_toys.json` from the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(std::path::Path::new(Self::SETTINGS_FILE))
    }

    /// Load settings from `path`.
    ///
    /// A missing file is created with the defaults so they can be edited. An
    /// unreadable or malformed file is left alone and the defaults are used.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Some(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                None => Self::default(),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("{} not found, writing defaults", path.display());
                let settings = Self::default();
                settings.save_to(path);
                settings
            }
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write `physics_toys.json` in the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        self.save_to(std::path::Path::new(Self::SETTINGS_FILE));
    }

    /// Write settings to `path` as pretty JSON
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => match std::fs::write(path, json) {
                Ok(()) => log::info!("Settings saved to {}", path.display()),
                Err(e) => log::warn!("Failed to write {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Failed to encode settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_control_values() {
        let values = Settings::default().control_values();
        assert!((values.acceleration - 2.8).abs() < 1e-5);
        assert!((values.max_speed - 16.0).abs() < 1e-5);
        assert!((values.friction - 0.028).abs() < 1e-5);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "world_width": 800.0, "telemetry": false }"#)
            .expect("valid settings");
        assert_eq!(settings.world_width, 800.0);
        assert!(!settings.telemetry);
        assert_eq!(settings.world_height, WORLD_HEIGHT);
        assert_eq!(settings.unit(), 8.0);
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(Settings::from_json("{ not json").is_none());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("settings.json");
        let settings = Settings {
            world_width: 640.0,
            wall_flash_ticks: 30,
            telemetry: false,
            ..Default::default()
        };

        settings.save_to(&path);
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("settings.json");

        assert_eq!(Settings::load_from(&path), Settings::default());
        let written = std::fs::read_to_string(&path).expect("defaults written");
        assert_eq!(Settings::from_json(&written), Some(Settings::default()));
    }

    #[test]
    fn test_malformed_file_falls_back_untouched() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").expect("write fixture");

        assert_eq!(Settings::load_from(&path), Settings::default());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }
}
