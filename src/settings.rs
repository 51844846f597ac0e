//! Game settings and tunables
//!
//! Every numeric parameter the simulation exposes. Loaded from a JSON file;
//! missing fields fall back to the defaults in `crate::consts`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};
use crate::sim::GridSize;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Canvas ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Layout ===
    /// Grid dimension used for uploaded images
    pub grid_size: GridSize,
    /// Width of the open gap in the bottom border (None = derive from grid size)
    pub bottom_gap: Option<usize>,

    // === Entities (default sizes before any rescale) ===
    pub ball_radius: f32,
    pub ball_speed: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_bottom_offset: f32,
    pub paddle_speed: f32,

    // === Power-ups ===
    /// Maximum simultaneous balls
    pub max_balls: usize,
    /// Probability that a destroyed brick drops a multiplier (0.0 - 1.0)
    pub item_drop_chance: f64,

    // === Effects ===
    pub brick_particles: usize,
    pub spark_particles: usize,
    pub collect_particles: usize,
    /// Particle budget; oldest particles are evicted beyond it
    pub max_particles: usize,

    /// RNG seed for particle spray, drops and serve direction
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            grid_size: GridSize::default(),
            bottom_gap: None,

            ball_radius: BALL_RADIUS,
            ball_speed: BALL_SPEED,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_bottom_offset: PADDLE_BOTTOM_OFFSET,
            paddle_speed: PADDLE_SPEED,

            max_balls: MAX_BALLS,
            item_drop_chance: ITEM_DROP_CHANCE,

            brick_particles: BRICK_PARTICLES,
            spark_particles: SPARK_PARTICLES,
            collect_particles: COLLECT_PARTICLES,
            max_particles: MAX_PARTICLES,

            seed: 0x5eed,
        }
    }
}

impl Settings {
    /// Default settings with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("ball_radius", self.ball_radius),
            ("ball_speed", self.ball_speed),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(GameError::InvalidSettings(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if !self.paddle_bottom_offset.is_finite() || self.paddle_bottom_offset < 0.0 {
            return Err(GameError::InvalidSettings(format!(
                "paddle_bottom_offset must not be negative, got {}",
                self.paddle_bottom_offset
            )));
        }
        if !(0.0..=1.0).contains(&self.item_drop_chance) {
            return Err(GameError::InvalidSettings(format!(
                "item_drop_chance must be within 0..=1, got {}",
                self.item_drop_chance
            )));
        }
        if self.max_balls == 0 {
            return Err(GameError::InvalidSettings("max_balls must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse and validate settings JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!(
                    "Using default settings ({}: {})",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.grid_size.cells(), 16);
        assert_eq!(settings.max_balls, MAX_BALLS);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json_str(r#"{"grid_size": 32, "max_balls": 9}"#).unwrap();
        assert_eq!(settings.grid_size.cells(), 32);
        assert_eq!(settings.max_balls, 9);
        assert_eq!(settings.ball_speed, BALL_SPEED);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Settings::from_json_str(r#"{"grid_size": 12}"#).is_err());
        assert!(Settings::from_json_str(r#"{"item_drop_chance": 1.5}"#).is_err());
        assert!(Settings::from_json_str(r#"{"ball_radius": 0.0}"#).is_err());
        assert!(Settings::from_json_str(r#"{"max_balls": 0}"#).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "pixel_breaker_settings_{}.json",
            std::process::id()
        ));
        let settings = Settings {
            bottom_gap: Some(3),
            ..Settings::with_seed(42)
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let settings = Settings::load_or_default("/nonexistent/pixel_breaker.json");
        assert_eq!(settings, Settings::default());
    }
}
