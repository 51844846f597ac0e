//! Pixel Breaker - a Breakout game over pixel-art brick layouts
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, layouts, game loop)
//! - `renderer`: Frame tessellation for whatever surface draws the game
//! - `pixelate`: Image to brick-grid conversion
//! - `upload`: Wire format of the image upload round trip
//! - `settings`: Data-driven game parameters

pub mod color;
pub mod error;
pub mod pixelate;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod upload;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use color::Rgb;
pub use error::{GameError, Result};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use std::f32::consts::PI;

    /// Canvas dimensions (portrait, pixels)
    pub const CANVAS_WIDTH: f32 = 600.0;
    pub const CANVAS_HEIGHT: f32 = 800.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 4.0;
    pub const BALL_SPEED: f32 = 3.0;
    /// Ball serve height above the bottom edge
    pub const BALL_SERVE_OFFSET: f32 = 50.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 300.0;
    pub const PADDLE_HEIGHT: f32 = 16.0;
    /// Distance from the bottom edge to the paddle's top
    pub const PADDLE_BOTTOM_OFFSET: f32 = 25.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Max deflection off the paddle edges (±60°)
    pub const PADDLE_MAX_ANGLE: f32 = PI / 3.0;

    /// Multi-ball
    pub const MAX_BALLS: usize = 150;
    /// Heading offset of each clone (3-way fan)
    pub const CLONE_FAN_ANGLE: f32 = 2.0 * PI / 3.0;

    /// Pickups
    pub const ITEM_DROP_CHANCE: f64 = 0.3;
    pub const ITEM_RADIUS: f32 = 8.0;
    pub const ITEM_FALL_SPEED: f32 = 1.5;

    /// Particle bursts: count, spread (px/tick), life (ticks)
    pub const BRICK_PARTICLES: usize = 8;
    pub const BRICK_PARTICLE_SPREAD: f32 = 6.0;
    pub const BRICK_PARTICLE_LIFE: u32 = 30;
    pub const SPARK_PARTICLES: usize = 6;
    pub const SPARK_PARTICLE_SPREAD: f32 = 4.0;
    pub const SPARK_PARTICLE_LIFE: u32 = 20;
    pub const COLLECT_PARTICLES: usize = 12;
    pub const COLLECT_PARTICLE_SPREAD: f32 = 8.0;
    pub const COLLECT_PARTICLE_LIFE: u32 = 40;
    pub const MAX_PARTICLES: usize = 2000;

    /// Layout geometry
    pub const LAYOUT_TOP: f32 = 50.0;
    pub const LAYOUT_WIDTH_FRACTION: f32 = 0.8;
    pub const LAYOUT_HEIGHT_FRACTION: f32 = 0.6;
    /// Spacing subtracted from each brick edge
    pub const BRICK_GAP: f32 = 1.0;
    pub const PATTERN_BRICK_WIDTH: f32 = 20.0;
    pub const PATTERN_BRICK_HEIGHT: f32 = 15.0;
    pub const PATTERN_BRICK_PADDING: f32 = 1.0;

    /// Rescaling against brick size
    pub const BALL_RADIUS_PER_BRICK: f32 = 0.3;
    pub const MIN_BALL_RADIUS: f32 = 2.0;
    pub const MAX_BALL_RADIUS: f32 = 8.0;
    pub const PADDLE_WIDTH_PER_RADIUS: f32 = 40.0;
    pub const MIN_PADDLE_WIDTH: f32 = 40.0;
    pub const MAX_PADDLE_WIDTH: f32 = 80.0;
    pub const PADDLE_HEIGHT_PER_RADIUS: f32 = 3.0;
    pub const MIN_PADDLE_HEIGHT: f32 = 8.0;
    pub const MAX_PADDLE_HEIGHT: f32 = 24.0;
    pub const SPEED_EXPONENT: f32 = 0.8;
    pub const MIN_SPEED_FACTOR: f32 = 0.5;
    pub const MAX_SPEED_FACTOR: f32 = 2.0;

    /// Nominal frame duration used for time-based effects (60 fps)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
}

/// Heading of a velocity vector (radians, canvas space: +y is down)
#[inline]
pub fn heading(vel: Vec2) -> f32 {
    vel.y.atan2(vel.x)
}

/// Velocity with the given heading and magnitude
#[inline]
pub fn from_heading(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos() * speed, angle.sin() * speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_heading_round_trip() {
        let vel = from_heading(-FRAC_PI_2, 5.0);
        assert!(vel.x.abs() < 1e-5);
        assert!((vel.y + 5.0).abs() < 1e-5);
        assert!((heading(vel) + FRAC_PI_2).abs() < 1e-5);
    }
}
