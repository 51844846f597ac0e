//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Floats per vertex in a flat buffer
    pub const FLOATS: usize = 6;

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Flatten vertices into the interleaved `x, y, r, g, b, a` layout
pub fn as_floats(vertices: &[Vertex]) -> &[f32] {
    bytemuck::cast_slice(vertices)
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    /// Paddle gradient, top to bottom (#4ECDC4 -> #44A08D)
    pub const PADDLE_TOP: [f32; 4] = [0.306, 0.804, 0.769, 1.0];
    pub const PADDLE_BOTTOM: [f32; 4] = [0.267, 0.627, 0.553, 1.0];
    /// Ball gradient, center to rim (#FFE66D -> #FF6B6B)
    pub const BALL_CORE: [f32; 4] = [1.0, 0.902, 0.427, 1.0];
    pub const BALL_RIM: [f32; 4] = [1.0, 0.420, 0.420, 1.0];
    pub const PICKUP_GLOW: [f32; 3] = [0.0, 1.0, 0.0];
    pub const FLASH: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const EYE_SHINE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const CHEEK_SHINE: [f32; 4] = [1.0, 0.714, 0.851, 1.0];
    pub const SPRINKLE_SHINE: [f32; 4] = [1.0, 0.8, 0.796, 1.0];
    pub const RAINBOW_SPARKLE: [f32; 4] = [1.0, 1.0, 1.0, 0.3];
    pub const BORDER_SPARKLE: [f32; 4] = [0.784, 0.784, 0.784, 0.4];
    pub const GOLD_SPARKLE: [f32; 4] = [1.0, 0.843, 0.0, 0.3];
    pub const BORDER_OUTLINE: [f32; 4] = [0.125, 0.125, 0.125, 1.0];
    pub const GOLD_OUTLINE: [f32; 4] = [1.0, 0.843, 0.0, 1.0];
    pub const OUTLINE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}
