//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in canvas pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Segments used for a circle of the given radius
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 2.0) as u32).clamp(8, 32)
}

/// Filled axis-aligned rectangle
pub fn rect(pos: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    gradient_rect(pos, size, color, color)
}

/// Rectangle with a vertical gradient
pub fn gradient_rect(pos: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    vec![
        Vertex::new(x0, y0, top),
        Vertex::new(x1, y0, top),
        Vertex::new(x0, y1, bottom),
        Vertex::new(x0, y1, bottom),
        Vertex::new(x1, y0, top),
        Vertex::new(x1, y1, bottom),
    ]
}

/// Rectangle with a diagonal gradient, `start` at the top-left corner and
/// `end` at the bottom-right
pub fn diagonal_rect(pos: Vec2, size: Vec2, start: [f32; 4], mid: [f32; 4], end: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    vec![
        Vertex::new(x0, y0, start),
        Vertex::new(x1, y0, mid),
        Vertex::new(x0, y1, mid),
        Vertex::new(x0, y1, mid),
        Vertex::new(x1, y0, mid),
        Vertex::new(x1, y1, end),
    ]
}

/// Outline of a rectangle drawn inside its edges
pub fn rect_outline(pos: Vec2, size: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let w = width.min(size.x / 2.0).min(size.y / 2.0);
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(pos, Vec2::new(size.x, w), color));
    vertices.extend(rect(Vec2::new(pos.x, pos.y + size.y - w), Vec2::new(size.x, w), color));
    vertices.extend(rect(Vec2::new(pos.x, pos.y + w), Vec2::new(w, size.y - 2.0 * w), color));
    vertices.extend(rect(
        Vec2::new(pos.x + size.x - w, pos.y + w),
        Vec2::new(w, size.y - 2.0 * w),
        color,
    ));
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    radial_circle(center, radius, color, color, segments)
}

/// Filled circle blending from `inner` at the center to `outer` at the rim
pub fn radial_circle(
    center: Vec2,
    radius: f32,
    inner: [f32; 4],
    outer: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, inner));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            outer,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            outer,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_rect_covers_corners() {
        let v = rect(Vec2::new(10.0, 20.0), Vec2::new(5.0, 4.0), RED);
        assert_eq!(v.len(), 6);
        assert!(v.iter().any(|p| p.position == [10.0, 20.0]));
        assert!(v.iter().any(|p| p.position == [15.0, 24.0]));
    }

    #[test]
    fn test_circle_triangle_count() {
        assert_eq!(circle(Vec2::ZERO, 4.0, RED, 12).len(), 36);
        assert_eq!(ring(Vec2::ZERO, 2.0, 4.0, RED, 12).len(), 72);
        assert_eq!(segments_for(1.0), 8);
        assert_eq!(segments_for(100.0), 32);
    }

    #[test]
    fn test_outline_is_four_strips() {
        let v = rect_outline(Vec2::ZERO, Vec2::new(20.0, 15.0), 2.0, RED);
        assert_eq!(v.len(), 24);
        assert!(v.iter().all(|p| p.position[0] <= 20.0 && p.position[1] <= 15.0));
    }
}
