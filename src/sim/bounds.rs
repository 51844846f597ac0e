//! Axis-aligned bounds shared by every entity

use glam::Vec2;

/// Normalized bounds of a rectangle or circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub center_x: f32,
    pub center_y: f32,
    /// Set for circular entities
    pub radius: Option<f32>,
}

impl Bounds {
    /// Bounds of a rectangle given its top-left corner and size
    pub fn from_rect(pos: Vec2, size: Vec2) -> Self {
        Self {
            left: pos.x,
            right: pos.x + size.x,
            top: pos.y,
            bottom: pos.y + size.y,
            center_x: pos.x + size.x / 2.0,
            center_y: pos.y + size.y / 2.0,
            radius: None,
        }
    }

    /// Bounds of a circle (its enclosing square plus the radius)
    pub fn from_circle(center: Vec2, radius: f32) -> Self {
        Self {
            left: center.x - radius,
            right: center.x + radius,
            top: center.y - radius,
            bottom: center.y + radius,
            center_x: center.x,
            center_y: center.y,
            radius: Some(radius),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x, self.center_y)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Strict AABB overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    /// Point containment, edges inclusive
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Closest point inside the box to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left, self.right),
            p.y.clamp(self.top, self.bottom),
        )
    }
}

/// Anything that occupies space on the canvas
pub trait Boundable {
    fn bounds(&self) -> Bounds;

    fn intersects(&self, other: &dyn Boundable) -> bool {
        self.bounds().overlaps(&other.bounds())
    }

    fn contains_point(&self, p: Vec2) -> bool {
        self.bounds().contains_point(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_bounds() {
        let b = Bounds::from_rect(Vec2::new(40.0, 40.0), Vec2::new(20.0, 15.0));
        assert_eq!(b.right, 60.0);
        assert_eq!(b.bottom, 55.0);
        assert_eq!(b.center(), Vec2::new(50.0, 47.5));
        assert_eq!(b.radius, None);
    }

    #[test]
    fn test_circle_bounds() {
        let b = Bounds::from_circle(Vec2::new(10.0, 20.0), 4.0);
        assert_eq!((b.left, b.right, b.top, b.bottom), (6.0, 14.0, 16.0, 24.0));
        assert_eq!(b.radius, Some(4.0));
        assert_eq!(b.width(), 8.0);
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Bounds::from_rect(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Bounds::from_rect(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let overlapping = Bounds::from_rect(Vec2::new(9.0, 9.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&overlapping));
    }

    #[test]
    fn test_contains_point_inclusive() {
        let a = Bounds::from_rect(Vec2::ZERO, Vec2::splat(10.0));
        assert!(a.contains_point(Vec2::new(10.0, 10.0)));
        assert!(!a.contains_point(Vec2::new(10.1, 5.0)));
        assert_eq!(a.closest_point(Vec2::new(15.0, -3.0)), Vec2::new(10.0, 0.0));
    }

    struct Square(Vec2);

    impl Boundable for Square {
        fn bounds(&self) -> Bounds {
            Bounds::from_rect(self.0, Vec2::splat(10.0))
        }
    }

    #[test]
    fn test_boundable_defaults() {
        let a = Square(Vec2::ZERO);
        assert!(a.intersects(&Square(Vec2::new(9.0, 9.0))));
        assert!(!a.intersects(&Square(Vec2::new(10.0, 0.0))));
        assert!(a.contains_point(Vec2::new(0.0, 10.0)));
        assert!(!a.contains_point(Vec2::new(-0.5, 5.0)));
    }
}
