//! 2D geometry helpers shared by the detectors

use serde::{Deserialize, Serialize};

/// 2D point. Landmark coordinates are normalized to [0,1]x[0,1];
/// head-position tracking converts to pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between two points
    pub fn midpoint(&self, other: Point2) -> Point2 {
        Point2 {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Scale normalized coordinates into pixel space
    pub fn to_pixels(&self, width: u32, height: u32) -> Point2 {
        Point2 {
            x: self.x * width as f32,
            y: self.y * height as f32,
        }
    }
}

/// Angle in degrees between the vector `from -> to` and the vertical axis,
/// using only the vertical component's magnitude: `acos(|dy| / |v|)`.
///
/// A zero-length vector yields 0 (degenerate geometry degrades to neutral).
pub fn angle_from_vertical_deg(from: Point2, to: Point2) -> f32 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let magnitude = (dx * dx + dy * dy).sqrt();
    if magnitude <= f32::EPSILON {
        return 0.0;
    }
    let cos_angle = (dy.abs() / magnitude).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_midpoint() {
        let a = Point2::new(0.2, 0.4);
        let b = Point2::new(0.6, 0.8);
        let m = a.midpoint(b);
        assert!((m.x - 0.4).abs() < 1e-6);
        assert!((m.y - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_angle_vertical_body() {
        // Hip directly below shoulder: perfectly vertical
        let angle = angle_from_vertical_deg(Point2::new(0.5, 0.3), Point2::new(0.5, 0.7));
        assert!(angle.abs() < 1e-3);
    }

    #[test]
    fn test_angle_horizontal_body() {
        // Hip directly sideways from shoulder: 90 degrees from vertical
        let angle = angle_from_vertical_deg(Point2::new(0.3, 0.5), Point2::new(0.7, 0.5));
        assert!((angle - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_angle_degenerate_vector() {
        let p = Point2::new(0.5, 0.5);
        assert_eq!(angle_from_vertical_deg(p, p), 0.0);
    }
}
