//! 2D Vector
//!
//! Positions in the dish are continuous screen coordinates. Headings are
//! kept in degrees, counter-clockwise from +X, matching what the renderer
//! consumes.

use std::fmt;
use std::ops::{Add, Sub};
use serde::{Serialize, Deserialize};

/// 2D vector / point in dish coordinates.
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

impl Vec2 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `degrees`.
    #[inline]
    pub fn from_degrees(degrees: f64) -> Self {
        let rad = degrees.to_radians();
        Self {
            x: rad.cos(),
            y: rad.sin(),
        }
    }

    /// Scale by a scalar.
    #[inline]
    pub fn scale(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Heading in degrees from `self` toward `target`, in (-180, 180].
    #[inline]
    pub fn degrees_to(self, target: Self) -> f64 {
        (target.y - self.y).atan2(target.x - self.x).to_degrees()
    }

    /// Point `units` away from `self` along `degrees`.
    #[inline]
    pub fn step(self, degrees: f64, units: f64) -> Self {
        self + Self::from_degrees(degrees).scale(units)
    }
}

/// Wrap an angle into [0, 360).
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl fmt::Debug for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vec2({:.3}, {:.3})", self.x, self.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_vec2_add_sub() {
        let a = Vec2::new(3.0, 4.0);
        let b = Vec2::new(1.0, 2.0);
        assert_eq!(a + b, Vec2::new(4.0, 6.0));
        assert_eq!(a - b, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_vec2_distance() {
        let a = Vec2::ZERO;
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_vec2_step() {
        let origin = Vec2::new(10.0, 10.0);

        let east = origin.step(0.0, 3.0);
        assert!((east.x - 13.0).abs() < EPS);
        assert!((east.y - 10.0).abs() < EPS);

        let north = origin.step(90.0, 2.0);
        assert!((north.x - 10.0).abs() < EPS);
        assert!((north.y - 12.0).abs() < EPS);
    }

    #[test]
    fn test_vec2_degrees_to() {
        let origin = Vec2::ZERO;
        assert!((origin.degrees_to(Vec2::new(1.0, 0.0)) - 0.0).abs() < EPS);
        assert!((origin.degrees_to(Vec2::new(0.0, 1.0)) - 90.0).abs() < EPS);
        assert!((origin.degrees_to(Vec2::new(-1.0, 0.0)) - 180.0).abs() < EPS);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(365.0), 5.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(720.0 + 45.0), 45.0);
    }
}
