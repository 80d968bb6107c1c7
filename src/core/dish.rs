//! Dish Geometry
//!
//! Fixed dimensions of the arena and the polar helpers everything else
//! uses to place objects relative to the dish center.
//!
//! ```text
//! (0,256) ┌──────────────────────┐ (256,256)
//!         │      .-""""""-.      │
//!         │    .'          '.    │
//!         │   /   center     \   │
//!         │  |   (128,128)    |  │  radius 128
//!         │   \              /   │
//!         │    '.          .'    │
//!         │      '-......-'      │
//!   (0,0) └──────────────────────┘ (256,0)
//! ```

use super::vec2::Vec2;

/// Width of the view in world units.
pub const VIEW_WIDTH: f64 = 256.0;

/// Height of the view in world units.
pub const VIEW_HEIGHT: f64 = 256.0;

/// Radius of the dish; also where the player walks the rim.
pub const DISH_RADIUS: f64 = 128.0;

/// Center of the dish.
pub const DISH_CENTER: Vec2 = Vec2::new(VIEW_WIDTH / 2.0, VIEW_HEIGHT / 2.0);

/// One sprite width; the contact threshold for every overlap test.
pub const SPRITE_WIDTH: f64 = 16.0;

/// Half a sprite width; the movement-blocking radius.
pub const SPRITE_RADIUS: f64 = SPRITE_WIDTH / 2.0;

/// Maximum distance from center for objects placed at level start.
pub const MAX_PLACEMENT_DISTANCE: u32 = 120;

/// Point `distance` away from the dish center along `degrees`.
#[inline]
pub fn point_from_center(distance: f64, degrees: f64) -> Vec2 {
    DISH_CENTER.step(degrees, distance)
}

/// Point on the dish rim at `degrees`.
#[inline]
pub fn rim_point(degrees: f64) -> Vec2 {
    point_from_center(DISH_RADIUS, degrees)
}

/// True when `point` is strictly inside the dish boundary.
#[inline]
pub fn is_inside_dish(point: Vec2) -> bool {
    point.distance(DISH_CENTER) < DISH_RADIUS
}

/// Shift one coordinate half a sprite toward the center line.
///
/// Used to place a freshly divided bacterium next to its parent.
/// A coordinate exactly on the center line is left alone.
#[inline]
pub fn nudge_toward_center(coord: f64, center: f64) -> f64 {
    if coord < center {
        coord + SPRITE_RADIUS
    } else if coord > center {
        coord - SPRITE_RADIUS
    } else {
        coord
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_rim_point() {
        let left = rim_point(180.0);
        assert!((left.x - 0.0).abs() < EPS);
        assert!((left.y - 128.0).abs() < EPS);

        let top = rim_point(90.0);
        assert!((top.x - 128.0).abs() < EPS);
        assert!((top.y - 256.0).abs() < EPS);
    }

    #[test]
    fn test_is_inside_dish() {
        assert!(is_inside_dish(DISH_CENTER));
        assert!(is_inside_dish(point_from_center(127.0, 45.0)));
        assert!(!is_inside_dish(rim_point(0.0)));
        assert!(!is_inside_dish(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_nudge_toward_center() {
        assert_eq!(nudge_toward_center(100.0, 128.0), 108.0);
        assert_eq!(nudge_toward_center(200.0, 128.0), 192.0);
        assert_eq!(nudge_toward_center(128.0, 128.0), 128.0);
    }
}
