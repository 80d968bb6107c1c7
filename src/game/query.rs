//! Spatial Queries
//!
//! Proximity tests over the registry. Everything is a linear scan in id
//! order, so "first" always means "oldest".
//!
//! Hit-point overlap considers entities killed earlier in the same tick
//! (they are still in the registry until reaped), so a corpse can absorb a
//! shot. Food queries only see live food, so one item is never eaten twice.

use crate::core::dish::{is_inside_dish, SPRITE_RADIUS, SPRITE_WIDTH};
use crate::core::vec2::{Vec2, normalize_degrees};
use crate::game::entity::EntityId;
use crate::game::state::WorldState;

/// Two objects touch when their centers are at most this far apart.
pub const CONTACT_DISTANCE: f64 = SPRITE_WIDTH;

/// How far a salmonella can smell food.
pub const FOOD_SENSE_RADIUS: f64 = 128.0;

/// Whole-degree heading from `from` toward `to`, in [0, 360).
///
/// Fractions are truncated toward zero before wrapping.
#[inline]
pub fn heading_between(from: Vec2, to: Vec2) -> f64 {
    normalize_degrees(from.degrees_to(to).trunc())
}

/// First bacterium in contact with `position`, else the first destructible
/// object in contact.
pub fn find_damageable_overlap(world: &WorldState, position: Vec2) -> Option<EntityId> {
    let in_contact = |p: Vec2| p.distance(position) <= CONTACT_DISTANCE;

    world
        .entities
        .values()
        .find(|e| e.is_bacterium() && in_contact(e.position))
        .or_else(|| {
            world
                .entities
                .values()
                .find(|e| e.is_destructible() && in_contact(e.position))
        })
        .map(|e| e.id)
}

/// Is `position` in contact with the player?
#[inline]
pub fn overlaps_player(world: &WorldState, position: Vec2) -> bool {
    world.player.position.distance(position) <= CONTACT_DISTANCE
}

/// Eat the first live food in contact with `position`.
///
/// The food is marked dead immediately; its id is returned.
pub fn consume_food_at(world: &mut WorldState, position: Vec2) -> Option<EntityId> {
    let food = world
        .entities
        .values_mut()
        .find(|e| e.alive && e.is_food() && e.position.distance(position) <= CONTACT_DISTANCE)?;
    food.set_dead();
    Some(food.id)
}

/// Heading toward the first live food within smelling range.
pub fn nearby_food_direction(world: &WorldState, position: Vec2) -> Option<f64> {
    world
        .entities
        .values()
        .find(|e| e.alive && e.is_food() && e.position.distance(position) <= FOOD_SENSE_RADIUS)
        .map(|food| heading_between(position, food.position))
}

/// Heading toward the player if they are within `radius`.
pub fn player_direction_within(world: &WorldState, position: Vec2, radius: f64) -> Option<f64> {
    let player = world.player.position;
    if player.distance(position) <= radius {
        Some(heading_between(position, player))
    } else {
        None
    }
}

/// Can a bacterium not stand at `point`?
///
/// True outside the dish or within half a sprite of a movement blocker.
pub fn is_movement_blocked(world: &WorldState, point: Vec2) -> bool {
    if !is_inside_dish(point) {
        return true;
    }
    world
        .entities
        .values()
        .any(|e| e.blocks_movement() && e.position.distance(point) <= SPRITE_RADIUS)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::bacterium::BacteriumKind;
    use crate::game::config::WorldConfig;
    use crate::game::entity::Damageable;
    use crate::game::state::{Scoreboard, WorldState};

    fn empty_world() -> WorldState {
        let config = WorldConfig::default();
        WorldState::new(config.seed, Scoreboard::default(), &config.player)
    }

    #[test]
    fn test_heading_between() {
        let origin = Vec2::new(100.0, 100.0);
        assert_eq!(heading_between(origin, Vec2::new(110.0, 100.0)), 0.0);
        assert_eq!(heading_between(origin, Vec2::new(100.0, 110.0)), 90.0);
        assert_eq!(heading_between(origin, Vec2::new(100.0, 90.0)), 270.0);
        // atan2(1, 2) = 26.56°, truncated
        assert_eq!(heading_between(origin, Vec2::new(102.0, 101.0)), 26.0);
    }

    #[test]
    fn test_bacterium_preferred_over_destructible() {
        let mut world = empty_world();
        let dirt = world.spawn_dirt(Vec2::new(100.0, 100.0));
        let bacterium = world.spawn_bacterium(BacteriumKind::RegularSalmonella, Vec2::new(110.0, 100.0));

        let probe = Vec2::new(105.0, 100.0);
        assert_eq!(find_damageable_overlap(&world, probe), Some(bacterium));

        world.entities.remove(&bacterium);
        assert_eq!(find_damageable_overlap(&world, probe), Some(dirt));

        assert_eq!(find_damageable_overlap(&world, Vec2::new(200.0, 200.0)), None);
    }

    #[test]
    fn test_corpse_still_absorbs_hits() {
        let mut world = empty_world();
        let id = world.spawn_bacterium(BacteriumKind::Ecoli, Vec2::new(100.0, 100.0));
        world.entities.get_mut(&id).unwrap().adjust_hit_points(-10);

        assert_eq!(find_damageable_overlap(&world, Vec2::new(100.0, 110.0)), Some(id));
    }

    #[test]
    fn test_food_not_counted_as_damageable() {
        let mut world = empty_world();
        world.spawn_food(Vec2::new(100.0, 100.0));
        assert_eq!(find_damageable_overlap(&world, Vec2::new(100.0, 100.0)), None);
    }

    #[test]
    fn test_consume_food_once() {
        let mut world = empty_world();
        let food = world.spawn_food(Vec2::new(100.0, 100.0));
        let probe = Vec2::new(100.0, 116.0);

        assert_eq!(consume_food_at(&mut world, probe), Some(food));
        assert!(!world.entities[&food].alive);
        assert_eq!(consume_food_at(&mut world, probe), None);
    }

    #[test]
    fn test_nearby_food_direction() {
        let mut world = empty_world();
        world.spawn_food(Vec2::new(200.0, 128.0));

        assert_eq!(nearby_food_direction(&world, Vec2::new(100.0, 128.0)), Some(0.0));
        assert_eq!(nearby_food_direction(&world, Vec2::new(60.0, 128.0)), None);
    }

    #[test]
    fn test_player_direction_within() {
        let world = empty_world();
        // Player starts on the left rim
        let y = world.player.position.y;
        assert_eq!(player_direction_within(&world, Vec2::new(50.0, y), 72.0), Some(180.0));
        assert_eq!(player_direction_within(&world, Vec2::new(80.0, y), 72.0), None);
        assert!(overlaps_player(&world, Vec2::new(16.0, y)));
        assert!(!overlaps_player(&world, Vec2::new(17.0, y)));
    }

    #[test]
    fn test_movement_blocked() {
        let mut world = empty_world();
        world.spawn_dirt(Vec2::new(100.0, 100.0));

        assert!(is_movement_blocked(&world, Vec2::new(104.0, 100.0)));
        assert!(!is_movement_blocked(&world, Vec2::new(109.0, 100.0)));
        assert!(is_movement_blocked(&world, Vec2::new(256.0, 128.0)));
        assert!(!is_movement_blocked(&world, Vec2::new(128.0, 128.0)));
    }
}
