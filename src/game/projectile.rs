//! Projectiles
//!
//! Sprays and flames fly straight, one sprite width per tick, and spend
//! themselves on the first thing they touch.

use serde::{Serialize, Deserialize};

use crate::core::dish::SPRITE_WIDTH;
use crate::game::bacterium;
use crate::game::entity::{Damageable, Entity, EntityId, EntityKind};
use crate::game::query::find_damageable_overlap;
use crate::game::state::WorldState;

/// Distance a projectile covers per tick.
pub const PROJECTILE_STEP: f64 = SPRITE_WIDTH;

/// Projectile kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ProjectileKind {
    /// Long range, light damage
    Spray = 0,
    /// Short range, heavy damage
    Flame = 1,
}

impl ProjectileKind {
    /// Total distance before the projectile fizzles.
    #[inline]
    pub fn max_travel(self) -> i32 {
        match self {
            ProjectileKind::Spray => 112,
            ProjectileKind::Flame => 32,
        }
    }

    /// Hit points removed from the target.
    #[inline]
    pub fn damage(self) -> i32 {
        match self {
            ProjectileKind::Spray => 2,
            ProjectileKind::Flame => 5,
        }
    }
}

/// Per-projectile data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectileState {
    /// Kind
    pub kind: ProjectileKind,
    /// Distance budget left
    pub remaining_travel: i32,
}

impl ProjectileState {
    /// Fresh projectile with a full budget.
    pub fn new(kind: ProjectileKind) -> Self {
        Self {
            kind,
            remaining_travel: kind.max_travel(),
        }
    }
}

/// Run one tick for a projectile: hit, advance, or fizzle.
pub fn act_projectile(entity: &mut Entity, world: &mut WorldState) {
    let EntityKind::Projectile(mut projectile) = entity.kind else {
        return;
    };

    if let Some(target) = find_damageable_overlap(world, entity.position) {
        apply_damage(world, target, projectile.kind.damage());
        entity.set_dead();
    } else if projectile.remaining_travel > 0 {
        entity.position = entity.position.step(entity.direction, PROJECTILE_STEP);
        projectile.remaining_travel -= PROJECTILE_STEP as i32;
        entity.kind = EntityKind::Projectile(projectile);
    } else {
        entity.set_dead();
    }
}

/// Remove `amount` hit points from registry entity `target`.
///
/// Bacteria react (hurt cue, or death cue, score and food drop); other
/// destructibles simply die.
pub fn apply_damage(world: &mut WorldState, target: EntityId, amount: i32) {
    let Some(entity) = world.entities.get_mut(&target) else {
        return;
    };
    let outcome = entity.adjust_hit_points(-amount);
    let position = entity.position;
    let bacterium_kind = entity.as_bacterium().map(|b| b.kind);

    if let Some(kind) = bacterium_kind {
        bacterium::on_damaged(world, target, kind, position, outcome);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::bacterium::BacteriumKind;
    use crate::game::config::WorldConfig;
    use crate::game::state::Scoreboard;

    fn empty_world() -> WorldState {
        let config = WorldConfig::default();
        WorldState::new(config.seed, Scoreboard::default(), &config.player)
    }

    fn act(world: &mut WorldState, id: EntityId) {
        let mut entity = world.entities.remove(&id).unwrap();
        act_projectile(&mut entity, world);
        world.entities.insert(id, entity);
    }

    #[test]
    fn test_spray_range() {
        let mut world = empty_world();
        let id = world.spawn_projectile(ProjectileKind::Spray, Vec2::new(20.0, 128.0), 0.0);

        // 112 / 16 = 7 advances, then fizzle on the 8th tick
        for _ in 0..7 {
            act(&mut world, id);
            assert!(world.entities[&id].alive);
        }
        assert!((world.entities[&id].position.x - 132.0).abs() < 1e-9);

        act(&mut world, id);
        assert!(!world.entities[&id].alive);
    }

    #[test]
    fn test_two_sprays_kill_regular_salmonella() {
        let mut world = empty_world();
        let target = world.spawn_bacterium(BacteriumKind::RegularSalmonella, Vec2::new(128.0, 128.0));
        let first = world.spawn_projectile(ProjectileKind::Spray, Vec2::new(120.0, 128.0), 0.0);
        let second = world.spawn_projectile(ProjectileKind::Spray, Vec2::new(120.0, 128.0), 0.0);

        act(&mut world, first);
        assert!(!world.entities[&first].alive);
        assert_eq!(world.entities[&target].hit_points, 2);
        assert!(world.entities[&target].alive);

        act(&mut world, second);
        assert!(!world.entities[&second].alive);
        assert!(!world.entities[&target].alive);
        assert_eq!(world.scoreboard.score, 100);
    }

    #[test]
    fn test_one_target_per_projectile() {
        let mut world = empty_world();
        let a = world.spawn_bacterium(BacteriumKind::AggressiveSalmonella, Vec2::new(128.0, 128.0));
        let b = world.spawn_bacterium(BacteriumKind::AggressiveSalmonella, Vec2::new(130.0, 128.0));
        let flame = world.spawn_projectile(ProjectileKind::Flame, Vec2::new(129.0, 128.0), 0.0);

        act(&mut world, flame);
        assert_eq!(world.entities[&a].hit_points, 5);
        assert_eq!(world.entities[&b].hit_points, 10);
    }

    #[test]
    fn test_spray_destroys_dirt() {
        let mut world = empty_world();
        let dirt = world.spawn_dirt(Vec2::new(128.0, 128.0));
        let spray = world.spawn_projectile(ProjectileKind::Spray, Vec2::new(120.0, 128.0), 0.0);

        act(&mut world, spray);
        assert!(!world.entities[&dirt].alive);
        assert_eq!(world.scoreboard.score, 0);
    }
}
