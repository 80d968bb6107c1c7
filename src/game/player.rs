//! Player Controller
//!
//! The player walks the rim and fires inward. Health changes go through
//! `adjust_player_health` so the clamp and cues are applied in one place.

use crate::core::dish::SPRITE_WIDTH;
use crate::game::entity::{Damageable, HitOutcome};
use crate::game::events::{Cue, GameEventData};
use crate::game::input::Command;
use crate::game::projectile::ProjectileKind;
use crate::game::state::WorldState;

/// Degrees walked per rotate command.
pub const ROTATE_STEP: f64 = 5.0;

/// Projectiles spawn this far in front of the player.
pub const MUZZLE_OFFSET: f64 = SPRITE_WIDTH;

/// Flames per flamethrower burst.
pub const FLAME_COUNT: u32 = 16;

/// Angle between adjacent flames in a burst.
pub const FLAME_SPREAD: f64 = 22.5;

/// Apply this tick's command, or recharge the sprayer when idle.
pub fn act_player(world: &mut WorldState, input: Option<Command>) {
    if !world.player.alive {
        return;
    }

    match input {
        Some(Command::RotateLeft) => {
            let angle = world.player.position_angle + ROTATE_STEP;
            world.player.move_to_angle(angle);
        }
        Some(Command::RotateRight) => {
            let angle = world.player.position_angle - ROTATE_STEP;
            world.player.move_to_angle(angle);
        }
        Some(Command::FireSpray) => fire_spray(world),
        Some(Command::FireFlame) => fire_flames(world),
        None => world.player.add_sprays(1),
    }
}

fn fire_spray(world: &mut WorldState) {
    if world.player.sprays == 0 {
        return;
    }
    let direction = world.player.direction;
    let muzzle = world.player.position.step(direction, MUZZLE_OFFSET);
    world.spawn_projectile(ProjectileKind::Spray, muzzle, direction);
    world.player.sprays -= 1;
    world.emit_cue(Cue::PlayerSpray);
}

fn fire_flames(world: &mut WorldState) {
    if world.player.flames == 0 {
        return;
    }
    let (origin, facing) = (world.player.position, world.player.direction);
    for i in 0..FLAME_COUNT {
        let heading = facing + i as f64 * FLAME_SPREAD;
        world.spawn_projectile(ProjectileKind::Flame, origin.step(heading, MUZZLE_OFFSET), heading);
    }
    world.player.flames -= 1;
    world.emit_cue(Cue::PlayerFire);
}

/// Change player health by `delta`.
///
/// Survivable damage plays the hurt cue. A lethal change only marks the
/// player dead; the world reports the death (and its cue) on the next
/// player step.
pub fn adjust_player_health(world: &mut WorldState, delta: i32) -> HitOutcome {
    let outcome = world.player.adjust_hit_points(delta);

    if delta < 0 && outcome != HitOutcome::AlreadyDead {
        if outcome == HitOutcome::Survived {
            world.emit_cue(Cue::PlayerHurt);
        }
        world.push_event(GameEventData::PlayerDamaged {
            amount: -delta,
            health: world.player.hit_points,
        });
    }
    outcome
}

// =============================================================================
// TESTS
// =============================================================================
