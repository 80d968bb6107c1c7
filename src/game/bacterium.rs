//! Bacterium Behavior
//!
//! Three kinds share one feed/divide step and differ in how they move:
//!
//! ```text
//! RegularSalmonella:    feed/divide -> wander
//! AggressiveSalmonella: lunge at player? -> feed/divide -> wander (only if no lunge)
//! Ecoli:                feed/divide -> chase player
//! ```

use serde::{Serialize, Deserialize};

use crate::core::dish::{nudge_toward_center, DISH_CENTER};
use crate::core::vec2::{Vec2, normalize_degrees};
use crate::game::entity::{Entity, EntityId, EntityKind, HitOutcome};
use crate::game::events::{Cue, GameEventData};
use crate::game::player::adjust_player_health;
use crate::game::query::{
    consume_food_at, is_movement_blocked, nearby_food_direction, overlaps_player,
    player_direction_within,
};
use crate::game::state::WorldState;

/// Facing direction of a newly spawned bacterium.
pub const BACTERIUM_START_DIRECTION: f64 = 90.0;

/// Food a bacterium must eat before it divides.
pub const FOOD_TO_DIVIDE: u32 = 3;

/// Length of a fresh wander plan, in steps.
pub const PLAN_LENGTH: i32 = 10;

/// Salmonella step length.
pub const SALMONELLA_STEP: f64 = 3.0;

/// Aggressive salmonella notices the player within this distance.
pub const AGGRESSIVE_SIGHT: f64 = 72.0;

/// E. coli notices the player within this distance.
pub const ECOLI_SIGHT: f64 = 256.0;

/// E. coli step length.
pub const ECOLI_STEP: f64 = 2.0;

/// E. coli gives up after this many blocked headings.
pub const ECOLI_ATTEMPTS: u32 = 10;

/// Heading change between E. coli attempts.
pub const ECOLI_TURN: f64 = 10.0;

/// Points for killing any bacterium.
pub const KILL_SCORE: i64 = 100;

// =============================================================================
// KINDS
// =============================================================================

/// Bacterium kind. Immutable for the bacterium's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BacteriumKind {
    /// Slow wanderer, weak bite
    RegularSalmonella = 0,
    /// Lunges at a nearby player
    AggressiveSalmonella = 1,
    /// Chases the player across the dish
    Ecoli = 2,
}

/// Which sprite and sound set a kind uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BacteriumFamily {
    /// Both salmonella kinds
    Salmonella,
    /// E. coli
    Ecoli,
}

impl BacteriumKind {
    /// Every kind, in pit release order.
    pub const ALL: [BacteriumKind; 3] = [
        BacteriumKind::RegularSalmonella,
        BacteriumKind::AggressiveSalmonella,
        BacteriumKind::Ecoli,
    ];

    /// Hit points at spawn.
    #[inline]
    pub fn initial_hit_points(self) -> i32 {
        match self {
            BacteriumKind::RegularSalmonella => 4,
            BacteriumKind::AggressiveSalmonella => 10,
            BacteriumKind::Ecoli => 5,
        }
    }

    /// Damage dealt to the player per contact tick.
    #[inline]
    pub fn damage(self) -> i32 {
        match self {
            BacteriumKind::RegularSalmonella => 1,
            BacteriumKind::AggressiveSalmonella => 2,
            BacteriumKind::Ecoli => 4,
        }
    }

    /// Sprite/sound family.
    #[inline]
    pub fn family(self) -> BacteriumFamily {
        match self {
            BacteriumKind::RegularSalmonella | BacteriumKind::AggressiveSalmonella => {
                BacteriumFamily::Salmonella
            }
            BacteriumKind::Ecoli => BacteriumFamily::Ecoli,
        }
    }
}

impl BacteriumFamily {
    /// Cue for a hit the bacterium survives.
    pub fn hurt_cue(self) -> Cue {
        match self {
            BacteriumFamily::Salmonella => Cue::SalmonellaHurt,
            BacteriumFamily::Ecoli => Cue::EcoliHurt,
        }
    }

    /// Cue for a killing hit.
    pub fn death_cue(self) -> Cue {
        match self {
            BacteriumFamily::Salmonella => Cue::SalmonellaDie,
            BacteriumFamily::Ecoli => Cue::EcoliDie,
        }
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Per-bacterium data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacteriumState {
    /// Kind
    pub kind: BacteriumKind,

    /// Food eaten since the last division
    pub food_eaten: u32,

    /// Steps left on the current wander plan (salmonella only)
    pub plan_distance: i32,
}

impl BacteriumState {
    /// Fresh bacterium: no food, no plan.
    pub fn new(kind: BacteriumKind) -> Self {
        Self {
            kind,
            food_eaten: 0,
            plan_distance: 0,
        }
    }
}

// =============================================================================
// ACTING
// =============================================================================

/// Run one tick of behavior for a bacterium.
///
/// `entity` has been taken out of the registry for the duration of the call.
pub fn act_bacterium(entity: &mut Entity, world: &mut WorldState) {
    let EntityKind::Bacterium(mut data) = entity.kind else {
        return;
    };

    match data.kind {
        BacteriumKind::RegularSalmonella => {
            feed_or_divide(entity, &mut data, world);
            salmonella_walk(entity, &mut data, world);
        }
        BacteriumKind::AggressiveSalmonella => {
            let lunged = aggressive_lunge(entity, world);
            feed_or_divide(entity, &mut data, world);
            if !lunged {
                salmonella_walk(entity, &mut data, world);
            }
        }
        BacteriumKind::Ecoli => {
            feed_or_divide(entity, &mut data, world);
            ecoli_chase(entity, world);
        }
    }

    entity.kind = EntityKind::Bacterium(data);
}

/// Where a bacterium dividing at `parent` places its offspring.
#[inline]
pub fn division_point(parent: Vec2) -> Vec2 {
    Vec2::new(
        nudge_toward_center(parent.x, DISH_CENTER.x),
        nudge_toward_center(parent.y, DISH_CENTER.y),
    )
}

/// Hurt the player, divide, or eat. At most one per tick.
fn feed_or_divide(entity: &Entity, data: &mut BacteriumState, world: &mut WorldState) {
    if overlaps_player(world, entity.position) {
        adjust_player_health(world, -data.kind.damage());
    } else if data.food_eaten >= FOOD_TO_DIVIDE {
        let child_id = world.spawn_bacterium(data.kind, division_point(entity.position));
        data.food_eaten -= FOOD_TO_DIVIDE;
        world.push_event(GameEventData::BacteriumDivided {
            parent_id: entity.id,
            child_id,
            kind: data.kind,
        });
    } else if let Some(food_id) = consume_food_at(world, entity.position) {
        data.food_eaten += 1;
        world.push_event(GameEventData::FoodConsumed {
            bacterium_id: entity.id,
            food_id,
        });
    }
}

/// Follow the current plan, else head for food, else pick a new plan.
fn salmonella_walk(entity: &mut Entity, data: &mut BacteriumState, world: &mut WorldState) {
    if data.plan_distance > 0 {
        data.plan_distance -= 1;
        let heading = entity.direction;
        if !try_step(entity, heading, SALMONELLA_STEP, world) {
            replan(entity, data, world);
        }
        return;
    }

    match nearby_food_direction(world, entity.position) {
        Some(heading) => {
            entity.set_direction(heading);
            if !try_step(entity, heading, SALMONELLA_STEP, world) {
                replan(entity, data, world);
            }
        }
        None => replan(entity, data, world),
    }
}

/// Random heading; the plan is replenished to `PLAN_LENGTH - remaining`.
fn replan(entity: &mut Entity, data: &mut BacteriumState, world: &mut WorldState) {
    entity.set_direction(world.rng.random_degrees());
    data.plan_distance = PLAN_LENGTH - data.plan_distance;
}

/// Face the player and step toward them if they are close.
///
/// Returns true when the player was in sight, stepped or not.
fn aggressive_lunge(entity: &mut Entity, world: &WorldState) -> bool {
    let Some(heading) = player_direction_within(world, entity.position, AGGRESSIVE_SIGHT) else {
        return false;
    };
    entity.set_direction(heading);
    try_step(entity, heading, SALMONELLA_STEP, world);
    true
}

/// Head for the player, turning until a step succeeds.
fn ecoli_chase(entity: &mut Entity, world: &WorldState) {
    let Some(mut heading) = player_direction_within(world, entity.position, ECOLI_SIGHT) else {
        return;
    };
    entity.set_direction(heading);

    for _ in 0..ECOLI_ATTEMPTS {
        if try_step(entity, heading, ECOLI_STEP, world) {
            return;
        }
        heading = normalize_degrees(heading + ECOLI_TURN);
        entity.set_direction(heading);
    }
}

/// Move `units` along `heading` unless the destination is blocked.
fn try_step(entity: &mut Entity, heading: f64, units: f64, world: &WorldState) -> bool {
    let next = entity.position.step(heading, units);
    if is_movement_blocked(world, next) {
        false
    } else {
        entity.position = next;
        true
    }
}

// =============================================================================
// DAMAGE
// =============================================================================

/// React to a hit-point change on bacterium `id`.
///
/// Survivors play the hurt cue. A kill plays the death cue, scores, and
/// may leave food behind; that happens once, on the killing hit.
pub fn on_damaged(
    world: &mut WorldState,
    id: EntityId,
    kind: BacteriumKind,
    position: Vec2,
    outcome: HitOutcome,
) {
    let family = kind.family();
    match outcome {
        HitOutcome::Survived => world.emit_cue(family.hurt_cue()),
        HitOutcome::Killed => {
            world.emit_cue(family.death_cue());
            world.scoreboard.score += KILL_SCORE;

            let dropped_food = world.rng.next_int_range(1, 2) == 1;
            if dropped_food {
                world.spawn_food(position);
            }

            world.push_event(GameEventData::BacteriumKilled {
                bacterium_id: id,
                kind,
                position,
                dropped_food,
            });
        }
        HitOutcome::AlreadyDead => {}
    }
}

// =============================================================================
// TESTS
// =============================================================================
