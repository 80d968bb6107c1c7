//! Level Setup
//!
//! Stocks a fresh dish: dirt first (overlap allowed), then pits and food,
//! each kept at least one sprite width clear of everything placed so far.

use tracing::{debug, warn};

use crate::core::dish::{point_from_center, MAX_PLACEMENT_DISTANCE, SPRITE_WIDTH};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::config::WorldConfig;
use crate::game::state::{Scoreboard, WorldState};

/// Fixed objects placed by rejection sampling keep at least this far apart.
pub const PLACEMENT_CLEARANCE: f64 = SPRITE_WIDTH;

/// Rejection sampling gives up and accepts a crowded spot after this many draws.
const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

/// Dirt piles at `level`: `max(180 - 20*level, 20)`.
pub fn dirt_count(level: u32) -> u32 {
    180u32.saturating_sub(level.saturating_mul(20)).max(20)
}

/// Pits at `level`.
pub fn pit_count(level: u32) -> u32 {
    level
}

/// Food items at `level`: `min(5*level, 25)`.
pub fn food_count(level: u32) -> u32 {
    level.saturating_mul(5).min(25)
}

/// Random point at a whole-degree angle and whole-unit distance from center.
fn random_placement(rng: &mut DeterministicRng) -> Vec2 {
    let angle = rng.next_int_range(0, 359) as f64;
    let distance = rng.next_int_range(0, MAX_PLACEMENT_DISTANCE as i32) as f64;
    point_from_center(distance, angle)
}

/// Draw until a point is clear of every location in `placed`.
fn clear_placement(rng: &mut DeterministicRng, placed: &[Vec2]) -> Vec2 {
    let is_clear = |p: Vec2| placed.iter().all(|q| q.distance(p) > PLACEMENT_CLEARANCE);

    let mut candidate = random_placement(rng);
    for _ in 1..MAX_PLACEMENT_ATTEMPTS {
        if is_clear(candidate) {
            return candidate;
        }
        candidate = random_placement(rng);
    }
    warn!(placed = placed.len(), "no clear spot found; placing anyway");
    candidate
}

/// Build the starting state for `scoreboard.level`.
///
/// Pits and food are redrawn until clear of everything already placed, but
/// only up to 10 000 draws each; after that the last candidate is used even
/// if crowded, and a warning is logged. Dirt is never checked.
pub fn initialize_level(config: &WorldConfig, scoreboard: Scoreboard) -> WorldState {
    let mut world = WorldState::new(config.seed, scoreboard, &config.player);
    let level = world.level();
    let mut placed: Vec<Vec2> = Vec::new();

    for _ in 0..dirt_count(level) {
        let point = random_placement(&mut world.rng);
        placed.push(point);
        world.spawn_dirt(point);
    }

    for _ in 0..pit_count(level) {
        let point = clear_placement(&mut world.rng, &placed);
        placed.push(point);
        world.spawn_pit(point, &config.pit);
    }

    for _ in 0..food_count(level) {
        let point = clear_placement(&mut world.rng, &placed);
        placed.push(point);
        world.spawn_food(point);
    }

    world.bacteria_remaining = 0;
    world.all_bacteria_released = false;

    debug!(
        level,
        seed = world.rng_seed,
        dirt = dirt_count(level),
        pits = pit_count(level),
        food = food_count(level),
        "level initialized"
    );

    world
}

// =============================================================================
// TESTS
// =============================================================================
