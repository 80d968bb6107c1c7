//! Goodies
//!
//! Timed pickups that appear on the rim. Touching one applies its effect
//! once; left alone it counts down and vanishes.

use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::game::entity::{Entity, EntityKind};
use crate::game::events::{Cue, GameEventData};
use crate::game::player::adjust_player_health;
use crate::game::query::overlaps_player;
use crate::game::state::WorldState;

/// Goodies never last fewer ticks than this.
pub const MIN_LIFETIME: u32 = 50;

/// Lifetime roll ceiling before the per-level reduction.
pub const BASE_LIFETIME: i32 = 300;

/// Goodie kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GoodieKind {
    /// Refills health
    RestoreHealth = 0,
    /// Adds flame charges
    FlameThrower = 1,
    /// Adds a life
    ExtraLife = 2,
    /// Harmful: costs health and score
    Fungus = 3,
}

/// What picking up a goodie does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoodieEffect {
    /// Score change
    pub score: i64,
    /// Player health change
    pub health: i32,
    /// Flame charges added
    pub flames: u32,
    /// Lives added
    pub lives: u32,
    /// Cue played on pickup
    pub cue: Option<Cue>,
}

/// Effect table, indexed by `GoodieKind as usize`.
pub const GOODIE_EFFECTS: [GoodieEffect; 4] = [
    // RestoreHealth
    GoodieEffect { score: 250, health: 100, flames: 0, lives: 0, cue: Some(Cue::GotGoodie) },
    // FlameThrower
    GoodieEffect { score: 300, health: 0, flames: 5, lives: 0, cue: Some(Cue::GotGoodie) },
    // ExtraLife
    GoodieEffect { score: 500, health: 0, flames: 0, lives: 1, cue: Some(Cue::GotGoodie) },
    // Fungus
    GoodieEffect { score: -50, health: -20, flames: 0, lives: 0, cue: None },
];

impl GoodieKind {
    /// Pickup effect.
    #[inline]
    pub fn effect(self) -> &'static GoodieEffect {
        &GOODIE_EFFECTS[self as usize]
    }

    /// Map a 1..=10 roll to a beneficial kind: 10% extra life, 30%
    /// flamethrower, 60% restore health.
    pub fn from_roll(roll: i32) -> Self {
        match roll {
            1 => GoodieKind::ExtraLife,
            2..=4 => GoodieKind::FlameThrower,
            _ => GoodieKind::RestoreHealth,
        }
    }
}

/// Per-goodie data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodieState {
    /// Kind
    pub kind: GoodieKind,
    /// Ticks left before expiry
    pub lifetime: u32,
}

impl GoodieState {
    /// `max(rand[0, 300 - 10*level - 1], 50)`.
    pub fn roll_lifetime(rng: &mut DeterministicRng, level: u32) -> u32 {
        let ceiling = (BASE_LIFETIME as i64 - 10 * level as i64 - 1).clamp(0, i32::MAX as i64) as i32;
        (rng.next_int_range(0, ceiling) as u32).max(MIN_LIFETIME)
    }
}

/// Run one tick for a goodie: pickup, or count down.
pub fn act_goodie(entity: &mut Entity, world: &mut WorldState) {
    let EntityKind::Goodie(mut goodie) = entity.kind else {
        return;
    };

    if overlaps_player(world, entity.position) {
        let effect = goodie.kind.effect();
        world.scoreboard.score += effect.score;
        entity.set_dead();
        if let Some(cue) = effect.cue {
            world.emit_cue(cue);
        }
        if effect.health != 0 {
            adjust_player_health(world, effect.health);
        }
        world.player.flames += effect.flames;
        world.scoreboard.lives += effect.lives;

        world.push_event(GameEventData::GoodieCollected {
            goodie_id: entity.id,
            kind: goodie.kind,
            score_delta: effect.score,
        });
        return;
    }

    goodie.lifetime = goodie.lifetime.saturating_sub(1);
    entity.kind = EntityKind::Goodie(goodie);
    if goodie.lifetime == 0 {
        entity.set_dead();
        world.push_event(GameEventData::GoodieExpired {
            goodie_id: entity.id,
            kind: goodie.kind,
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================
