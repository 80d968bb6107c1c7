//! World State Definitions
//!
//! Everything one level of play owns. Registry entities live in a BTreeMap
//! keyed by monotonic id, so iteration order is creation order on every run.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::dish::rim_point;
use crate::core::hash::{StateHash, StateHasher, compute_state_hash};
use crate::core::rng::{DeterministicRng, derive_level_seed};
use crate::core::vec2::{Vec2, normalize_degrees};
use crate::game::bacterium::{BacteriumKind, BacteriumState, BACTERIUM_START_DIRECTION};
use crate::game::config::{PitConfig, PlayerConfig};
use crate::game::entity::{
    Damageable, DrawLayer, Entity, EntityId, EntityKind, HitOutcome, Sprite,
};
use crate::game::events::{Cue, GameEvent, GameEventData};
use crate::game::goodie::{GoodieKind, GoodieState};
use crate::game::pit::PitInventory;
use crate::game::projectile::{ProjectileKind, ProjectileState};

/// Rim angle the player starts each level at.
pub const PLAYER_START_ANGLE: f64 = 180.0;

/// Food sprites face up; every other prop faces 0°.
const FOOD_DIRECTION: f64 = 90.0;

// =============================================================================
// SCOREBOARD
// =============================================================================

/// Counters that outlive a single level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Accumulated score (fungus pickups can push it negative)
    pub score: i64,
    /// Remaining lives
    pub lives: u32,
    /// Current level, starting at 1
    pub level: u32,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self {
            score: 0,
            lives: 3,
            level: 1,
        }
    }
}

// =============================================================================
// PLAYER STATE
// =============================================================================

/// The player organism. Owned by the world, not the registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Current position (always on the rim)
    pub position: Vec2,

    /// Angle of the position around the dish center
    pub position_angle: f64,

    /// Facing direction: position angle + 180°, i.e. toward the center
    pub direction: f64,

    /// Current health, [0, max_health]
    pub hit_points: i32,

    /// Health ceiling
    pub max_health: i32,

    /// Is the player alive?
    pub alive: bool,

    /// Spray charges, [0, max_sprays]
    pub sprays: u32,

    /// Spray ceiling
    pub max_sprays: u32,

    /// Flame charges (no ceiling)
    pub flames: u32,
}

impl PlayerState {
    /// Create a player at the level start position.
    pub fn new(config: &PlayerConfig) -> Self {
        let mut player = Self {
            position: Vec2::ZERO,
            position_angle: 0.0,
            direction: 0.0,
            hit_points: config.starting_health,
            max_health: config.max_health,
            alive: true,
            sprays: config.starting_sprays.min(config.spray_cap),
            max_sprays: config.spray_cap,
            flames: config.starting_flames,
        };
        player.move_to_angle(PLAYER_START_ANGLE);
        player
    }

    /// Move to a rim angle and face the center.
    pub fn move_to_angle(&mut self, degrees: f64) {
        self.position_angle = normalize_degrees(degrees);
        self.position = rim_point(self.position_angle);
        self.direction = normalize_degrees(self.position_angle + 180.0);
    }

    /// Add spray charges, capped.
    pub fn add_sprays(&mut self, amount: u32) {
        self.sprays = self.sprays.saturating_add(amount).min(self.max_sprays);
    }

    /// Hash this player's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_vec2(self.position);
        hasher.update_f64(self.position_angle);
        hasher.update_f64(self.direction);
        hasher.update_i32(self.hit_points);
        hasher.update_bool(self.alive);
        hasher.update_u32(self.sprays);
        hasher.update_u32(self.flames);
    }
}

impl Damageable for PlayerState {
    fn hit_points(&self) -> i32 {
        self.hit_points
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    /// Clamps at `max_health`; a result at or below zero pins health to 0.
    /// A dead player's health no longer changes.
    fn adjust_hit_points(&mut self, delta: i32) -> HitOutcome {
        if !self.alive {
            return HitOutcome::AlreadyDead;
        }
        let target = self.hit_points.saturating_add(delta);

        if target >= self.max_health {
            self.hit_points = self.max_health;
        } else if target <= 0 {
            self.hit_points = 0;
            self.alive = false;
        } else {
            self.hit_points = target;
        }

        if self.alive {
            HitOutcome::Survived
        } else {
            HitOutcome::Killed
        }
    }
}

// =============================================================================
// DRAWING SNAPSHOT
// =============================================================================

/// What the renderer needs for one sprite.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    /// Sprite position
    pub position: Vec2,
    /// Sprite rotation in degrees
    pub direction: f64,
    /// Draw layer
    pub layer: DrawLayer,
    /// Sprite to draw
    pub sprite: Sprite,
}

// =============================================================================
// WORLD STATE
// =============================================================================

/// Complete state of one level.
///
/// This is the authoritative state that gets hashed for verification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldState {
    /// Current tick (0 = just initialized)
    pub tick: u32,

    /// RNG seed for this level
    pub rng_seed: u64,

    /// Deterministic RNG
    pub rng: DeterministicRng,

    /// Score, lives and level
    pub scoreboard: Scoreboard,

    /// The player
    pub player: PlayerState,

    /// Registry (BTreeMap for deterministic order)
    pub entities: BTreeMap<EntityId, Entity>,

    /// Next entity id to allocate
    pub next_entity_id: u32,

    /// Live bacteria: incremented on every spawn, decremented on every reap
    pub bacteria_remaining: u32,

    /// Pits that have not yet signaled exhaustion
    pub pits_pending: u32,

    /// Set once every pit has released its whole inventory
    pub all_bacteria_released: bool,

    /// Events generated this tick
    #[serde(skip)]
    pending_events: Vec<GameEvent>,

    /// Emission counter for event ordering
    #[serde(skip)]
    event_sequence: u32,
}

impl WorldState {
    /// Create an empty dish for `scoreboard.level`, seeded from `base_seed`.
    pub fn new(base_seed: u64, scoreboard: Scoreboard, player: &PlayerConfig) -> Self {
        let rng_seed = derive_level_seed(base_seed, scoreboard.level);
        Self {
            tick: 0,
            rng_seed,
            rng: DeterministicRng::new(rng_seed),
            scoreboard,
            player: PlayerState::new(player),
            entities: BTreeMap::new(),
            next_entity_id: 0,
            bacteria_remaining: 0,
            pits_pending: 0,
            all_bacteria_released: false,
            pending_events: Vec::new(),
            event_sequence: 0,
        }
    }

    /// Current level.
    #[inline]
    pub fn level(&self) -> u32 {
        self.scoreboard.level
    }

    /// Release finished and no bacteria left alive.
    #[inline]
    pub fn is_level_complete(&self) -> bool {
        self.all_bacteria_released && self.bacteria_remaining == 0
    }

    // =========================================================================
    // Spawning
    // =========================================================================

    /// Insert a new entity and return its id.
    pub fn spawn(&mut self, kind: EntityKind, position: Vec2, direction: f64, hit_points: i32) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        self.entities.insert(id, Entity::new(id, kind, position, direction, hit_points));
        id
    }

    /// Add a bacterium, count it as live and play the birth cue.
    pub fn spawn_bacterium(&mut self, kind: BacteriumKind, position: Vec2) -> EntityId {
        let id = self.spawn(
            EntityKind::Bacterium(BacteriumState::new(kind)),
            position,
            BACTERIUM_START_DIRECTION,
            kind.initial_hit_points(),
        );
        self.bacteria_remaining += 1;
        self.emit_cue(Cue::BacteriumBorn);
        id
    }

    /// Add a food item.
    pub fn spawn_food(&mut self, position: Vec2) -> EntityId {
        self.spawn(EntityKind::Food, position, FOOD_DIRECTION, 0)
    }

    /// Add a dirt pile.
    pub fn spawn_dirt(&mut self, position: Vec2) -> EntityId {
        self.spawn(EntityKind::DirtPile, position, 0.0, 0)
    }

    /// Add a pit stocked from `config` and count it as pending.
    pub fn spawn_pit(&mut self, position: Vec2, config: &PitConfig) -> EntityId {
        self.pits_pending += 1;
        self.spawn(EntityKind::Pit(PitInventory::from_config(config)), position, 0.0, 0)
    }

    /// Add a goodie; its lifetime is rolled here, once.
    pub fn spawn_goodie(&mut self, kind: GoodieKind, position: Vec2) -> EntityId {
        let level = self.level();
        let lifetime = GoodieState::roll_lifetime(&mut self.rng, level);
        let id = self.spawn(EntityKind::Goodie(GoodieState { kind, lifetime }), position, 0.0, 0);
        self.push_event(GameEventData::GoodieSpawned { goodie_id: id, kind, lifetime });
        id
    }

    /// Add a projectile with a full travel budget.
    pub fn spawn_projectile(&mut self, kind: ProjectileKind, position: Vec2, direction: f64) -> EntityId {
        self.spawn(EntityKind::Projectile(ProjectileState::new(kind)), position, direction, 0)
    }

    // =========================================================================
    // Release bookkeeping
    // =========================================================================

    /// A pit emptied. Release is complete once every pit has signaled.
    pub fn signal_pit_exhausted(&mut self, pit_id: EntityId) {
        self.pits_pending = self.pits_pending.saturating_sub(1);
        self.push_event(GameEventData::PitExhausted { pit_id });
        debug!(tick = self.tick, pit = pit_id.0, pending = self.pits_pending, "pit exhausted");

        if self.pits_pending == 0 && !self.all_bacteria_released {
            self.all_bacteria_released = true;
            self.push_event(GameEventData::ReleaseComplete);
            debug!(tick = self.tick, live = self.bacteria_remaining, "all bacteria released");
        }
    }

    // =========================================================================
    // Reaping
    // =========================================================================

    /// Remove every dead entity, keeping the live-bacteria count in step.
    ///
    /// Returns the number of entities removed.
    pub fn reap_dead(&mut self) -> usize {
        let before = self.entities.len();
        let mut bacteria_reaped = 0u32;

        self.entities.retain(|_id, entity| {
            if entity.alive {
                return true;
            }
            if entity.is_bacterium() {
                bacteria_reaped += 1;
            }
            #[cfg(feature = "debug-tracing")]
            tracing::trace!(id = _id.0, sprite = ?entity.sprite(), "reaped");
            false
        });

        self.bacteria_remaining = self.bacteria_remaining.saturating_sub(bacteria_reaped);
        before - self.entities.len()
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Push a game event stamped with the current tick.
    pub fn push_event(&mut self, data: GameEventData) {
        let mut event = GameEvent::new(self.tick, data);
        event.sequence = self.event_sequence;
        self.event_sequence = self.event_sequence.wrapping_add(1);
        self.pending_events.push(event);
    }

    /// Record an audio cue.
    #[inline]
    pub fn emit_cue(&mut self, cue: Cue) {
        self.push_event(GameEventData::CuePlayed { cue });
    }

    /// Take the events generated since the last call, sorted by
    /// (tick, priority, emission order).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        let mut events = std::mem::take(&mut self.pending_events);
        events.sort();
        events
    }

    // =========================================================================
    // Outputs
    // =========================================================================

    /// One-line status text.
    pub fn status_line(&self) -> String {
        format!(
            "Score: {}  Level: {}  Lives: {}  Health: {}  Sprays: {}  Flames: {}",
            self.scoreboard.score,
            self.scoreboard.level,
            self.scoreboard.lives,
            self.player.hit_points,
            self.player.sprays,
            self.player.flames,
        )
    }

    /// Sprites to draw this frame: the player, then live entities in id order.
    pub fn drawables(&self) -> Vec<Drawable> {
        let player = Drawable {
            position: self.player.position,
            direction: self.player.direction,
            layer: DrawLayer::Actors,
            sprite: Sprite::Player,
        };

        std::iter::once(player)
            .chain(self.entities.values().filter(|e| e.alive).map(|e| Drawable {
                position: e.position,
                direction: e.direction,
                layer: e.layer(),
                sprite: e.sprite(),
            }))
            .collect()
    }

    /// Live entities matching a predicate.
    pub fn count_live(&self, predicate: impl Fn(&Entity) -> bool) -> usize {
        self.entities.values().filter(|e| e.alive && predicate(e)).count()
    }

    /// Compute deterministic hash of the entire level state.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.rng_seed, |hasher| {
            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);

            hasher.update_i64(self.scoreboard.score);
            hasher.update_u32(self.scoreboard.lives);
            hasher.update_u32(self.scoreboard.level);

            self.player.hash_into(hasher);

            // Sorted by id (BTreeMap guarantees this)
            hasher.update_u32(self.entities.len() as u32);
            for entity in self.entities.values() {
                entity.hash_into(hasher);
            }

            hasher.update_u32(self.next_entity_id);
            hasher.update_u32(self.bacteria_remaining);
            hasher.update_u32(self.pits_pending);
            hasher.update_bool(self.all_bacteria_released);
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::WorldConfig;

    fn empty_world() -> WorldState {
        let config = WorldConfig::default();
        WorldState::new(config.seed, Scoreboard::default(), &config.player)
    }

    #[test]
    fn test_player_start_pose() {
        let world = empty_world();
        assert!((world.player.position.x - 0.0).abs() < 1e-9);
        assert!((world.player.position.y - 128.0).abs() < 1e-9);
        assert_eq!(world.player.direction, 0.0);
        assert_eq!(world.player.hit_points, 100);
        assert_eq!(world.player.sprays, 20);
        assert_eq!(world.player.flames, 5);
    }

    #[test]
    fn test_player_health_clamp() {
        let mut player = PlayerState::new(&PlayerConfig::default());
        player.hit_points = 80;
        assert_eq!(player.adjust_hit_points(150), HitOutcome::Survived);
        assert_eq!(player.hit_points, 100);

        assert_eq!(player.adjust_hit_points(-30), HitOutcome::Survived);
        assert_eq!(player.hit_points, 70);

        assert_eq!(player.adjust_hit_points(-70), HitOutcome::Killed);
        assert_eq!(player.hit_points, 0);
        assert!(!player.alive);

        assert_eq!(player.adjust_hit_points(-5), HitOutcome::AlreadyDead);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut world = empty_world();
        let a = world.spawn_food(Vec2::new(100.0, 100.0));
        let b = world.spawn_dirt(Vec2::new(120.0, 100.0));
        assert!(a < b);

        world.entities.get_mut(&a).unwrap().set_dead();
        world.reap_dead();
        let c = world.spawn_food(Vec2::new(140.0, 100.0));
        assert!(b < c);
        assert!(!world.entities.contains_key(&a));
    }

    #[test]
    fn test_bacteria_counter_follows_spawn_and_reap() {
        let mut world = empty_world();
        let id = world.spawn_bacterium(BacteriumKind::Ecoli, Vec2::new(128.0, 128.0));
        world.spawn_bacterium(BacteriumKind::RegularSalmonella, Vec2::new(100.0, 128.0));
        assert_eq!(world.bacteria_remaining, 2);

        let cues: Vec<_> = world.take_events().iter().filter_map(|e| e.as_cue()).collect();
        assert_eq!(cues, vec![Cue::BacteriumBorn, Cue::BacteriumBorn]);

        world.entities.get_mut(&id).unwrap().adjust_hit_points(-5);
        assert_eq!(world.reap_dead(), 1);
        assert_eq!(world.bacteria_remaining, 1);
    }

    #[test]
    fn test_release_completes_after_every_pit() {
        let mut world = empty_world();
        let pit_config = PitConfig::default();
        let first = world.spawn_pit(Vec2::new(100.0, 100.0), &pit_config);
        let second = world.spawn_pit(Vec2::new(150.0, 150.0), &pit_config);

        world.signal_pit_exhausted(first);
        assert!(!world.all_bacteria_released);

        world.signal_pit_exhausted(second);
        assert!(world.all_bacteria_released);
        assert!(world.is_level_complete());
    }

    #[test]
    fn test_status_line() {
        let mut world = empty_world();
        world.scoreboard.score = 350;
        world.player.sprays = 17;
        assert_eq!(
            world.status_line(),
            "Score: 350  Level: 1  Lives: 3  Health: 100  Sprays: 17  Flames: 5"
        );
    }

    #[test]
    fn test_drawables_skip_dead() {
        let mut world = empty_world();
        let food = world.spawn_food(Vec2::new(100.0, 100.0));
        world.spawn_dirt(Vec2::new(120.0, 100.0));
        world.entities.get_mut(&food).unwrap().set_dead();

        let drawables = world.drawables();
        assert_eq!(drawables.len(), 2);
        assert_eq!(drawables[0].sprite, Sprite::Player);
        assert_eq!(drawables[1].sprite, Sprite::DirtPile);
    }

    #[test]
    fn test_hash_tracks_state() {
        let mut a = empty_world();
        let b = empty_world();
        assert_eq!(a.compute_hash(), b.compute_hash());

        a.spawn_food(Vec2::new(100.0, 100.0));
        assert_ne!(a.compute_hash(), b.compute_hash());
    }
}
