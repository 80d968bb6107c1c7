//! Authoritative Simulation Tick
//!
//! One call advances the dish by one step. The order is fixed:
//!
//! 1. Level complete? Report and stop (the tick counter does not advance).
//! 2. Player acts; a dead player ends the tick.
//! 3. Goodie roll, 4. fungus roll.
//! 5. Every entity that existed before step 3 acts once, in id order.
//! 6. Reap the dead.
//! 7. Publish the status line.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::dish::rim_point;
use crate::game::bacterium::act_bacterium;
use crate::game::config::{ConfigError, WorldConfig};
use crate::game::entity::{Entity, EntityId, EntityKind};
use crate::game::events::{Cue, GameEvent, GameEventData};
use crate::game::goodie::{act_goodie, GoodieKind};
use crate::game::input::{Command, InputRecording};
use crate::game::level::initialize_level;
use crate::game::pit::act_pit;
use crate::game::player::act_player;
use crate::game::projectile::act_projectile;
use crate::game::state::{Scoreboard, WorldState};

/// What the driver should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickStatus {
    /// Keep ticking
    Continue,
    /// Every bacterium released and killed; advance to the next level
    LevelFinished,
    /// The player died; the attempt is over
    PlayerDied,
}

/// Result of a tick.
#[derive(Debug, Clone)]
pub struct TickResult {
    /// Outcome of the tick
    pub status: TickStatus,
    /// Events generated this tick, ordered by (tick, priority, emission)
    pub events: Vec<GameEvent>,
    /// Status text after the tick
    pub status_line: String,
}

impl TickResult {
    fn finish(world: &mut WorldState, status: TickStatus) -> Self {
        Self {
            status,
            events: world.take_events(),
            status_line: world.status_line(),
        }
    }
}

/// Run one simulation tick.
///
/// # Determinism
///
/// Registry iteration is in id order (BTreeMap) and every random draw goes
/// through `world.rng`, so the same state and input always produce the
/// same next state.
pub fn tick(world: &mut WorldState, input: Option<Command>, config: &WorldConfig) -> TickResult {
    // 1. Level complete
    if world.is_level_complete() {
        let level = world.level();
        world.push_event(GameEventData::LevelComplete { level });
        debug!(tick = world.tick, level, score = world.scoreboard.score, "level complete");
        return TickResult::finish(world, TickStatus::LevelFinished);
    }

    world.tick += 1;

    // 2. Player
    act_player(world, input);
    if !world.player.alive {
        world.emit_cue(Cue::PlayerDie);
        world.push_event(GameEventData::PlayerDied);
        debug!(tick = world.tick, level = world.level(), "player died");
        return TickResult::finish(world, TickStatus::PlayerDied);
    }

    // Entities created from here on first act next tick
    let boundary = EntityId(world.next_entity_id);

    // 3-4. Rim spawns
    roll_rim_spawns(world, config);

    // 5. Act pass
    act_all(world, boundary, config);

    // 6. Reap
    let reaped = world.reap_dead();

    #[cfg(feature = "debug-tracing")]
    tracing::trace!(
        tick = world.tick,
        reaped,
        live = world.entities.len(),
        bacteria = world.bacteria_remaining,
        "tick done"
    );
    #[cfg(not(feature = "debug-tracing"))]
    let _ = reaped;

    // 7-8. Status
    TickResult::finish(world, TickStatus::Continue)
}

/// Per-tick goodie and fungus rolls.
fn roll_rim_spawns(world: &mut WorldState, config: &WorldConfig) {
    let level = world.level();

    if world.rng.one_in(config.spawn.goodie_odds(level)) {
        let kind = GoodieKind::from_roll(world.rng.next_int_range(1, 10));
        let angle = world.rng.random_degrees();
        world.spawn_goodie(kind, rim_point(angle));
    }

    if world.rng.one_in(config.spawn.fungus_odds(level)) {
        let angle = world.rng.random_degrees();
        world.spawn_goodie(GoodieKind::Fungus, rim_point(angle));
    }
}

/// Let every live entity with an id below `boundary` act once.
///
/// Each entity is taken out of the registry while it acts and put back
/// under the same id, so it sees every change made earlier in the pass.
fn act_all(world: &mut WorldState, boundary: EntityId, config: &WorldConfig) {
    let ids: Vec<EntityId> = world.entities.range(..boundary).map(|(id, _)| *id).collect();

    for id in ids {
        let Some(mut entity) = world.entities.remove(&id) else {
            continue;
        };
        if entity.alive {
            act_entity(&mut entity, world, config);
        }
        world.entities.insert(id, entity);
    }
}

fn act_entity(entity: &mut Entity, world: &mut WorldState, config: &WorldConfig) {
    match entity.kind {
        EntityKind::Bacterium(_) => act_bacterium(entity, world),
        EntityKind::Pit(_) => act_pit(entity, world, config.pit.release_odds),
        EntityKind::Goodie(_) => act_goodie(entity, world),
        EntityKind::Projectile(_) => act_projectile(entity, world),
        EntityKind::Food | EntityKind::DirtPile => {}
    }
}

// =============================================================================
// WORLD (driver-facing lifecycle)
// =============================================================================

/// Owns the configuration, the counters that survive between levels, and
/// the current level's state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    scoreboard: Scoreboard,
    state: Option<WorldState>,
    /// Terminal status of the current attempt, once reached
    outcome: Option<TickStatus>,
}

impl World {
    /// Create a world with a validated configuration and a fresh scoreboard.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            scoreboard: Scoreboard::default(),
            state: None,
            outcome: None,
        })
    }

    /// Set up `level` (levels start at 1). Any previous level is discarded.
    pub fn initialize(&mut self, level: u32) -> TickStatus {
        self.scoreboard.level = level.max(1);
        self.state = Some(initialize_level(&self.config, self.scoreboard));
        self.outcome = None;
        TickStatus::Continue
    }

    /// Advance one tick. A death costs a life.
    ///
    /// Without an initialized level this reports `Continue` and does nothing.
    /// Once an attempt has ended (level finished or player died) every call
    /// repeats that status without ticking until the next `initialize`.
    pub fn advance_tick(&mut self, input: Option<Command>) -> TickResult {
        let Some(state) = self.state.as_mut() else {
            return TickResult {
                status: TickStatus::Continue,
                events: Vec::new(),
                status_line: String::new(),
            };
        };

        if let Some(status) = self.outcome {
            return TickResult {
                status,
                events: Vec::new(),
                status_line: state.status_line(),
            };
        }

        let result = tick(state, input, &self.config);
        if result.status != TickStatus::Continue {
            self.outcome = Some(result.status);
        }
        if result.status == TickStatus::PlayerDied {
            state.scoreboard.lives = state.scoreboard.lives.saturating_sub(1);
        }
        self.scoreboard = state.scoreboard;
        result
    }

    /// Drop the current level, returning its final state.
    pub fn teardown(&mut self) -> Option<WorldState> {
        self.outcome = None;
        self.state.take()
    }

    /// Current level state, if initialized.
    pub fn state(&self) -> Option<&WorldState> {
        self.state.as_ref()
    }

    /// Score, lives and level as of the last tick.
    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    /// Active configuration.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// No lives left.
    pub fn is_game_over(&self) -> bool {
        self.scoreboard.lives == 0
    }
}

// =============================================================================
// REPLAY
// =============================================================================

/// Replay one attempt at a level from recorded inputs.
///
/// Starts from `scoreboard` (which fixes the level and therefore the seed),
/// feeds the recorded command for each tick and stops at the first
/// non-continue status or after `max_ticks`.
pub fn replay_level(
    config: &WorldConfig,
    scoreboard: Scoreboard,
    recording: &InputRecording,
    max_ticks: u32,
) -> (WorldState, Vec<GameEvent>, TickStatus) {
    let mut world = initialize_level(config, scoreboard);
    let mut all_events = Vec::new();
    let mut status = TickStatus::Continue;

    for _ in 0..max_ticks {
        let input = recording.get_input_at(world.tick + 1);
        let result = tick(&mut world, input, config);
        all_events.extend(result.events);
        status = result.status;

        if status != TickStatus::Continue {
            break;
        }
    }

    (world, all_events, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dish::{DISH_CENTER, DISH_RADIUS};
    use crate::core::vec2::Vec2;
    use crate::game::bacterium::BacteriumKind;
    use crate::game::config::PitConfig;
    use crate::game::goodie::GoodieState;
    use crate::game::projectile::ProjectileKind;
    use rand::Rng;

    fn empty_world() -> WorldState {
        let config = WorldConfig::default();
        WorldState::new(config.seed, Scoreboard::default(), &config.player)
    }

    /// No random rim spawns, instant pit releases.
    fn quiet_config() -> WorldConfig {
        let mut config = WorldConfig::default();
        config.spawn.base_odds = u32::MAX;
        config.spawn.goodie_floor = u32::MAX;
        config.spawn.fungus_floor = u32::MAX;
        config.pit.release_odds = 1;
        config
    }

    fn scripted_input(t: u32) -> Option<Command> {
        match t % 7 {
            0 => Some(Command::FireSpray),
            3 => Some(Command::RotateLeft),
            5 => Some(Command::RotateRight),
            _ => None,
        }
    }

    #[test]
    fn test_tick_determinism() {
        let config = WorldConfig::default();
        let mut a = initialize_level(&config, Scoreboard::default());
        let mut b = initialize_level(&config, Scoreboard::default());

        for t in 1..=500 {
            let ra = tick(&mut a, scripted_input(t), &config);
            let rb = tick(&mut b, scripted_input(t), &config);
            assert_eq!(ra.status, rb.status);
            assert_eq!(ra.status_line, rb.status_line);
        }

        assert_eq!(a.tick, b.tick);
        assert_eq!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_determinism_random_seeds() {
        let mut rng = rand::thread_rng();
        for _ in 0..5 {
            let config = WorldConfig {
                seed: rng.gen(),
                ..WorldConfig::default()
            };
            let mut a = initialize_level(&config, Scoreboard::default());
            let mut b = initialize_level(&config, Scoreboard::default());
            for t in 1..=200 {
                tick(&mut a, scripted_input(t), &config);
                tick(&mut b, scripted_input(t), &config);
            }
            assert_eq!(a.compute_hash(), b.compute_hash());
        }
    }

    #[test]
    fn test_new_spawns_wait_one_tick() {
        let config = quiet_config();
        let mut world = empty_world();
        let pit = world.spawn_pit(Vec2::new(128.0, 128.0), &PitConfig::default());

        tick(&mut world, None, &config);
        // The pit released one bacterium; it has not moved yet
        let bacterium = world.entities.values().find(|e| e.is_bacterium()).unwrap();
        assert_eq!(bacterium.position, Vec2::new(128.0, 128.0));
        assert!(world.entities[&pit].alive);
        assert_eq!(world.bacteria_remaining, 1);
    }

    #[test]
    fn test_player_projectile_acts_same_tick() {
        let config = quiet_config();
        let mut world = empty_world();
        tick(&mut world, Some(Command::FireSpray), &config);

        let spray = world.entities.values().next().unwrap();
        // Spawned 16 ahead, then advanced 16
        assert!((spray.position.x - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_release_and_clear() {
        let config = quiet_config();
        let mut world = empty_world();
        world.spawn_pit(Vec2::new(128.0, 128.0), &PitConfig::default());

        // Ten releases, then the emptying tick
        for _ in 0..11 {
            assert_eq!(tick(&mut world, None, &config).status, TickStatus::Continue);
        }
        assert!(world.all_bacteria_released);
        assert_eq!(world.bacteria_remaining, 10);
        assert!(!world.is_level_complete());

        for entity in world.entities.values_mut() {
            if entity.is_bacterium() {
                entity.set_dead();
            }
        }
        world.reap_dead();
        assert_eq!(world.bacteria_remaining, 0);

        let before = world.tick;
        let result = tick(&mut world, None, &config);
        assert_eq!(result.status, TickStatus::LevelFinished);
        assert_eq!(world.tick, before);
        assert!(result
            .events
            .iter()
            .any(|e| e.data == GameEventData::LevelComplete { level: 1 }));
    }

    #[test]
    fn test_player_death_reported_next_tick() {
        let config = quiet_config();
        let mut world = empty_world();
        world.player.hit_points = 1;
        let beside_player = world.player.position + Vec2::new(8.0, 0.0);
        world.spawn_bacterium(BacteriumKind::Ecoli, beside_player);

        // The bacterium hits during the act pass
        let first = tick(&mut world, None, &config);
        assert_eq!(first.status, TickStatus::Continue);
        assert!(!world.player.alive);
        assert_eq!(world.player.hit_points, 0);

        let second = tick(&mut world, None, &config);
        assert_eq!(second.status, TickStatus::PlayerDied);
        let cues: Vec<_> = second.events.iter().filter_map(|e| e.as_cue()).collect();
        assert_eq!(cues, vec![Cue::PlayerDie]);
    }

    #[test]
    fn test_status_line_published() {
        let config = quiet_config();
        let mut world = empty_world();
        let result = tick(&mut world, Some(Command::FireSpray), &config);
        assert_eq!(
            result.status_line,
            "Score: 0  Level: 1  Lives: 3  Health: 100  Sprays: 19  Flames: 5"
        );
    }

    #[test]
    fn test_kill_reaped_same_tick() {
        let config = quiet_config();
        let mut world = empty_world();
        let target = world.spawn_bacterium(BacteriumKind::RegularSalmonella, Vec2::new(128.0, 128.0));
        world.entities.get_mut(&target).unwrap().hit_points = 2;
        world.spawn_projectile(ProjectileKind::Spray, Vec2::new(120.0, 128.0), 0.0);

        let result = tick(&mut world, None, &config);
        assert!(!world.entities.contains_key(&target));
        assert_eq!(world.bacteria_remaining, 0);
        assert_eq!(world.scoreboard.score, 100);
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::BacteriumKilled { bacterium_id, .. } if bacterium_id == target)));
    }

    #[test]
    fn test_world_lifecycle() {
        let mut world = World::new(quiet_config()).unwrap();
        assert_eq!(world.advance_tick(None).status, TickStatus::Continue);
        assert!(world.state().is_none());

        assert_eq!(world.initialize(2), TickStatus::Continue);
        assert_eq!(world.state().unwrap().level(), 2);

        world.advance_tick(Some(Command::RotateLeft));
        assert_eq!(world.state().unwrap().tick, 1);

        let final_state = world.teardown().unwrap();
        assert_eq!(final_state.tick, 1);
        assert!(world.state().is_none());
    }

    #[test]
    fn test_world_death_costs_a_life() {
        let mut world = World::new(quiet_config()).unwrap();
        world.initialize(1);
        if let Some(state) = world.state.as_mut() {
            state.player.alive = false;
            state.player.hit_points = 0;
        }

        let result = world.advance_tick(None);
        assert_eq!(result.status, TickStatus::PlayerDied);
        assert_eq!(world.scoreboard().lives, 2);
    }

    #[test]
    fn test_world_death_is_charged_once() {
        let mut world = World::new(quiet_config()).unwrap();
        world.initialize(1);
        if let Some(state) = world.state.as_mut() {
            state.player.alive = false;
            state.player.hit_points = 0;
        }

        assert_eq!(world.advance_tick(None).status, TickStatus::PlayerDied);
        let tick_at_death = world.state().unwrap().tick;

        for _ in 0..3 {
            let result = world.advance_tick(Some(Command::FireSpray));
            assert_eq!(result.status, TickStatus::PlayerDied);
            assert!(result.events.is_empty());
        }
        assert_eq!(world.scoreboard().lives, 2);
        assert_eq!(world.state().unwrap().tick, tick_at_death);

        // Retrying the level starts a fresh attempt
        world.initialize(1);
        assert_eq!(world.advance_tick(None).status, TickStatus::Continue);
        assert_eq!(world.scoreboard().lives, 2);
    }

    #[test]
    fn test_goodie_roll_spawns_on_rim() {
        let mut config = quiet_config();
        config.spawn.base_odds = 1;
        config.spawn.goodie_floor = 1;
        let mut world = empty_world();

        // Replay the draws the tick will make: goodie roll, kind, angle, lifetime
        let mut rng = world.rng.clone();
        assert!(rng.one_in(1));
        let kind = GoodieKind::from_roll(rng.next_int_range(1, 10));
        let angle = rng.random_degrees();
        let lifetime = GoodieState::roll_lifetime(&mut rng, 1);

        let result = tick(&mut world, None, &config);
        assert_eq!(result.status, TickStatus::Continue);

        let goodie = world.entities.values().next().unwrap();
        let EntityKind::Goodie(state) = goodie.kind else {
            panic!("expected a goodie, got {:?}", goodie.kind);
        };
        assert_eq!(state.kind, kind);
        assert_ne!(state.kind, GoodieKind::Fungus);
        // Spawned this tick, so it has not counted down yet
        assert_eq!(state.lifetime, lifetime);
        assert_eq!(goodie.position, rim_point(angle));
        assert!((goodie.position.distance(DISH_CENTER) - DISH_RADIUS).abs() < 1e-9);
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e.data, GameEventData::GoodieSpawned { goodie_id, .. } if goodie_id == goodie.id)));
    }

    #[test]
    fn test_fungus_roll_spawns_on_rim() {
        let mut config = quiet_config();
        config.spawn.base_odds = 1;
        config.spawn.fungus_floor = 1;
        let mut world = empty_world();

        let mut rng = world.rng.clone();
        assert!(!rng.one_in(u32::MAX));
        assert!(rng.one_in(1));
        let angle = rng.random_degrees();
        let lifetime = GoodieState::roll_lifetime(&mut rng, 1);

        tick(&mut world, None, &config);

        assert_eq!(world.entities.len(), 1);
        let fungus = world.entities.values().next().unwrap();
        let EntityKind::Goodie(state) = fungus.kind else {
            panic!("expected a fungus, got {:?}", fungus.kind);
        };
        assert_eq!(state.kind, GoodieKind::Fungus);
        assert_eq!(state.lifetime, lifetime);
        assert_eq!(fungus.position, rim_point(angle));
        assert!((fungus.position.distance(DISH_CENTER) - DISH_RADIUS).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = WorldConfig::default();
        config.pit.release_odds = 0;
        assert!(World::new(config).is_err());
    }

    #[test]
    fn test_replay_matches_live_run() {
        let config = WorldConfig::default();
        let mut live = initialize_level(&config, Scoreboard::default());
        let mut recording = InputRecording::new();

        for t in 1..=300 {
            let input = scripted_input(t);
            recording.record(live.tick + 1, input);
            if tick(&mut live, input, &config).status != TickStatus::Continue {
                break;
            }
        }

        let (replayed, _events, _status) =
            replay_level(&config, Scoreboard::default(), &recording, live.tick);
        assert_eq!(replayed.tick, live.tick);
        assert_eq!(replayed.compute_hash(), live.compute_hash());
    }
}
