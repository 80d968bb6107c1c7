//! Petri Dish Demo Driver
//!
//! Plays scripted levels headlessly, logging status lines and events, then
//! replays the first attempt to confirm the state hash reproduces.
//!
//! Usage: `petri-dish [config.json]`

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use petri_dish::{
    VERSION,
    game::{
        config::WorldConfig,
        input::{Command, InputRecording},
        state::Scoreboard,
        tick::{replay_level, TickStatus, World},
    },
};

/// Give up on an attempt after this many ticks.
const MAX_TICKS_PER_ATTEMPT: u32 = 20_000;

/// Levels the demo plays before stopping.
const DEMO_LEVELS: u32 = 3;

/// Log the status line every this many ticks.
const REPORT_INTERVAL: u32 = 500;

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Petri Dish v{}", VERSION);

    let config = load_config()?;
    info!("Base seed: {:#x}", config.seed);

    demo_game(config)
}

/// Read the config from the first argument, or use defaults.
fn load_config() -> Result<WorldConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            let config = WorldConfig::from_json(&json)
                .with_context(|| format!("parsing config {path}"))?;
            info!("Loaded config from {}", path);
            Ok(config)
        }
        None => Ok(WorldConfig::default()),
    }
}

/// Sweep the rim and spray inward, with an occasional flamethrower burst.
fn scripted_input(t: u32) -> Option<Command> {
    match t % 12 {
        0 | 4 | 8 => Some(Command::FireSpray),
        2 | 6 => Some(Command::RotateLeft),
        10 if t % 600 == 10 => Some(Command::FireFlame),
        _ => None,
    }
}

fn demo_game(config: WorldConfig) -> Result<()> {
    info!("=== Starting Demo Game ===");

    let mut world = World::new(config.clone()).context("invalid config")?;
    let mut level = 1;
    let mut first_attempt: Option<(Scoreboard, InputRecording, u32)> = None;

    while level <= DEMO_LEVELS && !world.is_game_over() {
        world.initialize(level);
        let start = world.scoreboard();
        let mut recording = InputRecording::new();
        let mut status = TickStatus::Continue;
        let mut ticks = 0;

        info!("Level {} (lives {}, score {})", start.level, start.lives, start.score);

        while ticks < MAX_TICKS_PER_ATTEMPT {
            ticks += 1;
            let input = scripted_input(ticks);
            recording.record(ticks, input);

            let result = world.advance_tick(input);
            for event in result.events.iter().filter(|e| e.as_cue().is_none()) {
                debug!(tick = event.tick, data = ?event.data, "event");
            }
            if ticks % REPORT_INTERVAL == 0 {
                info!("Tick {}: {}", ticks, result.status_line);
                if let Some(state) = world.state() {
                    debug!(
                        bacteria = state.count_live(|e| e.is_bacterium()),
                        sprites = state.drawables().len(),
                        "dish"
                    );
                }
            }

            status = result.status;
            if status != TickStatus::Continue {
                info!("{}", result.status_line);
                break;
            }
        }

        let final_state = world.teardown();
        if first_attempt.is_none() {
            first_attempt = Some((start, recording, ticks));
            if let Some(state) = &final_state {
                info!("Attempt hash: {}", hex::encode(state.compute_hash()));
            }
        }

        match status {
            TickStatus::LevelFinished => {
                info!("Level {} cleared", level);
                level += 1;
            }
            TickStatus::PlayerDied => {
                info!("Player died; {} lives left", world.scoreboard().lives);
            }
            TickStatus::Continue => {
                warn!("Level {} not finished after {} ticks; moving on", level, ticks);
                level += 1;
            }
        }
    }

    let scoreboard = world.scoreboard();
    info!("=== Game Over ===");
    info!("Final score: {}  Level: {}  Lives: {}", scoreboard.score, scoreboard.level, scoreboard.lives);

    if let Some((start, recording, ticks)) = first_attempt {
        verify_replay(&config, start, &recording, ticks);
    }
    Ok(())
}

/// Replay the first attempt twice and compare hashes.
fn verify_replay(config: &WorldConfig, start: Scoreboard, recording: &InputRecording, ticks: u32) {
    info!("=== Verifying Determinism ===");
    info!("Replaying {} ticks ({} commands)", ticks, recording.command_count());

    let (first, first_events, _) = replay_level(config, start, recording, ticks);
    let (second, second_events, _) = replay_level(config, start, recording, ticks);

    let hash1 = first.compute_hash();
    let hash2 = second.compute_hash();
    info!("Replay 1 hash: {}", hex::encode(hash1));
    info!("Replay 2 hash: {}", hex::encode(hash2));

    let events_match = first_events.iter().map(|e| &e.data).eq(second_events.iter().map(|e| &e.data));
    if hash1 == hash2 && events_match {
        info!("✓ Determinism verified: replays match");
    } else {
        warn!("✗ Determinism FAILED: replays diverged");
    }
}
