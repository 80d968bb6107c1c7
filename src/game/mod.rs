//! Game Logic Module
//!
//! All simulation code. Deterministic given a seed and an input stream.
//!
//! ## Module Structure
//!
//! - `entity`: Registry records, capability flags, hit-point interface
//! - `state`: World state, player, scoreboard
//! - `query`: Proximity queries over the registry
//! - `bacterium`, `pit`, `goodie`, `projectile`, `player`: Per-kind behavior
//! - `level`: Level setup
//! - `tick`: Authoritative simulation loop and driver lifecycle
//! - `input`: Commands and input recordings
//! - `config`: Tunables
//! - `events`: Game events and audio cues

pub mod config;
pub mod entity;
pub mod events;
pub mod input;
pub mod state;
pub mod query;
pub mod bacterium;
pub mod pit;
pub mod goodie;
pub mod projectile;
pub mod player;
pub mod level;
pub mod tick;

// Re-export key types
pub use config::{ConfigError, WorldConfig};
pub use entity::{Entity, EntityId, EntityKind};
pub use events::{Cue, GameEvent, GameEventData};
pub use input::{Command, InputRecording};
pub use state::{Scoreboard, WorldState};
pub use tick::{tick, replay_level, TickResult, TickStatus, World};
