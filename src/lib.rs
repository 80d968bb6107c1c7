//! # Petri Dish
//!
//! Deterministic tick engine for a single-player Petri dish arena: the
//! player walks the rim of a dish and sprays bacteria released from pits.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         PETRI DISH                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                 │
//! │  ├── vec2.rs      - 2D vector, degree headings               │
//! │  ├── dish.rs      - Arena geometry                           │
//! │  ├── rng.rs       - Deterministic Xorshift128+ PRNG          │
//! │  └── hash.rs      - State hashing for verification           │
//! │                                                              │
//! │  game/            - Simulation                               │
//! │  ├── entity.rs    - Registry records and capabilities        │
//! │  ├── state.rs     - World, player and scoreboard state       │
//! │  ├── query.rs     - Proximity queries                        │
//! │  ├── bacterium.rs - Feed, divide, wander, chase              │
//! │  ├── pit.rs       - Bacterium release                        │
//! │  ├── goodie.rs    - Timed pickups                            │
//! │  ├── projectile.rs- Sprays and flames                        │
//! │  ├── player.rs    - Player commands                          │
//! │  ├── level.rs     - Level setup                              │
//! │  └── tick.rs      - Authoritative simulation loop            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! - No HashMap (BTreeMap for sorted iteration)
//! - No system time dependencies
//! - All randomness from one seeded Xorshift128+ per level
//!
//! Given the same config and input stream, a level produces the same
//! state hash on every run.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use crate::core::vec2::Vec2;
pub use crate::core::rng::DeterministicRng;
pub use crate::game::config::{ConfigError, WorldConfig};
pub use crate::game::input::{Command, InputRecording};
pub use crate::game::state::{Scoreboard, WorldState};
pub use crate::game::tick::{TickResult, TickStatus, World};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
